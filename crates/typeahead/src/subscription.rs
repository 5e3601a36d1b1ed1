//! Document-level pointer watching.
//!
//! Hosts publish every pointer-down they see on a [`PointerHub`]. Each
//! mounted widget holds one [`OutsidePointerWatch`] connected to the hub;
//! presses that land outside the widget's regions are queued and picked up
//! by the widget on its next `pump`, so slots never touch widget state.

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::sync::Arc;

use typeahead_core::logging::targets;
use typeahead_core::{ConnectionGuard, Signal};

use crate::geometry::{Point, Rect};

/// Shared signal carrying document-level pointer-down positions.
pub type PointerHub = Signal<Point>;

/// Watches a [`PointerHub`] for presses outside a set of regions.
///
/// Regions are typically the input and, while it is open, the panel. With no
/// regions set the watch has no geometry to judge by and ignores every
/// press.
pub struct OutsidePointerWatch {
    regions: Arc<Mutex<Vec<Rect>>>,
    inbox_tx: Sender<Point>,
    inbox_rx: Receiver<Point>,
    guard: Option<ConnectionGuard<Point>>,
}

impl OutsidePointerWatch {
    /// Create an unsubscribed watch.
    pub fn new() -> Self {
        let (inbox_tx, inbox_rx) = unbounded();
        Self {
            regions: Arc::new(Mutex::new(Vec::new())),
            inbox_tx,
            inbox_rx,
            guard: None,
        }
    }

    /// Replace the regions that count as inside.
    pub fn set_regions(&self, regions: Vec<Rect>) {
        *self.regions.lock() = regions;
    }

    /// The regions that count as inside.
    pub fn regions(&self) -> Vec<Rect> {
        self.regions.lock().clone()
    }

    /// Whether `point` falls outside every region.
    ///
    /// Returns `false` when no regions are known.
    pub fn is_outside(&self, point: Point) -> bool {
        is_outside(&self.regions.lock(), point)
    }

    /// Connect to `hub`. Returns `false` if already subscribed.
    pub fn subscribe(&mut self, hub: &PointerHub) -> bool {
        if self.guard.is_some() {
            return false;
        }

        let regions = Arc::clone(&self.regions);
        let inbox = self.inbox_tx.clone();
        self.guard = Some(hub.connect_scoped(move |&point| {
            if is_outside(&regions.lock(), point) {
                let _ = inbox.send(point);
            }
        }));

        tracing::debug!(target: targets::WIDGET, "outside-pointer watch subscribed");
        true
    }

    /// Disconnect from the hub and drop any queued presses.
    ///
    /// Returns `false` if not subscribed.
    pub fn unsubscribe(&mut self) -> bool {
        let Some(guard) = self.guard.take() else {
            return false;
        };
        drop(guard);
        self.drain();

        tracing::debug!(target: targets::WIDGET, "outside-pointer watch unsubscribed");
        true
    }

    /// Whether the watch is connected to a hub.
    pub fn is_subscribed(&self) -> bool {
        self.guard.as_ref().is_some_and(ConnectionGuard::is_connected)
    }

    /// Take every outside press queued since the last drain.
    pub fn drain(&self) -> Vec<Point> {
        self.inbox_rx.try_iter().collect()
    }
}

impl Default for OutsidePointerWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutsidePointerWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutsidePointerWatch")
            .field("regions", &self.regions.lock().len())
            .field("subscribed", &self.is_subscribed())
            .field("queued", &self.inbox_rx.len())
            .finish()
    }
}

fn is_outside(regions: &[Rect], point: Point) -> bool {
    !regions.is_empty() && !regions.iter().any(|region| region.contains(point))
}
