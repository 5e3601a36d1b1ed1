//! Timer system for the typeahead widget.
//!
//! Provides one-shot timers driven by an explicit clock. The host's event loop
//! asks [`TimerManager::time_until_next_at`] how long it may sleep, then calls
//! [`TimerManager::process_expired_at`] to collect the timers that fired.
//! Every operation also has an `Instant::now()` convenience form.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages one-shot timers.
///
/// Stopped timers are removed from the registry immediately; their stale heap
/// entries are skipped lazily when they reach the front of the queue.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// Timers that are still pending.
    timers: SlotMap<TimerId, ()>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_one_shot_at(&mut self, now: Instant, duration: Duration) -> TimerId {
        let fire_at = now + duration;
        let id = self.timers.insert(());
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: fire_at,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer started");
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns `Ok(())` if the timer was found and removed, or an error if not found.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    ///
    /// Returns `None` if there are no active timers.
    pub fn time_until_next_at(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stopped();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Process all timers that are due at `now`.
    ///
    /// Returns the IDs of the timers that fired, earliest first. Fired timers
    /// are removed.
    #[tracing::instrument(skip(self), target = "typeahead_core::timer", level = "trace")]
    pub fn process_expired_at(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            if self.timers.remove(entry.id).is_some() {
                tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
                fired.push(entry.id);
            }
        }

        fired
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Stop every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        let id = timers.start_one_shot_at(start, Duration::from_millis(100));

        assert!(timers.process_expired_at(start + Duration::from_millis(99)).is_empty());
        assert_eq!(
            timers.process_expired_at(start + Duration::from_millis(100)),
            vec![id]
        );
        assert!(!timers.is_active(id));
        assert!(timers.process_expired_at(start + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        let id = timers.start_one_shot_at(start, Duration::from_millis(10));

        assert!(timers.stop(id).is_ok());
        assert!(timers.stop(id).is_err());
        assert_eq!(timers.time_until_next_at(start), None);
        assert!(timers.process_expired_at(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_fire_order_and_time_until_next() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        let late = timers.start_one_shot_at(start, Duration::from_millis(300));
        let early = timers.start_one_shot_at(start, Duration::from_millis(100));

        assert_eq!(
            timers.time_until_next_at(start + Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );
        assert_eq!(timers.active_count(), 2);
        assert_eq!(
            timers.process_expired_at(start + Duration::from_millis(500)),
            vec![early, late]
        );
    }

    #[test]
    fn test_overdue_timer_reports_zero() {
        let start = Instant::now();
        let mut timers = TimerManager::new();
        timers.start_one_shot_at(start, Duration::from_millis(10));
        assert_eq!(
            timers.time_until_next_at(start + Duration::from_millis(50)),
            Some(Duration::ZERO)
        );
    }
}
