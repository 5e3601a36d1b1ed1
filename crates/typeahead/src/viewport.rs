//! Panel scrolling and placement.
//!
//! The panel shows at most `max_visible_rows` rows. [`ViewportReconciler`]
//! keeps the highlighted row inside that window, scrolling as little as
//! possible, and maps pointer positions back to row indices.
//! [`placement`] decides whether the panel opens below or above the input.

use std::ops::Range;

use typeahead_core::logging::targets;

use crate::geometry::{Point, Rect};

/// Height added to the rows for the panel border.
pub const PANEL_BORDER: f32 = 2.0;

/// Which side of the input the panel opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPlacement {
    /// Under the input.
    #[default]
    Below,
    /// Over the input.
    Above,
}

/// Choose where to open a panel of `panel_height` next to `anchor`.
///
/// Below is preferred when the panel fits between the anchor and the bottom
/// of `bounds`; otherwise above when it fits there; otherwise whichever side
/// has more room.
pub fn placement(anchor: Rect, bounds: Rect, panel_height: f32, gap: f32) -> PanelPlacement {
    let space_below = bounds.bottom() - anchor.bottom() - gap;
    let space_above = anchor.top() - bounds.top() - gap;

    if panel_height <= space_below {
        PanelPlacement::Below
    } else if panel_height <= space_above {
        PanelPlacement::Above
    } else if space_above > space_below {
        PanelPlacement::Above
    } else {
        PanelPlacement::Below
    }
}

/// The panel rectangle for a placement, as wide as the anchor.
pub fn panel_rect(anchor: Rect, placement: PanelPlacement, panel_height: f32, gap: f32) -> Rect {
    let y = match placement {
        PanelPlacement::Below => anchor.bottom() + gap,
        PanelPlacement::Above => anchor.top() - gap - panel_height,
    };
    Rect::new(anchor.left(), y, anchor.width(), panel_height)
}

/// A scroll the panel must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Index of the first visible row.
    pub offset: usize,
    /// The row that must be brought into view, if any.
    pub reveal: Option<usize>,
}

/// Keeps the highlighted row within the visible window.
#[derive(Debug, Clone)]
pub struct ViewportReconciler {
    scroll_offset: usize,
    max_visible_rows: usize,
    row_height: f32,
}

impl ViewportReconciler {
    /// Create a reconciler showing at most `max_visible_rows` rows.
    pub fn new(max_visible_rows: usize, row_height: f32) -> Self {
        Self {
            scroll_offset: 0,
            max_visible_rows: max_visible_rows.max(1),
            row_height,
        }
    }

    /// Index of the first visible row.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Maximum number of rows shown at once.
    pub fn max_visible_rows(&self) -> usize {
        self.max_visible_rows
    }

    /// Height of one row.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Rows currently inside the window.
    pub fn visible_range(&self, row_count: usize) -> Range<usize> {
        let start = self.scroll_offset.min(row_count);
        let end = (start + self.max_visible_rows).min(row_count);
        start..end
    }

    /// Panel height needed for `row_count` rows.
    ///
    /// An empty list still reserves one row for the "no items" or loading
    /// affordance.
    pub fn panel_height(&self, row_count: usize) -> f32 {
        let rows = row_count.clamp(1, self.max_visible_rows);
        rows as f32 * self.row_height + PANEL_BORDER
    }

    /// Scroll so that `highlight` is visible.
    ///
    /// The offset is first clamped to the list length, then moved the least
    /// distance that brings the highlighted row into view. Returns the new
    /// position when the offset changed.
    pub fn reconcile(
        &mut self,
        highlight: i32,
        row_count: usize,
        panel_visible: bool,
    ) -> Option<ScrollRequest> {
        if !panel_visible {
            return None;
        }

        let before = self.scroll_offset;
        let max_offset = row_count.saturating_sub(self.max_visible_rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);

        let reveal = usize::try_from(highlight).ok().filter(|&i| i < row_count);
        if let Some(idx) = reveal {
            if idx < self.scroll_offset {
                self.scroll_offset = idx;
            } else if idx >= self.scroll_offset + self.max_visible_rows {
                self.scroll_offset = idx + 1 - self.max_visible_rows;
            }
        }

        if self.scroll_offset == before {
            return None;
        }
        tracing::trace!(
            target: targets::VIEWPORT,
            from = before,
            to = self.scroll_offset,
            ?reveal,
            "viewport scrolled"
        );
        Some(ScrollRequest {
            offset: self.scroll_offset,
            reveal,
        })
    }

    /// The row under `point`, given the panel rectangle.
    pub fn row_at(&self, panel: Rect, point: Point, row_count: usize) -> Option<usize> {
        if !panel.contains(point) {
            return None;
        }
        let local_y = point.y - panel.top() - PANEL_BORDER / 2.0;
        if local_y < 0.0 {
            return None;
        }
        let row = self.scroll_offset + (local_y / self.row_height) as usize;
        self.visible_range(row_count).contains(&row).then_some(row)
    }

    /// Scroll back to the top.
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}
