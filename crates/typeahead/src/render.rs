//! Render model and delegate hooks for the option panel.
//!
//! The widget draws nothing itself. [`PanelView`] describes what the panel
//! should show right now, and [`PanelDelegate`] is the hook a host
//! implements to paint it with whatever toolkit it uses.

use std::ops::Range;

/// Per-row information handed to the delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowState {
    /// Index into the visible candidates.
    pub index: usize,
    /// Whether the row is highlighted.
    pub highlighted: bool,
    /// Whether the row is the committed value.
    pub committed: bool,
    /// Byte ranges of the label matched by the query.
    pub matches: Vec<Range<usize>>,
}

/// One row of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a, T> {
    pub candidate: &'a T,
    pub label: String,
    pub state: RowState,
}

/// What the option panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView<'a, T> {
    /// The panel is closed.
    Hidden,
    /// A retrieval for the current query is outstanding.
    Loading,
    /// The panel is open but no candidate matches.
    Empty,
    /// The rows inside the scroll window, top to bottom.
    Rows(Vec<RowView<'a, T>>),
}

impl<T> PanelView<'_, T> {
    /// Whether the panel is shown at all.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Labels of the rendered rows.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Rows(rows) => rows.iter().map(|row| row.label.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Paints the option panel.
///
/// Only `row` is required; the placeholder hooks default to painting
/// nothing.
pub trait PanelDelegate<T> {
    /// Paint one option row.
    fn row(&mut self, candidate: &T, label: &str, state: &RowState);

    /// Paint the loading affordance.
    fn loading(&mut self) {}

    /// Paint the "no items" affordance.
    fn empty(&mut self) {}
}

/// Paint `view` through `delegate`. Returns the number of rows painted.
pub fn paint<T, D>(view: &PanelView<'_, T>, delegate: &mut D) -> usize
where
    D: PanelDelegate<T> + ?Sized,
{
    match view {
        PanelView::Hidden => 0,
        PanelView::Loading => {
            delegate.loading();
            0
        }
        PanelView::Empty => {
            delegate.empty();
            0
        }
        PanelView::Rows(rows) => {
            for row in rows {
                delegate.row(row.candidate, &row.label, &row.state);
            }
            rows.len()
        }
    }
}

/// A delegate that renders the panel as plain text lines.
///
/// Highlighted rows are prefixed with `>`, the committed row with `*`, and
/// matched substrings are wrapped in brackets. Useful for terminals, logs
/// and tests.
#[derive(Debug, Clone, Default)]
pub struct TextPanel {
    /// Rendered lines, top to bottom.
    pub lines: Vec<String>,
}

impl TextPanel {
    /// Placeholder shown while loading.
    pub const LOADING: &'static str = "loading...";
    /// Placeholder shown when nothing matches.
    pub const EMPTY: &'static str = "No items";

    /// Create an empty text panel.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> PanelDelegate<T> for TextPanel {
    fn row(&mut self, _candidate: &T, label: &str, state: &RowState) {
        let marker = match (state.highlighted, state.committed) {
            (true, true) => ">*",
            (true, false) => "> ",
            (false, true) => " *",
            (false, false) => "  ",
        };

        let mut line = String::from(marker);
        let mut cursor = 0;
        for range in &state.matches {
            line.push_str(&label[cursor..range.start]);
            line.push('[');
            line.push_str(&label[range.clone()]);
            line.push(']');
            cursor = range.end;
        }
        line.push_str(&label[cursor..]);
        self.lines.push(line);
    }

    fn loading(&mut self) {
        self.lines.push(Self::LOADING.to_string());
    }

    fn empty(&mut self) {
        self.lines.push(Self::EMPTY.to_string());
    }
}
