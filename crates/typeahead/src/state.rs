//! The selection state machine.
//!
//! [`SelectionState`] holds the query text, the committed value, panel
//! visibility, the highlighted row and the visible candidate list. Every
//! change goes through [`SelectionState::apply`], which computes the next
//! state in one step and reports what changed as [`SelectionEffect`]s.
//!
//! Some effects ask the owner for follow-up work the state cannot do on its
//! own: [`SelectionEffect::RefilterRequested`] and
//! [`SelectionEffect::ShowFullSet`] are answered with a
//! [`SelectionEvent::CandidatesChanged`] carrying the new visible list.

use typeahead_core::logging::targets;

use crate::candidate::Extractors;
use crate::config::ClearBehavior;

/// Highlight value meaning "no row highlighted".
pub const NO_HIGHLIGHT: i32 = -1;

/// An input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent<T> {
    /// The user changed the input text.
    TextEdited(String),
    /// The visible candidate list was recomputed.
    CandidatesChanged(Vec<T>),
    /// Move the highlight down one row, wrapping at the end.
    ArrowDown,
    /// Move the highlight up one row, wrapping at the start.
    ArrowUp,
    /// Move the highlight down by a page, stopping at the last row.
    PageDown(usize),
    /// Move the highlight up by a page, stopping at the first row.
    PageUp(usize),
    /// Highlight the first row.
    Home,
    /// Highlight the last row.
    End,
    /// Commit the highlighted row.
    Enter,
    /// Commit the row at an index (pointer activation).
    Activate(usize),
    /// Highlight the row under the pointer.
    Hover(usize),
    /// A pointer went down outside the widget.
    PointerDownOutside,
    /// Escape was pressed.
    Escape,
    /// The input gained focus or was clicked.
    Focused,
    /// The clear affordance was used.
    Cleared,
    /// The host set the committed value directly.
    SetCommitted(Option<T>),
}

/// An observable outcome of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEffect<T> {
    /// The query text changed.
    QueryTextChanged(String),
    /// The committed value changed identity.
    CommittedValueChanged(Option<T>),
    /// The highlighted index changed.
    HighlightChanged(i32),
    /// The panel was shown or hidden.
    PanelVisibilityChanged(bool),
    /// A candidate was committed by the user.
    Committed(T),
    /// The input was cleared by the user.
    Cleared,
    /// The input should take keyboard focus.
    FocusInput,
    /// The user edited the query; the visible list must be recomputed and
    /// the query fed to the retrieval debounce.
    RefilterRequested(String),
    /// The visible list must be reset to the full candidate set.
    ShowFullSet,
    /// The query text was reconciled programmatically; any pending
    /// debounced query is obsolete.
    CancelPendingQuery,
}

impl<T> SelectionEffect<T> {
    /// Whether the effect asks the owner for follow-up work rather than
    /// reporting something to the host.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::RefilterRequested(_) | Self::ShowFullSet | Self::CancelPendingQuery
        )
    }
}

/// Values compared before and after a transition.
struct Observed<K> {
    query_text: String,
    committed_key: Option<K>,
    panel_visible: bool,
    highlighted_index: i32,
}

/// Query text, committed value, panel visibility and highlight.
pub struct SelectionState<T, K> {
    extractors: Extractors<T, K>,
    clear_behavior: ClearBehavior,
    query_text: String,
    committed: Option<T>,
    panel_visible: bool,
    highlighted_index: i32,
    visible: Vec<T>,
}

impl<T: Clone, K: PartialEq> SelectionState<T, K> {
    /// Create an empty state.
    pub fn new(extractors: Extractors<T, K>, clear_behavior: ClearBehavior) -> Self {
        Self {
            extractors,
            clear_behavior,
            query_text: String::new(),
            committed: None,
            panel_visible: false,
            highlighted_index: NO_HIGHLIGHT,
            visible: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The text currently in the input.
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// The committed candidate, if any.
    pub fn committed_value(&self) -> Option<&T> {
        self.committed.as_ref()
    }

    /// Whether the option panel is shown.
    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Index of the highlighted row, or [`NO_HIGHLIGHT`].
    pub fn highlighted_index(&self) -> i32 {
        self.highlighted_index
    }

    /// The highlighted candidate, if any.
    pub fn highlighted(&self) -> Option<&T> {
        usize::try_from(self.highlighted_index)
            .ok()
            .and_then(|i| self.visible.get(i))
    }

    /// The candidates currently offered in the panel.
    pub fn visible_candidates(&self) -> &[T] {
        &self.visible
    }

    /// Whether `candidate` has the identity of the committed value.
    pub fn is_committed(&self, candidate: &T) -> bool {
        self.committed
            .as_ref()
            .is_some_and(|c| self.extractors.same(c, candidate))
    }

    /// The key and label extractors.
    pub fn extractors(&self) -> &Extractors<T, K> {
        &self.extractors
    }

    /// Return to the empty state without reporting any effects.
    pub fn reset(&mut self) {
        self.query_text.clear();
        self.committed = None;
        self.panel_visible = false;
        self.highlighted_index = NO_HIGHLIGHT;
        self.visible.clear();
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Apply one event and return its effects.
    ///
    /// Change effects come first, in a fixed order, followed by the
    /// event-specific effects.
    #[tracing::instrument(skip_all, target = "typeahead::state", level = "trace")]
    pub fn apply(&mut self, event: SelectionEvent<T>) -> Vec<SelectionEffect<T>> {
        let before = self.observe();
        let mut effects = Vec::new();

        match event {
            SelectionEvent::TextEdited(text) => self.edit_text(text, &mut effects),
            SelectionEvent::CandidatesChanged(list) => self.set_visible(list),
            SelectionEvent::ArrowDown => self.step(|h, len| if h < len - 1 { h + 1 } else { 0 }),
            SelectionEvent::ArrowUp => self.step(|h, len| if h > 0 { h - 1 } else { len - 1 }),
            SelectionEvent::PageDown(page) => {
                let page = i32::try_from(page.max(1)).unwrap_or(i32::MAX);
                self.step(|h, len| h.saturating_add(page).min(len - 1))
            }
            SelectionEvent::PageUp(page) => {
                let page = i32::try_from(page.max(1)).unwrap_or(i32::MAX);
                self.step(|h, _| h.saturating_sub(page).max(0))
            }
            SelectionEvent::Home => self.step(|_, _| 0),
            SelectionEvent::End => self.step(|_, len| len - 1),
            SelectionEvent::Enter => {
                if let Some(candidate) = self.highlighted().cloned() {
                    self.commit(candidate, &mut effects);
                }
            }
            SelectionEvent::Activate(index) => {
                if let Some(candidate) = self.visible.get(index).cloned() {
                    self.commit(candidate, &mut effects);
                }
            }
            SelectionEvent::Hover(index) => {
                if self.panel_visible && index < self.visible.len() {
                    self.highlighted_index = i32::try_from(index).unwrap_or(NO_HIGHLIGHT);
                }
            }
            SelectionEvent::PointerDownOutside | SelectionEvent::Escape => {
                self.dismiss(&mut effects)
            }
            SelectionEvent::Focused => {
                if !self.panel_visible {
                    self.panel_visible = true;
                    effects.push(SelectionEffect::ShowFullSet);
                }
            }
            SelectionEvent::Cleared => self.clear(&mut effects),
            SelectionEvent::SetCommitted(value) => self.set_committed(value, &mut effects),
        }

        self.clamp_highlight();
        let mut changes = self.changes_since(before);
        changes.append(&mut effects);
        changes
    }

    fn edit_text(&mut self, text: String, effects: &mut Vec<SelectionEffect<T>>) {
        if text == self.query_text {
            return;
        }

        let had_committed = self.committed.is_some();
        if self
            .committed
            .as_ref()
            .is_some_and(|c| self.extractors.label(c) != text)
        {
            tracing::trace!(target: targets::STATE, "edit diverged from committed label");
            self.committed = None;
        }

        if !self.panel_visible && !text.is_empty() {
            self.panel_visible = true;
        }
        if text.is_empty() && had_committed {
            self.committed = None;
            self.highlighted_index = 0;
        }

        self.query_text = text.clone();
        effects.push(SelectionEffect::RefilterRequested(text));
    }

    fn set_visible(&mut self, list: Vec<T>) {
        self.visible = list;
        self.highlighted_index = match &self.committed {
            Some(committed) => self
                .extractors
                .position_in(committed, &self.visible)
                .and_then(|i| i32::try_from(i).ok())
                .unwrap_or(0),
            None => 0,
        };

        if self
            .committed
            .as_ref()
            .is_some_and(|c| self.extractors.label(c) != self.query_text)
        {
            self.panel_visible = true;
        }
    }

    /// Move the highlight with `next(current, len)` while the panel shows rows.
    fn step(&mut self, next: impl FnOnce(i32, i32) -> i32) {
        if !self.panel_visible || self.visible.is_empty() {
            return;
        }
        let len = i32::try_from(self.visible.len()).unwrap_or(i32::MAX);
        self.highlighted_index = next(self.highlighted_index, len);
    }

    fn commit(&mut self, candidate: T, effects: &mut Vec<SelectionEffect<T>>) {
        let label = self.extractors.label(&candidate);
        tracing::debug!(target: targets::STATE, %label, "candidate committed");

        self.query_text = label;
        self.committed = Some(candidate.clone());
        self.panel_visible = false;
        self.highlighted_index = NO_HIGHLIGHT;

        effects.push(SelectionEffect::CancelPendingQuery);
        effects.push(SelectionEffect::Committed(candidate));
    }

    fn dismiss(&mut self, effects: &mut Vec<SelectionEffect<T>>) {
        if !self.panel_visible {
            return;
        }
        self.panel_visible = false;

        if let Some(committed) = &self.committed {
            let label = self.extractors.label(committed);
            if label != self.query_text {
                tracing::trace!(target: targets::STATE, %label, "reverted to committed label");
                self.query_text = label;
                effects.push(SelectionEffect::CancelPendingQuery);
            }
        }
    }

    fn clear(&mut self, effects: &mut Vec<SelectionEffect<T>>) {
        self.query_text.clear();
        self.committed = None;
        self.panel_visible = self.clear_behavior == ClearBehavior::KeepOpen;
        self.highlighted_index = 0;

        effects.push(SelectionEffect::Cleared);
        effects.push(SelectionEffect::FocusInput);
        effects.push(SelectionEffect::RefilterRequested(String::new()));
    }

    fn set_committed(&mut self, value: Option<T>, effects: &mut Vec<SelectionEffect<T>>) {
        match value {
            Some(candidate) => {
                let label = self.extractors.label(&candidate);
                if label != self.query_text {
                    self.query_text = label;
                    effects.push(SelectionEffect::CancelPendingQuery);
                }
                self.committed = Some(candidate);
            }
            None => self.committed = None,
        }
    }

    fn clamp_highlight(&mut self) {
        let max = i32::try_from(self.visible.len()).unwrap_or(i32::MAX) - 1;
        self.highlighted_index = self.highlighted_index.clamp(NO_HIGHLIGHT, max);
    }

    fn observe(&self) -> Observed<K> {
        Observed {
            query_text: self.query_text.clone(),
            committed_key: self.committed.as_ref().map(|c| self.extractors.key(c)),
            panel_visible: self.panel_visible,
            highlighted_index: self.highlighted_index,
        }
    }

    fn changes_since(&self, before: Observed<K>) -> Vec<SelectionEffect<T>> {
        let mut changes = Vec::new();

        if before.query_text != self.query_text {
            changes.push(SelectionEffect::QueryTextChanged(self.query_text.clone()));
        }
        let committed_key = self.committed.as_ref().map(|c| self.extractors.key(c));
        if before.committed_key != committed_key {
            changes.push(SelectionEffect::CommittedValueChanged(self.committed.clone()));
        }
        if before.panel_visible != self.panel_visible {
            changes.push(SelectionEffect::PanelVisibilityChanged(self.panel_visible));
        }
        if before.highlighted_index != self.highlighted_index {
            changes.push(SelectionEffect::HighlightChanged(self.highlighted_index));
        }

        if !changes.is_empty() {
            tracing::trace!(
                target: targets::STATE,
                query = %self.query_text,
                panel_visible = self.panel_visible,
                highlighted = self.highlighted_index,
                "state changed"
            );
        }
        changes
    }
}

impl<T, K> std::fmt::Debug for SelectionState<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("query_text", &self.query_text)
            .field("committed", &self.committed.is_some())
            .field("panel_visible", &self.panel_visible)
            .field("highlighted_index", &self.highlighted_index)
            .field("visible", &self.visible.len())
            .finish()
    }
}
