//! The typeahead widget.
//!
//! [`Typeahead`] ties the pieces together: input is translated by the
//! navigation controller, applied to the selection state, refiltered in the
//! same step, fed to the retrieval debounce, and finally reconciled with the
//! viewport before any signal fires. Hosts observe the widget through its
//! public [`Signal`] fields and paint it through a
//! [`PanelDelegate`](crate::render::PanelDelegate).
//!
//! # Driving the widget
//!
//! A host calls:
//!
//! - [`handle`](Typeahead::handle) for every keyboard, pointer and focus event,
//! - [`tick`](Typeahead::tick) from its timer loop so debounced queries fire,
//! - [`pump`](Typeahead::pump) to apply outside presses and finished
//!   retrievals.
//!
//! # Example
//!
//! ```
//! use typeahead::{
//!     CandidateSource, Extractors, InputEvent, Key, PointerHub, Typeahead, TypeaheadConfig,
//! };
//!
//! #[derive(Clone, Debug)]
//! struct Fruit { id: u32, name: &'static str }
//!
//! let fruits = vec![
//!     Fruit { id: 1, name: "Apple" },
//!     Fruit { id: 2, name: "Banana" },
//!     Fruit { id: 3, name: "Grape" },
//! ];
//! let mut widget = Typeahead::new(
//!     CandidateSource::fixed(fruits),
//!     Extractors::new(|f: &Fruit| f.id, |f: &Fruit| f.name.to_string()),
//!     TypeaheadConfig::default(),
//! );
//!
//! let hub = PointerHub::new();
//! widget.mount(&hub);
//!
//! widget.handle(InputEvent::TextChanged("an".into()));
//! assert_eq!(widget.visible_candidates().len(), 1);
//!
//! widget.handle(InputEvent::KeyPress(Key::Enter));
//! assert_eq!(widget.query_text(), "Banana");
//! assert_eq!(widget.committed_value().map(|f| f.id), Some(2));
//! ```

#[cfg(feature = "async")]
use std::sync::Arc;
use std::time::{Duration, Instant};

use typeahead_core::logging::targets;
use typeahead_core::{PerfSpan, Signal};

#[cfg(feature = "async")]
use typeahead_core::{AsyncRuntime, AsyncRuntimeConfig, CoreError};

use crate::candidate::Extractors;
use crate::config::{FailurePolicy, TypeaheadConfig};
use crate::debounce::Debouncer;
#[cfg(feature = "async")]
use crate::driver::RetrievalDriver;
use crate::error::{Result, RetrievalError};
use crate::filter::{filter, match_ranges};
use crate::geometry::{Point, Rect};
use crate::navigation::{InputEvent, NavContext, NavigationController, PointerTarget};
use crate::render::{self, PanelDelegate, PanelView, RowState, RowView};
use crate::source::{
    CandidateSource, Resolution, RetrievalRequest, RetrievalStatus, SourceAdapter,
};
use crate::state::{SelectionEffect, SelectionEvent, SelectionState};
use crate::subscription::{OutsidePointerWatch, PointerHub};
use crate::viewport::{self, PanelPlacement, ScrollRequest, ViewportReconciler};

/// A headless typeahead/selection widget.
///
/// `T` is the candidate type and `K` the identity key produced by the key
/// extractor.
///
/// # Signals
///
/// - `committed`: a candidate was committed by Enter or pointer activation
/// - `cleared`: the clear affordance was used
/// - `retrieval_failed`: a retrieval for the current query failed
/// - `committed_value_changed`: the committed value changed identity
/// - `query_text_changed`: the input text changed
/// - `highlighted`: a candidate became highlighted
/// - `panel_visibility_changed`: the panel opened or closed
/// - `focus_requested`: the input should take keyboard focus
/// - `scroll_requested`: the panel must scroll to keep the highlight visible
pub struct Typeahead<T, K> {
    config: TypeaheadConfig,
    state: SelectionState<T, K>,
    source: SourceAdapter<T>,
    debounce: Debouncer<String>,
    viewport: ViewportReconciler,
    navigation: NavigationController,
    watch: OutsidePointerWatch,
    anchor: Option<Rect>,
    bounds: Option<Rect>,
    pending_requests: Vec<RetrievalRequest>,
    #[cfg(feature = "async")]
    driver: Option<RetrievalDriver<T>>,
    mounted: bool,
    last_error: Option<RetrievalError>,

    /// Signal emitted when a candidate is committed.
    pub committed: Signal<T>,

    /// Signal emitted when the input is cleared.
    pub cleared: Signal<()>,

    /// Signal emitted when a retrieval for the current query fails.
    pub retrieval_failed: Signal<RetrievalError>,

    /// Signal emitted when the committed value changes identity.
    pub committed_value_changed: Signal<Option<T>>,

    /// Signal emitted when the input text changes.
    pub query_text_changed: Signal<String>,

    /// Signal emitted when a candidate becomes highlighted.
    pub highlighted: Signal<T>,

    /// Signal emitted when the panel opens or closes.
    pub panel_visibility_changed: Signal<bool>,

    /// Signal emitted when the input should take focus.
    pub focus_requested: Signal<()>,

    /// Signal emitted when the panel must scroll.
    pub scroll_requested: Signal<ScrollRequest>,
}

impl<T, K> Typeahead<T, K>
where
    T: Clone + Send + 'static,
    K: PartialEq + 'static,
{
    /// Create an unmounted widget.
    pub fn new(
        source: CandidateSource<T>,
        extractors: Extractors<T, K>,
        config: TypeaheadConfig,
    ) -> Self {
        Self {
            state: SelectionState::new(extractors, config.clear_behavior),
            source: SourceAdapter::new(source, config.failure_policy),
            debounce: Debouncer::new(config.debounce()),
            viewport: ViewportReconciler::new(config.max_visible_rows, config.row_height),
            navigation: NavigationController::new(config.max_visible_rows, config.close_on_escape),
            watch: OutsidePointerWatch::new(),
            anchor: None,
            bounds: None,
            pending_requests: Vec::new(),
            #[cfg(feature = "async")]
            driver: None,
            mounted: false,
            last_error: None,
            committed: Signal::new(),
            cleared: Signal::new(),
            retrieval_failed: Signal::new(),
            committed_value_changed: Signal::new(),
            query_text_changed: Signal::new(),
            highlighted: Signal::new(),
            panel_visibility_changed: Signal::new(),
            focus_requested: Signal::new(),
            scroll_requested: Signal::new(),
            config,
        }
    }

    /// Start building a widget with validated configuration.
    pub fn builder(
        source: CandidateSource<T>,
        extractors: Extractors<T, K>,
    ) -> TypeaheadBuilder<T, K> {
        TypeaheadBuilder::new(source, extractors)
    }

    /// Run retrievals on `runtime` instead of queueing them for the host.
    #[cfg(feature = "async")]
    pub fn with_runtime(mut self, runtime: Arc<AsyncRuntime>) -> Self {
        self.driver = Some(RetrievalDriver::new(runtime));
        self
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach the widget: subscribe to `hub` and, for dynamic sources, issue
    /// the initial retrieval.
    pub fn mount(&mut self, hub: &PointerHub) {
        if self.mounted {
            tracing::debug!(target: targets::WIDGET, "mount ignored, already mounted");
            return;
        }

        self.mounted = true;
        self.source.attach();
        self.watch.subscribe(hub);
        self.update_watch_regions();
        tracing::debug!(
            target: targets::WIDGET,
            dynamic = self.source.is_dynamic(),
            "typeahead mounted"
        );

        if self.source.is_dynamic() && self.config.retrieve_on_mount {
            self.debounce.settle(String::new());
            self.issue_retrieval(String::new());
        }
    }

    /// Detach the widget.
    ///
    /// Cancels the debounce timer and outstanding retrievals, drops the
    /// pointer subscription and resets the query and committed value.
    /// Afterwards every input, tick and pump is a no-op until the next
    /// [`mount`](Self::mount).
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }

        self.mounted = false;
        self.debounce.reset();
        self.source.detach();
        self.watch.unsubscribe();
        self.watch.set_regions(Vec::new());
        #[cfg(feature = "async")]
        if let Some(driver) = self.driver.as_mut() {
            driver.cancel_all();
        }
        self.pending_requests.clear();
        self.state.reset();
        self.viewport.reset();
        self.last_error = None;

        tracing::debug!(target: targets::WIDGET, "typeahead unmounted");
    }

    /// Whether the widget is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle one input event. Returns `true` if it changed anything.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        self.handle_at(event, Instant::now())
    }

    /// Handle one input event at an explicit instant.
    pub fn handle_at(&mut self, event: InputEvent, now: Instant) -> bool {
        if !self.mounted {
            tracing::trace!(target: targets::WIDGET, ?event, "input while unmounted ignored");
            return false;
        }

        let ctx = NavContext {
            panel_visible: self.state.is_panel_visible(),
            query_text: self.state.query_text(),
        };
        let Some(event) = self.navigation.translate(event, ctx) else {
            return false;
        };

        self.dispatch(event, now);
        true
    }

    /// Fire the debounce timer if due, issuing a retrieval for the settled
    /// query. Returns `true` if a retrieval was issued.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) at an explicit instant.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        match self.debounce.poll(now) {
            Some(query) => {
                self.issue_retrieval(query);
                true
            }
            None => false,
        }
    }

    /// Time until the next [`tick`](Self::tick) has work to do.
    pub fn time_until_next_tick(&mut self, now: Instant) -> Option<Duration> {
        self.debounce.time_until_due(now)
    }

    /// Apply queued outside presses and finished retrievals.
    ///
    /// Returns the number of queued items processed.
    pub fn pump(&mut self) -> usize {
        if !self.mounted {
            return 0;
        }

        let mut processed = 0;
        let outside = self.watch.drain();
        if !outside.is_empty() {
            processed += outside.len();
            tracing::trace!(target: targets::WIDGET, presses = outside.len(), "outside presses");
            self.dispatch(SelectionEvent::PointerDownOutside, Instant::now());
        }

        #[cfg(feature = "async")]
        while let Some(completed) = self.driver.as_mut().and_then(RetrievalDriver::try_next) {
            self.resolve_retrieval(&completed.request, completed.result);
            processed += 1;
        }

        processed
    }

    /// Wait for the next retrieval running on the async driver and apply it.
    ///
    /// Returns `None` without waiting when unmounted or without a driver.
    /// With a driver, waits until a dispatched retrieval finishes, so only
    /// call this while one is outstanding.
    #[cfg(feature = "async")]
    pub async fn next_completion(&mut self) -> Option<Resolution> {
        if !self.mounted {
            return None;
        }
        let completed = self.driver.as_mut()?.next().await?;
        Some(self.resolve_retrieval(&completed.request, completed.result))
    }

    /// Take the retrievals the host must carry out itself.
    ///
    /// Only used without an async driver. Each request is answered with
    /// [`resolve_retrieval`](Self::resolve_retrieval).
    pub fn take_pending_requests(&mut self) -> Vec<RetrievalRequest> {
        std::mem::take(&mut self.pending_requests)
    }

    /// Apply the outcome of a retrieval.
    ///
    /// Results for anything but the most recent query are discarded.
    pub fn resolve_retrieval(
        &mut self,
        request: &RetrievalRequest,
        result: std::result::Result<Vec<T>, RetrievalError>,
    ) -> Resolution {
        let resolution = self.source.resolve(request, result);
        match &resolution {
            Resolution::Applied => {
                self.last_error = None;
                self.refresh_visible();
            }
            Resolution::Failed(error) => {
                self.last_error = Some(error.clone());
                if self.config.failure_policy == FailurePolicy::ClearCandidates {
                    self.refresh_visible();
                }
                self.retrieval_failed.emit(error.clone());
            }
            Resolution::Stale | Resolution::Detached => {}
        }
        resolution
    }

    // =========================================================================
    // Programmatic control
    // =========================================================================

    /// Set the committed value directly, syncing the input text.
    ///
    /// Emits `committed_value_changed` but not `committed`.
    pub fn set_committed_value(&mut self, value: Option<T>) {
        self.dispatch(SelectionEvent::SetCommitted(value), Instant::now());
    }

    /// Replace the input text as if the user had typed it.
    pub fn set_query_text(&mut self, text: impl Into<String>) -> bool {
        self.handle(InputEvent::TextChanged(text.into()))
    }

    /// Replace the list of a static source and refilter.
    ///
    /// Returns `false` for dynamic sources.
    pub fn set_candidates(&mut self, items: Vec<T>) -> bool {
        if !self.source.replace_static(items) {
            return false;
        }
        self.refresh_visible();
        true
    }

    /// Set the input rectangle, used for placement and outside detection.
    pub fn set_anchor_rect(&mut self, anchor: Rect) {
        self.anchor = Some(anchor);
        self.update_watch_regions();
    }

    /// Set the area the panel must fit in, usually the window.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
        self.update_watch_regions();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The configuration.
    pub fn config(&self) -> &TypeaheadConfig {
        &self.config
    }

    /// The text currently in the input.
    pub fn query_text(&self) -> &str {
        self.state.query_text()
    }

    /// The committed candidate, if any.
    pub fn committed_value(&self) -> Option<&T> {
        self.state.committed_value()
    }

    /// Whether the option panel is shown.
    pub fn is_panel_visible(&self) -> bool {
        self.state.is_panel_visible()
    }

    /// Index of the highlighted row, `-1` for none.
    pub fn highlighted_index(&self) -> i32 {
        self.state.highlighted_index()
    }

    /// The highlighted candidate, if any.
    pub fn highlighted_candidate(&self) -> Option<&T> {
        self.state.highlighted()
    }

    /// The candidates offered in the panel.
    pub fn visible_candidates(&self) -> &[T] {
        self.state.visible_candidates()
    }

    /// Every known candidate, before filtering.
    pub fn candidate_set(&self) -> &[T] {
        self.source.candidates()
    }

    /// Progress of the most recent retrieval.
    pub fn retrieval_status(&self) -> RetrievalStatus {
        self.source.status()
    }

    /// The failure of the most recent retrieval, cleared by the next success.
    pub fn last_error(&self) -> Option<&RetrievalError> {
        self.last_error.as_ref()
    }

    /// Index of the first row inside the scroll window.
    pub fn scroll_offset(&self) -> usize {
        self.viewport.scroll_offset()
    }

    /// Where the panel opens relative to the input.
    pub fn placement(&self) -> PanelPlacement {
        match (self.anchor, self.bounds) {
            (Some(anchor), Some(bounds)) => viewport::placement(
                anchor,
                bounds,
                self.panel_height(),
                self.config.panel_gap,
            ),
            _ => PanelPlacement::Below,
        }
    }

    /// The panel rectangle, when open and the anchor is known.
    pub fn panel_rect(&self) -> Option<Rect> {
        if !self.state.is_panel_visible() {
            return None;
        }
        let anchor = self.anchor?;
        Some(viewport::panel_rect(
            anchor,
            self.placement(),
            self.panel_height(),
            self.config.panel_gap,
        ))
    }

    /// What lies under `point`.
    pub fn hit_test(&self, point: Point) -> PointerTarget {
        if let Some(panel) = self.panel_rect()
            && panel.contains(point)
        {
            // The loading row stands in for the list and is not selectable.
            if self.is_loading() {
                return PointerTarget::Panel;
            }
            let rows = self.state.visible_candidates().len();
            return match self.viewport.row_at(panel, point, rows) {
                Some(index) => PointerTarget::Option(index),
                None => PointerTarget::Panel,
            };
        }
        if self.anchor.is_some_and(|anchor| anchor.contains(point)) {
            return PointerTarget::Input;
        }
        PointerTarget::Outside
    }

    /// The render model of the panel.
    pub fn panel_view(&self) -> PanelView<'_, T> {
        if !self.state.is_panel_visible() {
            return PanelView::Hidden;
        }
        if self.is_loading() {
            return PanelView::Loading;
        }

        let visible = self.state.visible_candidates();
        if visible.is_empty() {
            return PanelView::Empty;
        }

        let extractors = self.state.extractors();
        let query = self.state.query_text();
        let highlighted = self.state.highlighted_index();
        let rows = self
            .viewport
            .visible_range(visible.len())
            .map(|index| {
                let candidate = &visible[index];
                let label = extractors.label(candidate);
                let state = RowState {
                    index,
                    highlighted: i32::try_from(index).is_ok_and(|i| i == highlighted),
                    committed: self.state.is_committed(candidate),
                    matches: match_ranges(&label, query),
                };
                RowView {
                    candidate,
                    label,
                    state,
                }
            })
            .collect();
        PanelView::Rows(rows)
    }

    /// Paint the panel through `delegate`. Returns the number of rows painted.
    pub fn paint<D>(&self, delegate: &mut D) -> usize
    where
        D: PanelDelegate<T> + ?Sized,
    {
        render::paint(&self.panel_view(), delegate)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn is_loading(&self) -> bool {
        self.source.status() == RetrievalStatus::Pending
    }

    fn panel_height(&self) -> f32 {
        let rows = if self.is_loading() {
            1
        } else {
            self.state.visible_candidates().len()
        };
        self.viewport.panel_height(rows)
    }

    /// Apply an event and every follow-up it requests, then publish.
    fn dispatch(&mut self, event: SelectionEvent<T>, now: Instant) {
        let mut effects = self.state.apply(event);

        let mut i = 0;
        while i < effects.len() {
            let follow_up = match &effects[i] {
                SelectionEffect::RefilterRequested(query) => {
                    if self.source.is_dynamic() {
                        self.debounce.push(query.clone(), now);
                    }
                    Some(self.filtered(query))
                }
                SelectionEffect::ShowFullSet => Some(self.source.candidates().to_vec()),
                SelectionEffect::CancelPendingQuery => {
                    self.debounce.cancel();
                    None
                }
                _ => None,
            };
            if let Some(list) = follow_up {
                let more = self.state.apply(SelectionEvent::CandidatesChanged(list));
                effects.extend(more);
            }
            i += 1;
        }

        self.publish(effects);
    }

    /// Recompute the visible list after the candidate set changed.
    fn refresh_visible(&mut self) {
        let list = self.filtered(self.state.query_text());
        let effects = self.state.apply(SelectionEvent::CandidatesChanged(list));
        self.publish(effects);
    }

    fn filtered(&self, query: &str) -> Vec<T> {
        let _span = PerfSpan::new("filter");
        let extractors = self.state.extractors();
        filter(self.source.candidates(), query, |c| extractors.label(c))
    }

    fn issue_retrieval(&mut self, query: String) {
        let Some(request) = self.source.begin(&query) else {
            return;
        };
        // The panel shrinks to the loading row.
        self.update_watch_regions();

        #[cfg(feature = "async")]
        if let Some(driver) = self.driver.as_mut()
            && let Some(retriever) = self.source.retriever()
        {
            driver.dispatch(retriever, request);
            return;
        }

        self.pending_requests.push(request);
    }

    /// Reconcile the viewport and emit signals for `effects`.
    fn publish(&mut self, effects: Vec<SelectionEffect<T>>) {
        let panel_visible = self.state.is_panel_visible();
        if !panel_visible {
            self.viewport.reset();
        }
        let scroll = self.viewport.reconcile(
            self.state.highlighted_index(),
            self.state.visible_candidates().len(),
            panel_visible,
        );
        self.update_watch_regions();

        for effect in coalesce(effects) {
            match effect {
                SelectionEffect::QueryTextChanged(text) => self.query_text_changed.emit(text),
                SelectionEffect::CommittedValueChanged(value) => {
                    self.committed_value_changed.emit(value)
                }
                SelectionEffect::HighlightChanged(_) => {
                    if let Some(candidate) = self.state.highlighted() {
                        self.highlighted.emit(candidate.clone());
                    }
                }
                SelectionEffect::PanelVisibilityChanged(visible) => {
                    self.panel_visibility_changed.emit(visible)
                }
                SelectionEffect::Committed(candidate) => self.committed.emit(candidate),
                SelectionEffect::Cleared => self.cleared.emit(()),
                SelectionEffect::FocusInput => self.focus_requested.emit(()),
                SelectionEffect::RefilterRequested(_)
                | SelectionEffect::ShowFullSet
                | SelectionEffect::CancelPendingQuery => {}
            }
        }

        if let Some(request) = scroll {
            self.scroll_requested.emit(request);
        }
    }

    fn update_watch_regions(&self) {
        let regions = self
            .anchor
            .into_iter()
            .chain(self.panel_rect())
            .collect();
        self.watch.set_regions(regions);
    }
}

/// Keep only the last change effect of each kind, preserving the order of
/// everything else.
fn coalesce<T>(effects: Vec<SelectionEffect<T>>) -> Vec<SelectionEffect<T>> {
    let is_change = |effect: &SelectionEffect<T>| {
        matches!(
            effect,
            SelectionEffect::QueryTextChanged(_)
                | SelectionEffect::CommittedValueChanged(_)
                | SelectionEffect::HighlightChanged(_)
                | SelectionEffect::PanelVisibilityChanged(_)
        )
    };
    let kinds: Vec<_> = effects.iter().map(std::mem::discriminant).collect();

    effects
        .into_iter()
        .enumerate()
        .filter(|(i, effect)| !is_change(effect) || !kinds[i + 1..].contains(&kinds[*i]))
        .map(|(_, effect)| effect)
        .collect()
}

impl<T, K> std::fmt::Debug for Typeahead<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeahead")
            .field("state", &self.state)
            .field("source", &self.source)
            .field("mounted", &self.mounted)
            .field("pending_requests", &self.pending_requests.len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Typeahead<String, u32>: Send);

// ============================================================================
// Builder
// ============================================================================

/// Builds a [`Typeahead`] with validated configuration.
///
/// ```
/// use typeahead::{CandidateSource, Extractors, Typeahead, TypeaheadConfig};
///
/// let widget = Typeahead::builder(
///     CandidateSource::fixed(vec!["Apple".to_string()]),
///     Extractors::new(|s: &String| s.clone(), |s: &String| s.clone()),
/// )
/// .config(TypeaheadConfig::default().with_max_visible_rows(5))
/// .build()
/// .unwrap();
///
/// assert_eq!(widget.config().max_visible_rows, 5);
/// ```
pub struct TypeaheadBuilder<T, K> {
    source: CandidateSource<T>,
    extractors: Extractors<T, K>,
    config: TypeaheadConfig,
    #[cfg(feature = "async")]
    runtime: Option<Arc<AsyncRuntime>>,
    #[cfg(feature = "async")]
    runtime_config: Option<AsyncRuntimeConfig>,
}

impl<T, K> TypeaheadBuilder<T, K>
where
    T: Clone + Send + 'static,
    K: PartialEq + 'static,
{
    fn new(source: CandidateSource<T>, extractors: Extractors<T, K>) -> Self {
        Self {
            source,
            extractors,
            config: TypeaheadConfig::default(),
            #[cfg(feature = "async")]
            runtime: None,
            #[cfg(feature = "async")]
            runtime_config: None,
        }
    }

    /// Use this configuration.
    pub fn config(mut self, config: TypeaheadConfig) -> Self {
        self.config = config;
        self
    }

    /// Run retrievals on an existing runtime.
    #[cfg(feature = "async")]
    pub fn runtime(mut self, runtime: Arc<AsyncRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Run retrievals on a runtime created at build time.
    #[cfg(feature = "async")]
    pub fn spawn_runtime(mut self, config: AsyncRuntimeConfig) -> Self {
        self.runtime_config = Some(config);
        self
    }

    /// Validate the configuration and build the widget.
    pub fn build(self) -> Result<Typeahead<T, K>> {
        self.config.validate()?;

        #[cfg(feature = "async")]
        let runtime = match (self.runtime, self.runtime_config) {
            (Some(runtime), _) => Some(runtime),
            (None, Some(config)) => Some(Arc::new(
                AsyncRuntime::new(config).map_err(CoreError::from)?,
            )),
            (None, None) => None,
        };

        #[allow(unused_mut)]
        let mut widget = Typeahead::new(self.source, self.extractors, self.config);

        #[cfg(feature = "async")]
        if let Some(runtime) = runtime {
            widget = widget.with_runtime(runtime);
        }

        Ok(widget)
    }
}
