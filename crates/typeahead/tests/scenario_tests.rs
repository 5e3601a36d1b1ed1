//! End-to-end selection scenarios driven through the public widget API.
//!
//! Retrievals here are carried out by hand with `take_pending_requests` and
//! `resolve_retrieval`, and time is explicit, so every test is deterministic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use typeahead::{
    CandidateSource, ClearBehavior, Extractors, FailurePolicy, InputEvent, Key, PanelView,
    PointerHub, PointerTarget, Resolution, RetrievalError, RetrievalStatus, Typeahead,
    TypeaheadConfig,
};

#[derive(Debug, Clone, PartialEq)]
struct Fruit {
    id: u32,
    name: &'static str,
}

fn fruits() -> Vec<Fruit> {
    vec![
        Fruit { id: 1, name: "Apple" },
        Fruit { id: 2, name: "Banana" },
        Fruit { id: 3, name: "Grape" },
    ]
}

fn matching(query: &str) -> Vec<Fruit> {
    let needle = query.to_lowercase();
    fruits()
        .into_iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect()
}

fn extractors() -> Extractors<Fruit, u32> {
    Extractors::new(|f: &Fruit| f.id, |f: &Fruit| f.name.to_string())
}

fn names(widget: &Typeahead<Fruit, u32>) -> Vec<&'static str> {
    widget.visible_candidates().iter().map(|f| f.name).collect()
}

fn static_widget(hub: &PointerHub) -> Typeahead<Fruit, u32> {
    let mut widget = Typeahead::new(
        CandidateSource::fixed(fruits()),
        extractors(),
        TypeaheadConfig::default(),
    );
    widget.mount(hub);
    widget
}

/// A dynamic widget whose retrievals the test resolves by hand.
fn manual_widget(hub: &PointerHub, config: TypeaheadConfig) -> Typeahead<Fruit, u32> {
    let source = CandidateSource::dynamic(|_query: String| async {
        Ok::<_, RetrievalError>(Vec::<Fruit>::new())
    });
    let mut widget = Typeahead::new(source, extractors(), config);
    widget.mount(hub);
    widget
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn type_text(widget: &mut Typeahead<Fruit, u32>, text: &str, at: Instant) {
    for ch in text.chars() {
        widget.handle_at(InputEvent::KeyPress(Key::Character(ch)), at);
    }
}

// ============================================================================
// Static source
// ============================================================================

#[test]
fn test_focus_navigate_commit() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    widget.handle(InputEvent::Focus);
    assert!(widget.is_panel_visible());
    assert_eq!(names(&widget), vec!["Apple", "Banana", "Grape"]);
    assert_eq!(widget.highlighted_index(), 0);

    widget.handle(InputEvent::KeyPress(Key::ArrowDown));
    assert_eq!(widget.highlighted_index(), 1);

    widget.handle(InputEvent::KeyPress(Key::Enter));
    assert_eq!(widget.query_text(), "Banana");
    assert_eq!(widget.committed_value().map(|f| f.id), Some(2));
    assert!(!widget.is_panel_visible());
    assert_eq!(widget.highlighted_index(), -1);
}

#[test]
fn test_type_then_enter_commits_first_match() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    type_text(&mut widget, "ap", Instant::now());
    assert_eq!(names(&widget)[0], "Apple");
    assert_eq!(widget.highlighted_index(), 0);

    widget.handle(InputEvent::KeyPress(Key::Enter));
    assert_eq!(widget.committed_value().map(|f| f.id), Some(1));
    assert_eq!(widget.query_text(), "Apple");
    assert!(!widget.is_panel_visible());

    // Committing again changes nothing.
    widget.handle(InputEvent::Focus);
    widget.handle(InputEvent::KeyPress(Key::Enter));
    assert_eq!(widget.committed_value().map(|f| f.id), Some(1));
    assert_eq!(widget.query_text(), "Apple");
}

#[test]
fn test_full_label_round_trip() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    type_text(&mut widget, "Banana", Instant::now());
    assert_eq!(names(&widget), vec!["Banana"]);

    widget.handle(InputEvent::KeyPress(Key::Enter));
    assert_eq!(widget.committed_value().map(|f| f.id), Some(2));
    assert_eq!(widget.query_text(), "Banana");
    assert!(!widget.is_panel_visible());
}

#[test]
fn test_typing_filters_case_insensitively() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    type_text(&mut widget, "AP", Instant::now());
    assert!(widget.is_panel_visible());
    assert_eq!(names(&widget), vec!["Apple", "Grape"]);

    widget.handle(InputEvent::KeyPress(Key::ArrowUp));
    assert_eq!(widget.highlighted_index(), 1);
    widget.handle(InputEvent::KeyPress(Key::ArrowDown));
    assert_eq!(widget.highlighted_index(), 0);

    widget.handle(InputEvent::KeyPress(Key::Backspace));
    assert_eq!(widget.query_text(), "A");
    assert_eq!(names(&widget), vec!["Apple", "Banana", "Grape"]);
}

#[test]
fn test_pointer_activation_commits() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    let committed = Arc::new(Mutex::new(Vec::new()));
    let sink = committed.clone();
    widget.committed.connect(move |f: &Fruit| sink.lock().push(f.name));

    widget.handle(InputEvent::PointerDown(PointerTarget::Input));
    widget.handle(InputEvent::PointerMove(PointerTarget::Option(2)));
    assert_eq!(widget.highlighted_index(), 2);

    // The blur that precedes the option press must not close the panel.
    widget.handle(InputEvent::Blur);
    assert!(widget.is_panel_visible());

    widget.handle(InputEvent::PointerDown(PointerTarget::Option(2)));
    assert_eq!(widget.query_text(), "Grape");
    assert_eq!(*committed.lock(), vec!["Grape"]);
}

#[test]
fn test_outside_click_keeps_uncommitted_text() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    type_text(&mut widget, "xyz", Instant::now());
    assert!(widget.is_panel_visible());
    assert_eq!(widget.panel_view(), PanelView::Empty);

    widget.handle(InputEvent::KeyPress(Key::Enter));
    assert!(widget.committed_value().is_none());

    widget.handle(InputEvent::PointerDown(PointerTarget::Outside));
    assert!(!widget.is_panel_visible());
    assert_eq!(widget.query_text(), "xyz");
    assert!(widget.committed_value().is_none());
}

#[test]
fn test_edit_after_commit_uncommits() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    widget
        .committed_value_changed
        .connect(move |v: &Option<Fruit>| sink.lock().push(v.as_ref().map(|f| f.id)));

    widget.handle(InputEvent::Focus);
    widget.handle(InputEvent::KeyPress(Key::Enter));
    assert_eq!(widget.query_text(), "Apple");

    widget.handle(InputEvent::KeyPress(Key::Backspace));
    assert_eq!(widget.query_text(), "Appl");
    assert!(widget.committed_value().is_none());
    assert!(widget.is_panel_visible());
    assert_eq!(*changes.lock(), vec![Some(1), None]);
}

#[test]
fn test_reopen_highlights_committed() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    widget.handle(InputEvent::Focus);
    widget.handle(InputEvent::PointerDown(PointerTarget::Option(2)));
    widget.handle(InputEvent::Focus);

    assert!(widget.is_panel_visible());
    assert_eq!(widget.highlighted_index(), 2);

    widget.handle(InputEvent::KeyPress(Key::Escape));
    assert!(!widget.is_panel_visible());
    assert_eq!(widget.query_text(), "Grape");
    assert_eq!(widget.committed_value().map(|f| f.id), Some(3));
}

#[test]
fn test_clear_behaviors() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);
    let cleared = Arc::new(Mutex::new(0));
    let sink = cleared.clone();
    widget.cleared.connect(move |_| *sink.lock() += 1);

    widget.handle(InputEvent::Focus);
    widget.handle(InputEvent::KeyPress(Key::Enter));
    widget.handle(InputEvent::PointerDown(PointerTarget::ClearButton));
    assert_eq!(widget.query_text(), "");
    assert!(widget.committed_value().is_none());
    assert!(widget.is_panel_visible());
    assert_eq!(*cleared.lock(), 1);

    let mut closing = Typeahead::new(
        CandidateSource::fixed(fruits()),
        extractors(),
        TypeaheadConfig::default().with_clear_behavior(ClearBehavior::Close),
    );
    closing.mount(&hub);
    closing.handle(InputEvent::Focus);
    closing.handle(InputEvent::PointerDown(PointerTarget::ClearButton));
    assert!(!closing.is_panel_visible());
}

#[test]
fn test_teardown_then_remount() {
    let hub = PointerHub::new();
    let mut widget = static_widget(&hub);

    widget.handle(InputEvent::Focus);
    widget.handle(InputEvent::KeyPress(Key::Enter));
    widget.unmount();

    assert_eq!(widget.query_text(), "");
    assert!(widget.committed_value().is_none());
    assert_eq!(hub.connection_count(), 0);
    assert!(!widget.handle(InputEvent::Focus));

    widget.mount(&hub);
    widget.mount(&hub);
    assert_eq!(hub.connection_count(), 1);
    assert!(widget.handle(InputEvent::Focus));
    assert_eq!(names(&widget), vec!["Apple", "Banana", "Grape"]);
}

// ============================================================================
// Dynamic source
// ============================================================================

#[test]
fn test_initial_retrieval_on_mount() {
    let hub = PointerHub::new();
    let mut widget = manual_widget(&hub, TypeaheadConfig::default());

    let requests = widget.take_pending_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "");
    assert_eq!(widget.retrieval_status(), RetrievalStatus::Pending);

    widget.handle(InputEvent::Focus);
    assert_eq!(widget.panel_view(), PanelView::Loading);

    assert_eq!(
        widget.resolve_retrieval(&requests[0], Ok(fruits())),
        Resolution::Applied
    );
    assert_eq!(names(&widget), vec!["Apple", "Banana", "Grape"]);
    assert_eq!(widget.highlighted_index(), 0);
}

#[test]
fn test_debounce_collapses_rapid_typing() {
    let hub = PointerHub::new();
    let config = TypeaheadConfig::default().with_retrieve_on_mount(false);
    let mut widget = manual_widget(&hub, config);
    let start = Instant::now();

    widget.handle_at(InputEvent::KeyPress(Key::Character('c')), start);
    widget.handle_at(InputEvent::KeyPress(Key::Character('a')), start + ms(50));
    widget.handle_at(InputEvent::KeyPress(Key::Character('t')), start + ms(100));

    let mut issued = 0;
    for step in 0..=20 {
        if widget.tick_at(start + ms(step * 50)) {
            issued += 1;
        }
    }

    let requests = widget.take_pending_requests();
    assert_eq!(issued, 1);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "cat");
}

#[test]
fn test_out_of_order_results_keep_latest() {
    let hub = PointerHub::new();
    let config = TypeaheadConfig::default().with_retrieve_on_mount(false);
    let mut widget = manual_widget(&hub, config);
    let start = Instant::now();

    type_text(&mut widget, "a", start);
    assert!(widget.tick_at(start + ms(300)));
    type_text(&mut widget, "n", start + ms(310));
    assert!(widget.tick_at(start + ms(610)));

    let requests = widget.take_pending_requests();
    let queries: Vec<&str> = requests.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(queries, vec!["a", "an"]);

    // The newer query answers first; the older answer arrives late.
    assert_eq!(
        widget.resolve_retrieval(&requests[1], Ok(matching("an"))),
        Resolution::Applied
    );
    assert_eq!(
        widget.resolve_retrieval(&requests[0], Ok(matching("a"))),
        Resolution::Stale
    );
    assert_eq!(names(&widget), vec!["Banana"]);
    assert_eq!(widget.candidate_set().len(), 1);
}

#[test]
fn test_stale_result_before_latest() {
    let hub = PointerHub::new();
    let config = TypeaheadConfig::default().with_retrieve_on_mount(false);
    let mut widget = manual_widget(&hub, config);
    let start = Instant::now();

    type_text(&mut widget, "a", start);
    widget.tick_at(start + ms(300));
    type_text(&mut widget, "n", start + ms(310));
    widget.tick_at(start + ms(610));
    let requests = widget.take_pending_requests();

    assert_eq!(
        widget.resolve_retrieval(&requests[0], Ok(matching("a"))),
        Resolution::Stale
    );
    assert_eq!(widget.retrieval_status(), RetrievalStatus::Pending);
    assert_eq!(widget.panel_view(), PanelView::Loading);

    widget.resolve_retrieval(&requests[1], Ok(matching("an")));
    assert_eq!(names(&widget), vec!["Banana"]);
}

#[test]
fn test_failure_clears_and_reports() {
    let hub = PointerHub::new();
    let mut widget = manual_widget(&hub, TypeaheadConfig::default());
    let initial = widget.take_pending_requests();
    widget.resolve_retrieval(&initial[0], Ok(fruits()));

    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = failures.clone();
    widget
        .retrieval_failed
        .connect(move |e: &RetrievalError| sink.lock().push(e.clone()));

    let start = Instant::now();
    type_text(&mut widget, "b", start);
    assert_eq!(names(&widget), vec!["Banana"]);
    widget.tick_at(start + ms(300));
    let request = widget.take_pending_requests().remove(0);

    let resolution = widget.resolve_retrieval(&request, Err(RetrievalError::failed("offline")));
    assert_eq!(resolution, Resolution::Failed(RetrievalError::failed("offline")));
    assert_eq!(*failures.lock(), vec![RetrievalError::failed("offline")]);
    assert!(widget.candidate_set().is_empty());
    assert_eq!(widget.panel_view(), PanelView::Empty);
    assert_eq!(widget.last_error(), Some(&RetrievalError::failed("offline")));
}

#[test]
fn test_failure_keeps_last_known() {
    let hub = PointerHub::new();
    let config = TypeaheadConfig::default().with_failure_policy(FailurePolicy::KeepLastKnown);
    let mut widget = manual_widget(&hub, config);
    let initial = widget.take_pending_requests();
    widget.resolve_retrieval(&initial[0], Ok(fruits()));

    let start = Instant::now();
    type_text(&mut widget, "g", start);
    widget.tick_at(start + ms(300));
    let request = widget.take_pending_requests().remove(0);
    widget.resolve_retrieval(&request, Err(RetrievalError::TimedOut));

    assert_eq!(widget.candidate_set().len(), 3);
    assert_eq!(names(&widget), vec!["Grape"]);
}

#[test]
fn test_commit_cancels_pending_query() {
    let hub = PointerHub::new();
    let mut widget = manual_widget(&hub, TypeaheadConfig::default());
    let initial = widget.take_pending_requests();
    widget.resolve_retrieval(&initial[0], Ok(fruits()));

    let start = Instant::now();
    type_text(&mut widget, "ap", start);
    widget.handle_at(InputEvent::KeyPress(Key::Enter), start + ms(100));
    assert_eq!(widget.query_text(), "Apple");

    assert!(!widget.tick_at(start + ms(1000)));
    assert!(widget.take_pending_requests().is_empty());
}

#[test]
fn test_unmount_discards_in_flight_and_pending() {
    let hub = PointerHub::new();
    let config = TypeaheadConfig::default().with_retrieve_on_mount(false);
    let mut widget = manual_widget(&hub, config);
    let start = Instant::now();

    let signals = Arc::new(Mutex::new(0));
    let sink = signals.clone();
    widget.query_text_changed.connect(move |_| *sink.lock() += 1);

    type_text(&mut widget, "a", start);
    widget.tick_at(start + ms(300));
    let in_flight = widget.take_pending_requests().remove(0);
    type_text(&mut widget, "n", start + ms(400));
    assert!(widget.time_until_next_tick(start + ms(400)).is_some());

    widget.unmount();
    let emitted = *signals.lock();

    assert_eq!(
        widget.resolve_retrieval(&in_flight, Ok(fruits())),
        Resolution::Detached
    );
    assert!(!widget.tick_at(start + ms(2000)));
    assert!(widget.take_pending_requests().is_empty());
    assert!(widget.candidate_set().is_empty());
    assert_eq!(*signals.lock(), emitted);
}

#[test]
fn test_remount_ignores_results_from_previous_mount() {
    let hub = PointerHub::new();
    let mut widget = manual_widget(&hub, TypeaheadConfig::default());
    let from_old_mount = widget.take_pending_requests().remove(0);

    widget.unmount();
    widget.mount(&hub);
    let current = widget.take_pending_requests().remove(0);
    assert_eq!(current.query, from_old_mount.query);

    let leftover = vec![Fruit { id: 99, name: "Leftover" }];
    assert_eq!(
        widget.resolve_retrieval(&from_old_mount, Ok(leftover)),
        Resolution::Detached
    );
    assert!(widget.candidate_set().is_empty());
    assert_eq!(widget.retrieval_status(), RetrievalStatus::Pending);

    assert_eq!(
        widget.resolve_retrieval(&current, Ok(fruits())),
        Resolution::Applied
    );
    assert_eq!(widget.candidate_set().len(), 3);
}
