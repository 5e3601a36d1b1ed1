//! A scripted typeahead session against a slow fruit "service".
//!
//! Run with: cargo run -p typeahead --example fruit_picker
//!
//! Set `RUST_LOG=typeahead=debug` to watch debouncing and stale results.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;
use typeahead::{
    AsyncRuntime, CandidateSource, Extractors, InputEvent, Key, PointerHub, RetrievalError,
    TextPanel, Typeahead, TypeaheadConfig,
};

const FRUITS: &[&str] = &[
    "Apple", "Apricot", "Banana", "Blackberry", "Cherry", "Grape", "Mango", "Orange", "Papaya",
    "Pineapple", "Plum",
];

fn fruit_service() -> CandidateSource<String> {
    CandidateSource::dynamic(|query: String| async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        let needle = query.to_lowercase();
        Ok::<_, RetrievalError>(
            FRUITS
                .iter()
                .filter(|name| name.to_lowercase().contains(&needle))
                .map(|name| name.to_string())
                .collect::<Vec<_>>(),
        )
    })
}

fn show(widget: &Typeahead<String, String>, caption: &str) {
    let mut panel = TextPanel::new();
    widget.paint(&mut panel);
    println!("-- {caption}: input = {:?}", widget.query_text());
    for line in &panel.lines {
        println!("   {line}");
    }
}

/// Let the debounce fire and apply whatever the service answers.
async fn settle(widget: &mut Typeahead<String, String>) {
    if let Some(wait) = widget.time_until_next_tick(Instant::now()) {
        tokio::time::sleep(wait).await;
    }
    if widget.tick() {
        widget.next_completion().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> typeahead::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let runtime = Arc::new(AsyncRuntime::from_handle(tokio::runtime::Handle::current()));
    let mut widget = Typeahead::builder(
        fruit_service(),
        Extractors::new(|s: &String| s.clone(), |s: &String| s.clone()),
    )
    .config(
        TypeaheadConfig::default()
            .with_debounce(Duration::from_millis(150))
            .with_max_visible_rows(5),
    )
    .runtime(runtime)
    .build()?;

    let hub = PointerHub::new();
    widget.mount(&hub);
    widget.next_completion().await;

    widget.committed.connect(|fruit: &String| println!("** committed {fruit}"));

    widget.handle(InputEvent::Focus);
    show(&widget, "focused");

    for ch in "ap".chars() {
        widget.handle(InputEvent::KeyPress(Key::Character(ch)));
    }
    show(&widget, "typed, filtered locally");

    settle(&mut widget).await;
    show(&widget, "service answered");

    widget.handle(InputEvent::KeyPress(Key::ArrowDown));
    widget.handle(InputEvent::KeyPress(Key::ArrowDown));
    show(&widget, "moved down twice");

    widget.handle(InputEvent::KeyPress(Key::Enter));
    show(&widget, "after enter");

    widget.unmount();
    Ok(())
}
