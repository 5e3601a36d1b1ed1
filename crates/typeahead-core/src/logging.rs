//! Logging facilities for the typeahead widget.
//!
//! The widget is instrumented with the `tracing` crate. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("typeahead=debug")
//!         .init();
//! }
//! ```
//!
//! Every event carries one of the [`targets`] so subsystems can be filtered
//! independently, e.g. `RUST_LOG=typeahead::source=debug` shows retrieval
//! issue/apply/drop decisions only.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "typeahead_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "typeahead_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "typeahead_core::timer";
    /// Async runtime target.
    pub const RUNTIME: &str = "typeahead_core::runtime";
    /// Widget orchestration target.
    pub const WIDGET: &str = "typeahead::widget";
    /// Selection state machine target.
    pub const STATE: &str = "typeahead::state";
    /// Candidate source adapter target.
    pub const SOURCE: &str = "typeahead::source";
    /// Debounce target.
    pub const DEBOUNCE: &str = "typeahead::debounce";
    /// Viewport reconciliation target.
    pub const VIEWPORT: &str = "typeahead::viewport";
    /// Keyboard/pointer interpretation target.
    pub const NAVIGATION: &str = "typeahead::navigation";
    /// Timing spans from [`PerfSpan`](super::PerfSpan).
    pub const PERF: &str = "typeahead::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time operations such as filtering a large candidate set.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it doesn't panic without a subscriber
        let _span = PerfSpan::new("test_operation");
        tracing::debug!(target: targets::CORE, value = 1, "inside span");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::STATE,
            targets::SOURCE,
            targets::DEBOUNCE,
            targets::VIEWPORT,
            targets::PERF,
        ] {
            assert!(target.starts_with("typeahead::"));
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
    }
}
