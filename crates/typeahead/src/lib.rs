//! A headless typeahead/selection widget.
//!
//! The user types into an input; the widget filters a candidate list (or
//! retrieves one asynchronously, debounced), shows an option panel with
//! keyboard and pointer navigation, and commits exactly one candidate.
//!
//! The widget owns no rendering or event loop. Hosts feed it
//! [`InputEvent`]s, drive [`Typeahead::tick`] and [`Typeahead::pump`], paint
//! it through a [`PanelDelegate`] and observe it through signals.
//!
//! # Modules
//!
//! - [`state`]: the selection state machine
//! - [`filter`]: case-insensitive substring filtering
//! - [`source`]: static and dynamic candidate sources, stale-result handling
//! - [`debounce`]: trailing-edge debouncing on explicit time
//! - [`navigation`]: keyboard/pointer translation
//! - [`viewport`]: scrolling, hit testing and panel placement
//! - [`render`]: the panel render model and delegate hooks
//! - [`subscription`]: document-level outside-press detection
//! - `driver`: tokio-backed retrieval (feature `async`)
//!
//! # Logging
//!
//! Everything logs through `tracing` under the targets listed in
//! [`typeahead_core::logging::targets`]; install a subscriber to see it.

pub mod candidate;
pub mod config;
pub mod debounce;
#[cfg(feature = "async")]
pub mod driver;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod navigation;
pub mod render;
pub mod source;
pub mod state;
pub mod subscription;
pub mod viewport;
mod widget;

pub use candidate::Extractors;
pub use config::{ClearBehavior, FailurePolicy, TypeaheadConfig};
pub use debounce::Debouncer;
#[cfg(feature = "async")]
pub use driver::{Completed, RetrievalDriver};
pub use error::{ConfigError, Result, RetrievalError, TypeaheadError};
pub use geometry::{Point, Rect, Size};
pub use navigation::{InputEvent, Key, NavigationController, PointerTarget};
pub use render::{PanelDelegate, PanelView, RowState, RowView, TextPanel};
pub use source::{
    CandidateSource, RequestId, Resolution, RetrievalFuture, RetrievalRequest, RetrievalStatus,
    Retriever, SourceAdapter,
};
pub use state::{NO_HIGHLIGHT, SelectionEffect, SelectionEvent, SelectionState};
pub use subscription::{OutsidePointerWatch, PointerHub};
pub use viewport::{PanelPlacement, ScrollRequest, ViewportReconciler};
pub use widget::{Typeahead, TypeaheadBuilder};

pub use typeahead_core::{ConnectionGuard, ConnectionId, Signal};
#[cfg(feature = "async")]
pub use typeahead_core::{AsyncRuntime, AsyncRuntimeConfig};
