//! Core systems for the typeahead widget.
//!
//! This crate provides the framework pieces the widget is built on:
//!
//! - **Signal/Slot System**: Type-safe notifications from the widget to its host
//! - **Timers**: One-shot timers driven by an explicit clock
//! - **Async Runtime**: Tokio bridge for off-thread candidate retrieval
//! - **Logging**: `tracing` targets and helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use typeahead_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use typeahead_core::TimerManager;
//!
//! let start = Instant::now();
//! let mut timers = TimerManager::new();
//! let id = timers.start_one_shot_at(start, Duration::from_millis(300));
//!
//! assert!(timers.process_expired_at(start + Duration::from_millis(100)).is_empty());
//! assert_eq!(timers.process_expired_at(start + Duration::from_millis(300)), vec![id]);
//! ```

#[cfg(feature = "tokio")]
pub mod async_runtime;
mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, TimerError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerManager};

#[cfg(feature = "tokio")]
pub use async_runtime::{
    AsyncCancellationToken, AsyncRuntime, AsyncRuntimeConfig, AsyncRuntimeError, AsyncTaskHandle,
    RuntimeType,
};
