//! Async runtime integration for the typeahead widget.
//!
//! Candidate retrieval is the only asynchronous work a typeahead performs.
//! This module wraps a Tokio runtime so retrievals can run off the UI thread
//! while their results are delivered back and applied by the UI thread.
//!
//! # Feature Flag
//!
//! This module requires the `tokio` feature (enabled by default).
//!
//! # Example
//!
//! ```no_run
//! use typeahead_core::async_runtime::{AsyncRuntime, AsyncRuntimeConfig};
//!
//! # async fn lookup() -> Vec<String> { Vec::new() }
//! let runtime = AsyncRuntime::new(AsyncRuntimeConfig::default()).unwrap();
//! let handle = runtime.spawn(async { lookup().await });
//! let result = handle.blocking_wait();
//! ```
//!
//! # Runtime Types
//!
//! - **Multi-threaded** (default): Tokio's multi-threaded scheduler.
//! - **Single-threaded**: a current-thread runtime on a dedicated thread,
//!   giving deterministic task ordering.
//! - **Borrowed**: [`AsyncRuntime::from_handle`] wraps a runtime the host
//!   already owns (for example inside `#[tokio::main]`).

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;

use crate::logging::targets;

/// Counter for unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// The type of async runtime to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeType {
    /// Multi-threaded runtime using Tokio's default scheduler.
    #[default]
    MultiThreaded,

    /// Single-threaded runtime on a dedicated thread.
    SingleThreaded,

    /// A runtime owned by the host, reached through a [`Handle`].
    Borrowed,
}

/// Configuration for the async runtime.
#[derive(Debug, Clone)]
pub struct AsyncRuntimeConfig {
    /// The type of runtime to create.
    pub runtime_type: RuntimeType,
    /// Number of worker threads for multi-threaded runtime.
    /// Defaults to the number of CPU cores.
    pub worker_threads: Option<usize>,
    /// Name prefix for runtime threads.
    pub thread_name: String,
}

impl Default for AsyncRuntimeConfig {
    fn default() -> Self {
        Self {
            runtime_type: RuntimeType::MultiThreaded,
            worker_threads: None,
            thread_name: "typeahead-async".to_string(),
        }
    }
}

impl AsyncRuntimeConfig {
    /// Create a configuration for a multi-threaded runtime.
    pub fn multi_threaded() -> Self {
        Self {
            runtime_type: RuntimeType::MultiThreaded,
            ..Default::default()
        }
    }

    /// Create a configuration for a single-threaded runtime.
    pub fn single_threaded() -> Self {
        Self {
            runtime_type: RuntimeType::SingleThreaded,
            ..Default::default()
        }
    }
}

/// A handle to a spawned async task.
#[derive(Debug)]
pub struct AsyncTaskHandle<T> {
    id: u64,
    receiver: oneshot::Receiver<T>,
}

impl<T> AsyncTaskHandle<T> {
    /// Get the unique task ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the task to complete, blocking the current thread.
    ///
    /// Returns `None` if the task was dropped before producing a value.
    /// Do not call this from within an async context.
    pub fn blocking_wait(self) -> Option<T> {
        self.receiver.blocking_recv().ok()
    }

    /// Await the task result.
    pub async fn wait(self) -> Option<T> {
        self.receiver.await.ok()
    }
}

/// A cancellation token for async tasks.
///
/// Supports both polling and async waiting. Clones share the same state.
#[derive(Debug, Clone)]
pub struct AsyncCancellationToken {
    inner: Arc<AsyncCancellationState>,
}

#[derive(Debug)]
struct AsyncCancellationState {
    cancelled: AtomicBool,
    notify: tokio::sync::Notify,
}

impl AsyncCancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AsyncCancellationState {
                cancelled: AtomicBool::new(false),
                notify: tokio::sync::Notify::new(),
            }),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// This sets the cancellation flag and notifies any waiters.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::Release) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait asynchronously until cancellation is requested.
    ///
    /// Returns immediately if already cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for AsyncCancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal state for the single-threaded runtime.
struct SingleThreadedState {
    /// Handle to the runtime thread.
    thread_handle: Mutex<Option<JoinHandle<()>>>,
    /// Shutdown signal sender.
    shutdown_tx: oneshot::Sender<()>,
}

/// The async runtime manager.
pub struct AsyncRuntime {
    /// The owned Tokio runtime (multi-threaded mode). Kept alive so the
    /// runtime does not shut down while tasks are pending.
    #[allow(dead_code)]
    runtime: Option<Runtime>,
    /// Handle to the runtime for spawning tasks.
    handle: Handle,
    /// State for single-threaded runtime.
    single_threaded: Option<SingleThreadedState>,
    /// The runtime type.
    runtime_type: RuntimeType,
    /// Active task count.
    active_tasks: Arc<AtomicU64>,
}

impl AsyncRuntime {
    /// Create a new async runtime with the given configuration.
    pub fn new(config: AsyncRuntimeConfig) -> Result<Self, AsyncRuntimeError> {
        match config.runtime_type {
            RuntimeType::MultiThreaded => Self::new_multi_threaded(config),
            RuntimeType::SingleThreaded => Self::new_single_threaded(config),
            RuntimeType::Borrowed => Handle::try_current()
                .map(Self::from_handle)
                .map_err(|e| AsyncRuntimeError::NoCurrentRuntime(e.to_string())),
        }
    }

    /// Wrap a runtime owned by the host.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            runtime: None,
            handle,
            single_threaded: None,
            runtime_type: RuntimeType::Borrowed,
            active_tasks: Arc::new(AtomicU64::new(0)),
        }
    }

    fn new_multi_threaded(config: AsyncRuntimeConfig) -> Result<Self, AsyncRuntimeError> {
        let mut builder = Builder::new_multi_thread();
        builder.thread_name(&config.thread_name).enable_time();

        if let Some(workers) = config.worker_threads {
            builder.worker_threads(workers);
        }

        let runtime = builder
            .build()
            .map_err(|e| AsyncRuntimeError::CreationFailed(e.to_string()))?;
        let handle = runtime.handle().clone();

        Ok(Self {
            runtime: Some(runtime),
            handle,
            single_threaded: None,
            runtime_type: RuntimeType::MultiThreaded,
            active_tasks: Arc::new(AtomicU64::new(0)),
        })
    }

    fn new_single_threaded(config: AsyncRuntimeConfig) -> Result<Self, AsyncRuntimeError> {
        let (handle_tx, handle_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread_handle = std::thread::Builder::new()
            .name(format!("{}-main", config.thread_name))
            .spawn(move || {
                let runtime = match Builder::new_current_thread().enable_time().build() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = handle_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                let _ = handle_tx.send(Ok(runtime.handle().clone()));

                // Run the runtime until shutdown is signaled.
                runtime.block_on(async {
                    let _ = shutdown_rx.await;
                });
            })
            .map_err(|e| AsyncRuntimeError::CreationFailed(e.to_string()))?;

        let handle = handle_rx
            .recv()
            .map_err(|_| AsyncRuntimeError::CreationFailed("runtime thread exited".to_string()))?
            .map_err(AsyncRuntimeError::CreationFailed)?;

        Ok(Self {
            runtime: None,
            handle,
            single_threaded: Some(SingleThreadedState {
                thread_handle: Mutex::new(Some(thread_handle)),
                shutdown_tx,
            }),
            runtime_type: RuntimeType::SingleThreaded,
            active_tasks: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Get the runtime type.
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    /// Get the number of active tasks.
    pub fn active_tasks(&self) -> u64 {
        self.active_tasks.load(Ordering::Acquire)
    }

    /// Get a handle to the Tokio runtime.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Spawn an async task on the runtime.
    ///
    /// Returns a handle that can be used to wait for the result.
    pub fn spawn<F, T>(&self, future: F) -> AsyncTaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        let active_tasks = self.active_tasks.clone();

        active_tasks.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(target: targets::RUNTIME, task_id = id, "spawning task");

        self.handle.spawn(async move {
            let result = future.await;
            let _ = sender.send(result);
            active_tasks.fetch_sub(1, Ordering::AcqRel);
        });

        AsyncTaskHandle { id, receiver }
    }

    /// Spawn a task that is abandoned as soon as `token` is cancelled.
    ///
    /// Resolves to `None` when cancellation won the race.
    pub fn spawn_until_cancelled<F, T>(
        &self,
        future: F,
        token: &AsyncCancellationToken,
    ) -> AsyncTaskHandle<Option<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let token = token.clone();
        self.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                value = future => Some(value),
            }
        })
    }

    /// Shutdown the runtime gracefully.
    ///
    /// For single-threaded runtimes, this stops the runtime thread.
    pub fn shutdown(mut self) {
        if let Some(state) = self.single_threaded.take() {
            let _ = state.shutdown_tx.send(());
            if let Some(handle) = state.thread_handle.lock().take() {
                let _ = handle.join();
            }
        }
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime")
            .field("runtime_type", &self.runtime_type)
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}

/// Errors that can occur with the async runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncRuntimeError {
    /// Failed to create the runtime.
    CreationFailed(String),
    /// A borrowed runtime was requested outside of any Tokio context.
    NoCurrentRuntime(String),
}

impl std::fmt::Display for AsyncRuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreationFailed(msg) => write!(f, "Failed to create async runtime: {msg}"),
            Self::NoCurrentRuntime(msg) => write!(f, "No Tokio runtime available: {msg}"),
        }
    }
}

impl std::error::Error for AsyncRuntimeError {}
