//! Tokio-backed execution of candidate retrievals.
//!
//! [`RetrievalDriver`] runs each retrieval future on an [`AsyncRuntime`]
//! and hands the outcome back through a channel. Nothing here touches
//! widget state: completions are applied on the UI thread when the widget
//! drains them.

use std::sync::Arc;

use tokio::sync::mpsc;

use typeahead_core::logging::targets;
use typeahead_core::{AsyncCancellationToken, AsyncRuntime};

use crate::error::RetrievalError;
use crate::source::{RetrievalRequest, Retriever};

/// A finished retrieval, waiting to be applied.
#[derive(Debug)]
pub struct Completed<T> {
    /// The request this result answers.
    pub request: RetrievalRequest,
    /// What the retriever produced.
    pub result: Result<Vec<T>, RetrievalError>,
}

/// Spawns retrievals and collects their results.
pub struct RetrievalDriver<T> {
    runtime: Arc<AsyncRuntime>,
    token: AsyncCancellationToken,
    completed_tx: mpsc::UnboundedSender<Completed<T>>,
    completed_rx: mpsc::UnboundedReceiver<Completed<T>>,
    dispatched: u64,
}

impl<T: Send + 'static> RetrievalDriver<T> {
    /// Create a driver spawning onto `runtime`.
    pub fn new(runtime: Arc<AsyncRuntime>) -> Self {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            token: AsyncCancellationToken::new(),
            completed_tx,
            completed_rx,
            dispatched: 0,
        }
    }

    /// The runtime retrievals run on.
    pub fn runtime(&self) -> &Arc<AsyncRuntime> {
        &self.runtime
    }

    /// Number of retrievals dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Start `request` on the runtime.
    ///
    /// The retrieval is abandoned if [`cancel_all`](Self::cancel_all) runs
    /// before it finishes.
    pub fn dispatch(&mut self, retriever: Arc<dyn Retriever<T>>, request: RetrievalRequest) {
        tracing::debug!(
            target: targets::RUNTIME,
            request = request.id.as_u64(),
            query = %request.query,
            "dispatching retrieval"
        );

        let future = retriever.retrieve(request.query.clone());
        let completed_tx = self.completed_tx.clone();
        self.dispatched += 1;

        // The task handle is not needed; results come back over the channel.
        let _ = self.runtime.spawn_until_cancelled(
            async move {
                let result = future.await;
                let _ = completed_tx.send(Completed { request, result });
            },
            &self.token,
        );
    }

    /// Take a finished retrieval without waiting.
    pub fn try_next(&mut self) -> Option<Completed<T>> {
        self.completed_rx.try_recv().ok()
    }

    /// Wait for the next finished retrieval.
    pub async fn next(&mut self) -> Option<Completed<T>> {
        self.completed_rx.recv().await
    }

    /// Abandon every outstanding retrieval and drop undelivered results.
    ///
    /// The driver stays usable; later dispatches run under a fresh token.
    pub fn cancel_all(&mut self) {
        self.token.cancel();
        self.token = AsyncCancellationToken::new();

        let mut dropped = 0;
        while self.completed_rx.try_recv().is_ok() {
            dropped += 1;
        }
        tracing::debug!(target: targets::RUNTIME, dropped, "outstanding retrievals cancelled");
    }
}

impl<T> std::fmt::Debug for RetrievalDriver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalDriver")
            .field("runtime", &self.runtime)
            .field("cancelled", &self.token.is_cancelled())
            .field("dispatched", &self.dispatched)
            .finish()
    }
}
