//! Candidate sources and retrieval bookkeeping.
//!
//! A [`CandidateSource`] is either a fixed list or a [`Retriever`] that
//! produces candidates for a query asynchronously. [`SourceAdapter`] owns
//! the current candidate set and decides which retrieval results are still
//! relevant: only a result for the most recently requested query is
//! applied, so out-of-order completions never overwrite newer data.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use typeahead_core::logging::targets;

use crate::config::FailurePolicy;
use crate::error::RetrievalError;

/// The boxed future returned by a [`Retriever`].
pub type RetrievalFuture<T> =
    Pin<Box<dyn Future<Output = Result<Vec<T>, RetrievalError>> + Send + 'static>>;

/// Produces candidates for a query, possibly asynchronously.
///
/// Implemented for any `Fn(String) -> impl Future` closure:
///
/// ```
/// use typeahead::{CandidateSource, RetrievalError};
///
/// let source: CandidateSource<String> = CandidateSource::dynamic(|query: String| async move {
///     Ok::<_, RetrievalError>(vec![format!("{query}1"), format!("{query}2")])
/// });
/// assert!(source.is_dynamic());
/// ```
pub trait Retriever<T>: Send + Sync {
    /// Start retrieving candidates for `query`.
    fn retrieve(&self, query: String) -> RetrievalFuture<T>;
}

impl<T, F, Fut> Retriever<T> for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, RetrievalError>> + Send + 'static,
{
    fn retrieve(&self, query: String) -> RetrievalFuture<T> {
        Box::pin(self(query))
    }
}

/// Where candidates come from.
pub enum CandidateSource<T> {
    /// A fixed list, filtered locally.
    Static(Vec<T>),
    /// A retriever queried with the debounced input text.
    Dynamic(Arc<dyn Retriever<T>>),
}

impl<T> CandidateSource<T> {
    /// A fixed candidate list.
    pub fn fixed(items: impl IntoIterator<Item = T>) -> Self {
        Self::Static(items.into_iter().collect())
    }

    /// A source backed by a retriever.
    pub fn dynamic<R>(retriever: R) -> Self
    where
        R: Retriever<T> + 'static,
    {
        Self::Dynamic(Arc::new(retriever))
    }

    /// Whether candidates are retrieved per query.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl<T> std::fmt::Debug for CandidateSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(items) => f.debug_tuple("Static").field(&items.len()).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").finish_non_exhaustive(),
        }
    }
}

/// Progress of the most recent retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalStatus {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A retrieval for the current query is outstanding.
    Pending,
    /// The candidate set reflects the current query (or its failure).
    Ready,
}

/// Identifies one retrieval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// The raw request number.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A retrieval the host (or the driver) must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    /// Request identifier, increasing per adapter.
    pub id: RequestId,
    /// The query text the request was issued for.
    pub query: String,
}

/// What happened to a retrieval result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The result replaced the candidate set.
    Applied,
    /// The result belonged to an older query and was discarded.
    Stale,
    /// The current query failed; the failure policy was applied.
    Failed(RetrievalError),
    /// The adapter was detached; the result was ignored.
    Detached,
}

/// Holds the candidate set and filters out stale retrieval results.
pub struct SourceAdapter<T> {
    source: CandidateSource<T>,
    candidates: Vec<T>,
    status: RetrievalStatus,
    current_query: Option<String>,
    next_request: u64,
    /// Requests numbered below this were issued before the last detach.
    first_live_request: u64,
    failure_policy: FailurePolicy,
    attached: bool,
}

impl<T: Clone> SourceAdapter<T> {
    /// Wrap a candidate source.
    ///
    /// A static source is immediately `Ready` with its full list.
    pub fn new(source: CandidateSource<T>, failure_policy: FailurePolicy) -> Self {
        let (candidates, status) = match &source {
            CandidateSource::Static(items) => (items.clone(), RetrievalStatus::Ready),
            CandidateSource::Dynamic(_) => (Vec::new(), RetrievalStatus::Idle),
        };
        Self {
            source,
            candidates,
            status,
            current_query: None,
            next_request: 1,
            first_live_request: 1,
            failure_policy,
            attached: true,
        }
    }

    /// The current candidate set.
    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    /// Progress of the most recent retrieval.
    pub fn status(&self) -> RetrievalStatus {
        self.status
    }

    /// Whether the source retrieves per query.
    pub fn is_dynamic(&self) -> bool {
        self.source.is_dynamic()
    }

    /// Whether results are still being accepted.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The query of the most recent request.
    pub fn current_query(&self) -> Option<&str> {
        self.current_query.as_deref()
    }

    /// The retriever of a dynamic source.
    pub fn retriever(&self) -> Option<Arc<dyn Retriever<T>>> {
        match &self.source {
            CandidateSource::Dynamic(retriever) => Some(Arc::clone(retriever)),
            CandidateSource::Static(_) => None,
        }
    }

    /// Start a retrieval for `query`, making it the current query.
    ///
    /// Returns `None` for static sources and while detached.
    pub fn begin(&mut self, query: &str) -> Option<RetrievalRequest> {
        if !self.attached || !self.is_dynamic() {
            return None;
        }

        let id = RequestId(self.next_request);
        self.next_request += 1;
        self.current_query = Some(query.to_string());
        self.status = RetrievalStatus::Pending;

        tracing::debug!(target: targets::SOURCE, request = id.0, query, "retrieval started");
        Some(RetrievalRequest {
            id,
            query: query.to_string(),
        })
    }

    /// Apply the outcome of `request` if it is still relevant.
    pub fn resolve(
        &mut self,
        request: &RetrievalRequest,
        result: Result<Vec<T>, RetrievalError>,
    ) -> Resolution {
        if !self.attached || request.id.0 < self.first_live_request {
            tracing::trace!(target: targets::SOURCE, request = request.id.0, "result after detach ignored");
            return Resolution::Detached;
        }
        if self.current_query.as_deref() != Some(request.query.as_str()) {
            tracing::debug!(
                target: targets::SOURCE,
                request = request.id.0,
                query = %request.query,
                current = ?self.current_query,
                "stale result discarded"
            );
            return Resolution::Stale;
        }

        self.status = RetrievalStatus::Ready;
        match result {
            Ok(items) => {
                tracing::debug!(
                    target: targets::SOURCE,
                    request = request.id.0,
                    count = items.len(),
                    "candidates replaced"
                );
                self.candidates = items;
                Resolution::Applied
            }
            Err(error) => {
                tracing::warn!(
                    target: targets::SOURCE,
                    request = request.id.0,
                    query = %request.query,
                    %error,
                    policy = ?self.failure_policy,
                    "retrieval failed"
                );
                if self.failure_policy == FailurePolicy::ClearCandidates {
                    self.candidates.clear();
                }
                Resolution::Failed(error)
            }
        }
    }

    /// Replace the list of a static source.
    ///
    /// Returns `false` for dynamic sources, whose set only changes through
    /// retrieval.
    pub fn replace_static(&mut self, items: Vec<T>) -> bool {
        match &mut self.source {
            CandidateSource::Static(list) => {
                *list = items.clone();
                self.candidates = items;
                true
            }
            CandidateSource::Dynamic(_) => false,
        }
    }

    /// Stop accepting results. Outstanding retrievals resolve as no-ops,
    /// even after a later [`attach`](Self::attach).
    pub fn detach(&mut self) {
        self.attached = false;
        self.first_live_request = self.next_request;
        self.current_query = None;
        if self.status == RetrievalStatus::Pending {
            self.status = RetrievalStatus::Idle;
        }
    }

    /// Accept results again after a [`detach`](Self::detach).
    pub fn attach(&mut self) {
        self.attached = true;
    }
}

impl<T> std::fmt::Debug for SourceAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAdapter")
            .field("source", &self.source)
            .field("candidates", &self.candidates.len())
            .field("status", &self.status)
            .field("current_query", &self.current_query)
            .field("attached", &self.attached)
            .finish()
    }
}
