//! The search capability consumed by the collection pipeline.
//!
//! The pipeline depends on this trait, never on a concrete HTTP client, so
//! tests can drive it with in-memory doubles.

use std::future::Future;

use crate::types::{RawPost, TimeHorizon};

/// Failure modes of the external search capability.
///
/// Classification drives the collector's retry logic: transient errors are
/// retried with backoff, permanent errors demote the query immediately.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network-level failure: connection reset, DNS, request timeout.
    #[error("HTTP error: {context}")]
    Http { context: String },

    /// HTTP 429; the source has asked us to back off.
    #[error("rate limited by source (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP 401/403; retrying with the same credentials cannot succeed.
    #[error("authentication rejected with status {status}")]
    Auth { status: u16 },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Response body does not parse; retrying won't fix it.
    #[error("malformed payload for {context}: {reason}")]
    Malformed { context: String, reason: String },
}

impl SourceError {
    /// `true` for errors worth retrying after a backoff delay.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::Http { .. } | SourceError::RateLimited { .. }
        )
    }
}

/// Search capability over a set of channels.
///
/// One call corresponds to one outbound query; implementations own rate
/// limiting and per-call admission, the pipeline owns retries.
pub trait SearchSource {
    /// Search `channels` for `query`, bounded by `horizon` and `limit`.
    ///
    /// `sort` is a source-specific ordering hint (`hot`, `top`, `relevance`).
    fn search(
        &self,
        channels: &[String],
        query: &str,
        sort: &str,
        horizon: TimeHorizon,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawPost>, SourceError>> + Send;
}
