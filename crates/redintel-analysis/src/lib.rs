//! LLM analysis providers for redintel reports.
//!
//! The pipeline renders prompts; this crate turns a prompt into report text
//! through a pluggable [`AnalysisProvider`]. Production providers speak the
//! OpenAI-compatible chat-completions shape against different vendors;
//! [`MockProvider`] keeps tests offline.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub mod chat;

pub use chat::{ChatCompletionsProvider, DEEPSEEK_API_BASE, QWEN_API_BASE};

/// Failure modes of a report generation call.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Network-level failure: connection reset, DNS, request timeout.
    #[error("HTTP error: {context}")]
    Http { context: String },

    /// HTTP 401/403; the API key is wrong or expired.
    #[error("authentication rejected with status {status}")]
    Auth { status: u16 },

    /// HTTP 429.
    #[error("rate limited by analysis provider")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} from analysis provider")]
    UnexpectedStatus { status: u16 },

    /// Response parsed but carried no usable completion.
    #[error("malformed completion: {reason}")]
    Malformed { reason: String },
}

/// Text generation capability behind the report commands.
///
/// One call corresponds to one completion request. Providers own their HTTP
/// details; callers own fallback behavior when generation fails.
pub trait AnalysisProvider {
    fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

/// Offline provider returning a canned response, with a call counter so
/// tests can assert how often generation ran.
#[derive(Debug, Clone)]
pub struct MockProvider {
    response: String,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockProvider {
    #[must_use]
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// A provider whose every call fails, for exercising fallback paths.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AnalysisProvider for MockProvider {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AnalysisError::Http {
                context: "mock failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}
