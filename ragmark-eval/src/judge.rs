//! Judge trait for external LLM graders.

use async_trait::async_trait;

use ragmark_core::Result;

/// An external large-language-model used as an automated grader.
///
/// Implementations wrap a hosted inference endpoint behind a single
/// blocking completion call. Failures (network, auth, quota, bad status)
/// surface as [`EvalError::ExternalService`](ragmark_core::EvalError::ExternalService)
/// rather than being swallowed into a score.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Send a grading prompt and return the judge's free-text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
