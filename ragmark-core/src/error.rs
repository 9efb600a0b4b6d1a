//! Error types shared across the RAGMark workspace.

use thiserror::Error;

/// Errors that can occur during an evaluation run.
///
/// Normalization and turn extraction never produce errors — they degrade
/// to best-effort defaults instead (see `ragmark-ingest`). Everything that
/// can abort a run is enumerated here.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An unrecognized evaluation-method selector was supplied.
    #[error("invalid evaluation method '{0}' (expected lexical, embedding, judge, or composite)")]
    InvalidMethod(String),

    /// An external judge call failed (network, auth, quota, bad HTTP status).
    #[error("judge error ({provider}): {message}")]
    ExternalService {
        /// The judge backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The judge replied, but no numeric score could be parsed from the reply.
    #[error("could not parse a numeric score from judge reply: {reply:?}")]
    ScoreParse {
        /// The raw reply text the judge returned.
        reply: String,
    },

    /// An error occurred in the embedding backend.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error, or a provider required by the
    /// selected method was not supplied.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A convenience result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
