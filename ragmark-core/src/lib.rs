//! Shared data model, error taxonomy, and configuration for RAGMark.
//!
//! This crate provides:
//! - The document and result types exchanged between pipeline stages
//! - The [`EvalError`] taxonomy and a shared [`Result`] alias
//! - The validated [`EvalConfig`] with its builder

mod config;
mod error;
mod types;

pub use config::{EvalConfig, EvalConfigBuilder, HallucinationSource};
pub use error::{EvalError, Result};
pub use types::{
    ContextData, ContextDocument, ConversationDocument, CostEstimate, EvalMethod, EvaluationInput,
    LatencyBreakdown, Reasoning, ScoreResult, Turn, VectorRecord,
};
