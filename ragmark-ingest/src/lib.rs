//! Defensive input normalization and extraction for RAGMark.
//!
//! This crate provides:
//! - A total, four-tier JSON normalizer that never fails
//! - Last-turn extraction from conversation documents
//! - Bounded context snippet selection
//! - Preprocessing of raw text into an [`EvaluationInput`](ragmark_core::EvaluationInput)

mod context;
mod conversation;
mod normalize;
mod preprocess;

pub use context::select_context;
pub use conversation::extract_latest;
pub use normalize::normalize;
pub use preprocess::preprocess;
