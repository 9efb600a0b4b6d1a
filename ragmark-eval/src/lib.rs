//! Scoring strategies and evaluation orchestration for RAGMark.
//!
//! This crate provides:
//! - The [`RelevanceStrategy`] family (lexical, embedding, judge) behind
//!   one trait contract, selected by [`EvalMethod`](ragmark_core::EvalMethod) dispatch
//! - The [`CompositeJudge`] path grading relevance and faithfulness together
//! - The completeness and hallucination scorers and the cost estimator
//! - The [`Evaluator`] orchestrator that aggregates everything into a
//!   [`ScoreResult`](ragmark_core::ScoreResult)
//!
//! Concrete providers are feature-gated: `fastembed` enables the local
//! AllMiniLML6V2 embedding provider; `gemini` enables the Gemini judge.

mod composite;
mod cost;
mod embedding;
mod evaluator;
mod judge;
mod lexical;
mod scorers;
mod strategy;

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "fastembed")]
mod local;

pub use composite::{CompositeAssessment, CompositeJudge};
pub use cost::estimate_cost;
pub use embedding::EmbeddingProvider;
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use judge::Judge;
pub use lexical::lexical_relevance;
pub use scorers::{completeness_score, hallucination_score};
pub use strategy::{EmbeddingStrategy, JudgeStrategy, LexicalStrategy, RelevanceStrategy};

#[cfg(feature = "gemini")]
pub use gemini::GeminiJudge;
#[cfg(feature = "fastembed")]
pub use local::LocalEmbeddingProvider;
