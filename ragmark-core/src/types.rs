//! Data types for conversation documents, evaluation inputs, and results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::EvalError;

/// Deserialize an opaque identifier that may arrive as a JSON string,
/// number, or null. Fixture files carry numeric ids; emergency extraction
/// yields strings.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// A single conversation turn.
///
/// Parsed once from raw input, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// The speaker role. Matched case-insensitively by prefix ("user", "ai"),
    /// so variants like "AI_assistant" are accepted.
    #[serde(default)]
    pub role: String,
    /// The turn's message text, possibly empty.
    #[serde(default)]
    pub message: String,
}

/// A conversation document: opaque identifiers plus chronologically
/// ordered turns. Extraction scans the turns from the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationDocument {
    /// Opaque chat identifier.
    #[serde(default, deserialize_with = "opaque_id")]
    pub chat_id: String,
    /// Opaque user identifier.
    #[serde(default, deserialize_with = "opaque_id")]
    pub user_id: String,
    /// Turns in the order they occurred.
    #[serde(default)]
    pub conversation_turns: Vec<Turn>,
}

/// One retrieved vector record; only the snippet text matters downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// The snippet text. A missing field becomes an empty string.
    #[serde(default)]
    pub text: String,
}

/// The payload section of a context document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextData {
    /// Retrieved records in stored order.
    #[serde(default)]
    pub vector_data: Vec<VectorRecord>,
}

/// A context document wrapping retrieved vector records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextDocument {
    /// The nested payload holding `vector_data`.
    #[serde(default)]
    pub data: ContextData,
}

/// The normalized unit of work passed to the evaluator.
///
/// Immutable once built; also persisted as the intermediate artifact
/// between preprocessing and evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationInput {
    /// Opaque chat identifier carried through from the conversation document.
    pub chat_id: String,
    /// Opaque user identifier carried through from the conversation document.
    pub user_id: String,
    /// The most recent user message, or empty if none was found.
    pub user_message: String,
    /// The most recent AI response, or empty if none was found.
    pub ai_response: String,
    /// Context snippets in stored order, truncated to the configured cap.
    pub context: Vec<String>,
}

/// The relevance-scoring method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMethod {
    /// Call-local TF-IDF cosine similarity.
    Lexical,
    /// Dense sentence-embedding cosine similarity.
    Embedding,
    /// Single-score LLM judge.
    Judge,
    /// Composite LLM judge returning relevance and faithfulness together.
    Composite,
}

impl EvalMethod {
    /// The lowercase wire name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvalMethod::Lexical => "lexical",
            EvalMethod::Embedding => "embedding",
            EvalMethod::Judge => "judge",
            EvalMethod::Composite => "composite",
        }
    }
}

impl fmt::Display for EvalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvalMethod {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(EvalMethod::Lexical),
            "embedding" => Ok(EvalMethod::Embedding),
            "judge" => Ok(EvalMethod::Judge),
            "composite" => Ok(EvalMethod::Composite),
            other => Err(EvalError::InvalidMethod(other.to_string())),
        }
    }
}

/// Wall-clock latency of each scorer call, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatencyBreakdown {
    /// Latency of the relevance strategy call.
    pub relevance: u64,
    /// Latency of the completeness scorer call.
    pub completeness: u64,
    /// Latency of the hallucination scorer call.
    pub hallucination: u64,
}

/// Deterministic token/cost approximation for a response text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostEstimate {
    /// Estimated token count, always at least 1.
    pub tokens_estimated: u64,
    /// Estimated cost in USD, rounded to 6 decimals.
    pub cost_usd: f64,
}

/// Judge reasoning strings from the composite path, kept for observability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reasoning {
    /// Why the judge assigned its relevance score.
    pub relevance_reason: String,
    /// Why the judge assigned its faithfulness score.
    pub faithfulness_reason: String,
}

/// The outcome of one evaluation run.
///
/// Created once per run, never mutated, serialized immediately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    /// Unique identifier for this evaluation run.
    pub id: Uuid,
    /// When the evaluation completed.
    pub evaluated_at: DateTime<Utc>,
    /// The relevance method that was used.
    pub method: EvalMethod,
    /// Relevance of the response to the context. Lexical scores lie in
    /// [0, 1]; embedding cosine may be slightly negative; judge scores
    /// are clamped to [0, 1].
    pub relevance: f64,
    /// Fraction of user-query vocabulary echoed in the response, in [0, 1].
    pub completeness: f64,
    /// Fraction of response sentences with low lexical overlap against
    /// context, in [0, 1].
    pub hallucination_score: f64,
    /// Per-scorer wall-clock latency.
    pub latency_ms: LatencyBreakdown,
    /// Token/cost approximation for the response.
    pub cost_estimate: CostEstimate,
    /// Weighted composite of the three metrics, rounded to 4 decimals.
    pub final_score: f64,
    /// Judge reasoning, present only for the composite method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
}
