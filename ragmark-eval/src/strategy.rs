//! Relevance scoring strategies behind a common trait contract.

use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use ragmark_core::{EvalError, EvalMethod, Result};

use crate::embedding::{EmbeddingProvider, cosine_similarity};
use crate::judge::Judge;
use crate::lexical::lexical_relevance;

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid numeric token regex"));

/// A relevance estimator over `(response, context)`.
///
/// All strategies share this contract; the orchestrator selects one by
/// explicit [`EvalMethod`] dispatch. Implementations are deterministic
/// given deterministic inputs, judge-backed strategies excepted.
#[async_trait]
pub trait RelevanceStrategy: Send + Sync {
    /// The method this strategy implements.
    fn method(&self) -> EvalMethod;

    /// Score the relevance of a response against context snippets.
    async fn score(&self, response: &str, context: &[String]) -> Result<f64>;
}

/// TF-IDF cosine relevance. Pure and call-local; see
/// [`lexical_relevance`](crate::lexical_relevance).
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalStrategy;

#[async_trait]
impl RelevanceStrategy for LexicalStrategy {
    fn method(&self) -> EvalMethod {
        EvalMethod::Lexical
    }

    async fn score(&self, response: &str, context: &[String]) -> Result<f64> {
        Ok(lexical_relevance(response, context))
    }
}

/// Dense-embedding cosine relevance.
///
/// Encodes the response and each context snippet with the injected
/// provider, averages the context embeddings, and returns the cosine
/// similarity — unrounded, and not clamped (cosine may be slightly
/// negative for unrelated text).
pub struct EmbeddingStrategy {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingStrategy {
    /// Create a strategy over the given embedding provider.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl RelevanceStrategy for EmbeddingStrategy {
    fn method(&self) -> EvalMethod {
        EvalMethod::Embedding
    }

    async fn score(&self, response: &str, context: &[String]) -> Result<f64> {
        if context.is_empty() {
            return Ok(0.0);
        }

        let mut texts: Vec<&str> = Vec::with_capacity(context.len() + 1);
        texts.push(response);
        texts.extend(context.iter().map(String::as_str));

        let embeddings = self.provider.embed_batch(&texts).await?;
        let (response_embedding, context_embeddings) = embeddings.split_first().ok_or_else(|| {
            EvalError::Embedding {
                provider: "unknown".to_string(),
                message: "provider returned no embeddings".to_string(),
            }
        })?;

        let dimensions = response_embedding.len();
        let mut centroid = vec![0.0_f32; dimensions];
        for embedding in context_embeddings {
            for (accumulated, value) in centroid.iter_mut().zip(embedding) {
                *accumulated += value / context_embeddings.len() as f32;
            }
        }

        Ok(f64::from(cosine_similarity(response_embedding, &centroid)))
    }
}

/// Single-score LLM judge relevance.
///
/// Builds a grading prompt from the joined context and the response, asks
/// the judge for a scalar, parses the first numeric token of the reply,
/// and clamps it to `[0, 1]`. A reply with no numeric token is a
/// [`EvalError::ScoreParse`]; transport failures propagate from the judge.
pub struct JudgeStrategy {
    judge: Arc<dyn Judge>,
}

impl JudgeStrategy {
    /// Create a strategy over the given judge.
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self { judge }
    }

    /// The grading prompt sent to the judge.
    pub(crate) fn prompt(response: &str, context: &[String]) -> String {
        let context_text = context.join("\n");
        format!(
            "Act as an LLM evaluation judge and evaluate the relevance of the AI response \
             to the following context on a scale of 0 to 1.\n\
             Context:\n{context_text}\n\n\
             Response:\n{response}\n\n\
             Return only a number between 0 and 1."
        )
    }
}

/// Parse the first numeric token of a judge reply, clamped to `[0, 1]`.
pub(crate) fn parse_judge_score(reply: &str) -> Result<f64> {
    let token = NUMERIC_TOKEN
        .find(reply)
        .ok_or_else(|| EvalError::ScoreParse { reply: reply.to_string() })?;
    let score: f64 = token
        .as_str()
        .parse()
        .map_err(|_| EvalError::ScoreParse { reply: reply.to_string() })?;
    Ok(score.clamp(0.0, 1.0))
}

#[async_trait]
impl RelevanceStrategy for JudgeStrategy {
    fn method(&self) -> EvalMethod {
        EvalMethod::Judge
    }

    async fn score(&self, response: &str, context: &[String]) -> Result<f64> {
        let reply = self.judge.complete(&Self::prompt(response, context)).await?;
        debug!(reply_len = reply.len(), "judge replied");
        parse_judge_score(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_score() {
        assert_eq!(parse_judge_score("0.85").unwrap(), 0.85);
    }

    #[test]
    fn parses_first_numeric_token_from_chatter() {
        assert_eq!(parse_judge_score("Sure! I'd rate this 0.7 out of 1.").unwrap(), 0.7);
    }

    #[test]
    fn clamps_out_of_range_scores() {
        assert_eq!(parse_judge_score("42").unwrap(), 1.0);
        assert_eq!(parse_judge_score("-3.5").unwrap(), 0.0);
    }

    #[test]
    fn reply_without_number_is_a_parse_error() {
        let err = parse_judge_score("I cannot rate this.").unwrap_err();
        assert!(matches!(err, EvalError::ScoreParse { .. }));
    }
}
