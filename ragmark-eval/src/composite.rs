//! Composite judge: relevance and faithfulness in one externally-timed call.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tracing::debug;

use ragmark_core::{EvalError, Reasoning, Result};

use crate::judge::Judge;
use crate::lexical::round4;

/// The parsed verdict of one composite judge call.
#[derive(Debug, Clone)]
pub struct CompositeAssessment {
    /// Relevance of the response to the context, in `[0, 1]`, rounded to 4 decimals.
    pub relevance: f64,
    /// Hallucination candidate derived as `1 − faithfulness`, rounded to 4 decimals.
    pub hallucination_score: f64,
    /// Wall-clock latency of the judge call in milliseconds.
    pub latency_ms: u64,
    /// Per-metric judge reasoning, kept for observability.
    pub reasoning: Reasoning,
}

#[derive(Deserialize)]
struct CompositeVerdict {
    relevance: f64,
    faithfulness: f64,
    #[serde(default)]
    relevance_reason: String,
    #[serde(default)]
    faithfulness_reason: String,
}

/// A judge-backed evaluator that grades relevance and faithfulness in a
/// single call, returning reasoning strings alongside the scores.
pub struct CompositeJudge {
    judge: Arc<dyn Judge>,
}

impl CompositeJudge {
    /// Create a composite evaluator over the given judge.
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self { judge }
    }

    fn prompt(user: &str, response: &str, context: &[String]) -> String {
        let context_text = context.join("\n");
        format!(
            "Act as an LLM evaluation judge for a retrieval-augmented answer.\n\
             Grade two metrics on a scale of 0 to 1:\n\
             - relevance: how well the response addresses the question\n\
             - faithfulness: how well the response is supported by the context\n\n\
             Question:\n{user}\n\n\
             Context:\n{context_text}\n\n\
             Response:\n{response}\n\n\
             Reply with strict JSON only, in this shape:\n\
             {{\"relevance\": 0.0, \"faithfulness\": 0.0, \
             \"relevance_reason\": \"...\", \"faithfulness_reason\": \"...\"}}"
        )
    }

    /// Strip markdown code fences and any chatter around the JSON object.
    fn extract_json(reply: &str) -> Option<&str> {
        let start = reply.find('{')?;
        let end = reply.rfind('}')?;
        (start < end).then(|| &reply[start..=end])
    }

    /// Run one judge call and parse its verdict.
    ///
    /// The call is timed here so the reported latency covers exactly the
    /// external grading round-trip.
    pub async fn assess(
        &self,
        user: &str,
        response: &str,
        context: &[String],
    ) -> Result<CompositeAssessment> {
        let started = Instant::now();
        let reply = self.judge.complete(&Self::prompt(user, response, context)).await?;
        let latency_ms = started.elapsed().as_millis() as u64;

        debug!(reply_len = reply.len(), latency_ms, "composite judge replied");

        let json = Self::extract_json(&reply)
            .ok_or_else(|| EvalError::ScoreParse { reply: reply.clone() })?;
        let verdict: CompositeVerdict = serde_json::from_str(json)
            .map_err(|_| EvalError::ScoreParse { reply: reply.clone() })?;

        Ok(CompositeAssessment {
            relevance: round4(verdict.relevance.clamp(0.0, 1.0)),
            hallucination_score: round4(1.0 - verdict.faithfulness.clamp(0.0, 1.0)),
            latency_ms,
            reasoning: Reasoning {
                relevance_reason: verdict.relevance_reason,
                faithfulness_reason: verdict.faithfulness_reason,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedJudge(String);

    #[async_trait]
    impl Judge for CannedJudge {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn composite(reply: &str) -> CompositeJudge {
        CompositeJudge::new(Arc::new(CannedJudge(reply.to_string())))
    }

    #[tokio::test]
    async fn parses_strict_json_verdict() {
        let judge = composite(
            r#"{"relevance": 0.9, "faithfulness": 0.8, "relevance_reason": "on topic", "faithfulness_reason": "grounded"}"#,
        );
        let assessment = judge.assess("q", "r", &["c".to_string()]).await.unwrap();
        assert_eq!(assessment.relevance, 0.9);
        assert_eq!(assessment.hallucination_score, round4(1.0 - 0.8));
        assert_eq!(assessment.reasoning.relevance_reason, "on topic");
    }

    #[tokio::test]
    async fn tolerates_code_fences_and_chatter() {
        let judge = composite(
            "Here is my grading:\n```json\n{\"relevance\": 1.0, \"faithfulness\": 1.0}\n```\nDone.",
        );
        let assessment = judge.assess("q", "r", &[]).await.unwrap();
        assert_eq!(assessment.relevance, 1.0);
        assert_eq!(assessment.hallucination_score, 0.0);
        assert_eq!(assessment.reasoning.relevance_reason, "");
    }

    #[tokio::test]
    async fn clamps_out_of_range_verdicts() {
        let judge = composite(r#"{"relevance": 1.7, "faithfulness": -0.2}"#);
        let assessment = judge.assess("q", "r", &[]).await.unwrap();
        assert_eq!(assessment.relevance, 1.0);
        assert_eq!(assessment.hallucination_score, 1.0);
    }

    #[tokio::test]
    async fn non_json_reply_is_a_parse_error() {
        let judge = composite("I refuse to grade this.");
        let err = judge.assess("q", "r", &[]).await.unwrap_err();
        assert!(matches!(err, EvalError::ScoreParse { .. }));
    }
}
