//! Orchestrator tests with stub providers.

use std::sync::Arc;

use async_trait::async_trait;

use ragmark_core::{
    EvalConfig, EvalError, EvalMethod, EvaluationInput, HallucinationSource, Result,
};
use ragmark_eval::{EmbeddingProvider, Evaluator, Judge};

/// Judge stub that always returns the same canned reply.
struct CannedJudge(&'static str);

#[async_trait]
impl Judge for CannedJudge {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Judge stub that fails like a dead endpoint.
struct FailingJudge;

#[async_trait]
impl Judge for FailingJudge {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(EvalError::ExternalService {
            provider: "stub".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

/// Deterministic bag-of-bytes embedder, offline and dependency-free.
struct StubEmbedder;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0_f32; 8];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % 8] += f32::from(byte) / 255.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        8
    }
}

fn capital_of_france() -> EvaluationInput {
    EvaluationInput {
        chat_id: "1".to_string(),
        user_id: "2".to_string(),
        user_message: "What is the capital of France?".to_string(),
        ai_response: "Paris is the capital of France.".to_string(),
        context: vec![
            "France's capital is Paris.".to_string(),
            "Paris has 2M residents.".to_string(),
        ],
    }
}

#[tokio::test]
async fn lexical_end_to_end_scenario() {
    let evaluator = Evaluator::builder().build();
    let result = evaluator.evaluate(EvalMethod::Lexical, &capital_of_france()).await.unwrap();

    assert_eq!(result.method, EvalMethod::Lexical);
    assert!(result.relevance > 0.5, "expected high relevance, got {}", result.relevance);
    assert_eq!(result.completeness, 5.0 / 6.0);
    assert!(result.hallucination_score < 0.2, "got {}", result.hallucination_score);
    assert_eq!(result.cost_estimate.tokens_estimated, 8);

    let expected = 0.5 * result.relevance
        + 0.3 * result.completeness
        + 0.2 * (1.0 - result.hallucination_score);
    assert!((result.final_score - expected).abs() < 1e-4);
    assert!(result.reasoning.is_none());
}

#[tokio::test]
async fn scores_are_deterministic_across_runs() {
    let evaluator = Evaluator::builder().build();
    let input = capital_of_france();
    let first = evaluator.evaluate(EvalMethod::Lexical, &input).await.unwrap();
    let second = evaluator.evaluate(EvalMethod::Lexical, &input).await.unwrap();

    assert_eq!(first.relevance, second.relevance);
    assert_eq!(first.completeness, second.completeness);
    assert_eq!(first.hallucination_score, second.hallucination_score);
    assert_eq!(first.final_score, second.final_score);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn embedding_method_requires_a_provider() {
    let evaluator = Evaluator::builder().build();
    let err = evaluator.evaluate(EvalMethod::Embedding, &capital_of_france()).await.unwrap_err();
    assert!(matches!(err, EvalError::Config(_)));
}

#[tokio::test]
async fn judge_method_requires_a_judge() {
    let evaluator = Evaluator::builder().build();
    let err = evaluator.evaluate(EvalMethod::Judge, &capital_of_france()).await.unwrap_err();
    assert!(matches!(err, EvalError::Config(_)));
}

#[tokio::test]
async fn embedding_self_similarity_is_high() {
    let evaluator = Evaluator::builder().embedding_provider(Arc::new(StubEmbedder)).build();
    let mut input = capital_of_france();
    input.context = vec![input.ai_response.clone()];

    let result = evaluator.evaluate(EvalMethod::Embedding, &input).await.unwrap();
    assert!((result.relevance - 1.0).abs() < 1e-6, "got {}", result.relevance);
}

#[tokio::test]
async fn judge_score_is_parsed_and_used() {
    let evaluator = Evaluator::builder().judge(Arc::new(CannedJudge("0.9"))).build();
    let result = evaluator.evaluate(EvalMethod::Judge, &capital_of_france()).await.unwrap();
    assert_eq!(result.relevance, 0.9);
    assert_eq!(result.method, EvalMethod::Judge);
}

#[tokio::test]
async fn out_of_range_judge_score_is_clamped() {
    let evaluator = Evaluator::builder().judge(Arc::new(CannedJudge("7"))).build();
    let result = evaluator.evaluate(EvalMethod::Judge, &capital_of_france()).await.unwrap();
    assert_eq!(result.relevance, 1.0);
}

#[tokio::test]
async fn unparseable_judge_reply_surfaces_as_error() {
    let evaluator =
        Evaluator::builder().judge(Arc::new(CannedJudge("no score from me"))).build();
    let err = evaluator.evaluate(EvalMethod::Judge, &capital_of_france()).await.unwrap_err();
    assert!(matches!(err, EvalError::ScoreParse { .. }));
}

#[tokio::test]
async fn judge_transport_failure_aborts_loudly() {
    let evaluator = Evaluator::builder().judge(Arc::new(FailingJudge)).build();
    let err = evaluator.evaluate(EvalMethod::Judge, &capital_of_france()).await.unwrap_err();
    assert!(matches!(err, EvalError::ExternalService { .. }));
}

const COMPOSITE_REPLY: &str = r#"{"relevance": 0.8, "faithfulness": 0.4,
    "relevance_reason": "addresses the question",
    "faithfulness_reason": "half the claims are grounded"}"#;

#[tokio::test]
async fn composite_lexical_source_overrides_judge_hallucination() {
    let evaluator = Evaluator::builder().judge(Arc::new(CannedJudge(COMPOSITE_REPLY))).build();
    let input = capital_of_france();
    let result = evaluator.evaluate(EvalMethod::Composite, &input).await.unwrap();

    assert_eq!(result.relevance, 0.8);
    // Default source is Lexical: the judge's 1 − 0.4 candidate is discarded
    // in favor of the independent scorer, which finds this response grounded.
    assert!(result.hallucination_score < 0.2);
    let reasoning = result.reasoning.unwrap();
    assert_eq!(reasoning.relevance_reason, "addresses the question");
}

#[tokio::test]
async fn composite_judge_source_keeps_faithfulness_derived_score() {
    let config = EvalConfig::builder()
        .hallucination_source(HallucinationSource::Judge)
        .build()
        .unwrap();
    let evaluator = Evaluator::builder()
        .config(config)
        .judge(Arc::new(CannedJudge(COMPOSITE_REPLY)))
        .build();

    let result = evaluator.evaluate(EvalMethod::Composite, &capital_of_france()).await.unwrap();
    assert!((result.hallucination_score - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn empty_input_still_produces_a_record() {
    let evaluator = Evaluator::builder().build();
    let input = EvaluationInput {
        chat_id: String::new(),
        user_id: String::new(),
        user_message: String::new(),
        ai_response: String::new(),
        context: Vec::new(),
    };

    let result = evaluator.evaluate(EvalMethod::Lexical, &input).await.unwrap();
    assert_eq!(result.relevance, 0.0);
    assert_eq!(result.completeness, 1.0);
    assert_eq!(result.hallucination_score, 0.0);
    assert_eq!(result.cost_estimate.tokens_estimated, 1);
    // 0.5×0 + 0.3×1 + 0.2×1
    assert_eq!(result.final_score, 0.5);
}
