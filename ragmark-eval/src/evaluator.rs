//! Evaluation orchestrator.
//!
//! The [`Evaluator`] dispatches on an [`EvalMethod`] to select one
//! relevance strategy, always runs the completeness and hallucination
//! scorers, measures per-scorer wall-clock latency, and aggregates the
//! metrics into a weighted composite result record.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use ragmark_core::{
    EvalConfig, EvalError, EvalMethod, EvaluationInput, HallucinationSource, LatencyBreakdown,
    Result, ScoreResult,
};

use crate::composite::CompositeJudge;
use crate::cost::estimate_cost;
use crate::embedding::EmbeddingProvider;
use crate::judge::Judge;
use crate::lexical::round4;
use crate::scorers::{completeness_score, hallucination_score};
use crate::strategy::{EmbeddingStrategy, JudgeStrategy, LexicalStrategy, RelevanceStrategy};

/// The evaluation orchestrator.
///
/// Holds the validated configuration plus the externally-owned providers:
/// the embedding model (loaded once at process start, shared via `Arc`)
/// and the judge client. Methods whose provider was not supplied fail
/// with [`EvalError::Config`]. Construct one via [`Evaluator::builder()`].
pub struct Evaluator {
    config: EvalConfig,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    judge: Option<Arc<dyn Judge>>,
}

impl Evaluator {
    /// Create a new [`EvaluatorBuilder`].
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::default()
    }

    /// Return a reference to the evaluator configuration.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    fn relevance_strategy(&self, method: EvalMethod) -> Result<Box<dyn RelevanceStrategy>> {
        match method {
            EvalMethod::Lexical => Ok(Box::new(LexicalStrategy)),
            EvalMethod::Embedding => {
                let provider = self.embedding_provider.clone().ok_or_else(|| {
                    EvalError::Config(
                        "the embedding method requires an embedding provider".to_string(),
                    )
                })?;
                Ok(Box::new(EmbeddingStrategy::new(provider)))
            }
            EvalMethod::Judge => {
                let judge = self.judge.clone().ok_or_else(|| {
                    EvalError::Config("the judge method requires a judge client".to_string())
                })?;
                Ok(Box::new(JudgeStrategy::new(judge)))
            }
            EvalMethod::Composite => Err(EvalError::Config(
                "composite relevance is produced by the composite judge, not a strategy"
                    .to_string(),
            )),
        }
    }

    /// Run one evaluation over a normalized input.
    ///
    /// Completeness and hallucination always run regardless of method.
    /// For the composite method the judge supplies a faithfulness-derived
    /// hallucination candidate; `EvalConfig::hallucination_source` decides
    /// whether it or the independent lexical scorer wins.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Config`] if the selected method requires a
    /// provider that was not supplied; judge transport and parse failures
    /// propagate as [`EvalError::ExternalService`] / [`EvalError::ScoreParse`].
    /// No retry logic is applied.
    pub async fn evaluate(&self, method: EvalMethod, input: &EvaluationInput) -> Result<ScoreResult> {
        let (relevance, relevance_latency, judge_hallucination, reasoning) = match method {
            EvalMethod::Composite => {
                let judge = self.judge.clone().ok_or_else(|| {
                    EvalError::Config("the composite method requires a judge client".to_string())
                })?;
                let assessment = CompositeJudge::new(judge)
                    .assess(&input.user_message, &input.ai_response, &input.context)
                    .await?;
                (
                    assessment.relevance,
                    assessment.latency_ms,
                    Some(assessment.hallucination_score),
                    Some(assessment.reasoning),
                )
            }
            _ => {
                let strategy = self.relevance_strategy(method)?;
                debug!(strategy = %strategy.method(), "selected relevance strategy");
                let started = Instant::now();
                let score = strategy.score(&input.ai_response, &input.context).await?;
                (score, started.elapsed().as_millis() as u64, None, None)
            }
        };

        let started = Instant::now();
        let completeness = completeness_score(&input.user_message, &input.ai_response);
        let completeness_latency = started.elapsed().as_millis() as u64;

        // The independent scorer always runs; for the composite method the
        // configured source decides which value ends up in the record.
        let started = Instant::now();
        let lexical_hallucination = hallucination_score(
            &input.ai_response,
            &input.context,
            self.config.low_overlap_threshold,
        );
        let hallucination_latency = started.elapsed().as_millis() as u64;

        let hallucination = match (judge_hallucination, self.config.hallucination_source) {
            (Some(from_judge), HallucinationSource::Judge) => from_judge,
            _ => lexical_hallucination,
        };

        let cost_estimate = estimate_cost(&input.ai_response, self.config.price_per_1k_tokens);

        let (w_relevance, w_completeness, w_hallucination) = self.config.weights;
        let final_score = round4(
            w_relevance * relevance
                + w_completeness * completeness
                + w_hallucination * (1.0 - hallucination),
        );

        info!(
            %method,
            relevance,
            completeness,
            hallucination,
            final_score,
            "evaluation completed"
        );

        Ok(ScoreResult {
            id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            method,
            relevance,
            completeness,
            hallucination_score: hallucination,
            latency_ms: LatencyBreakdown {
                relevance: relevance_latency,
                completeness: completeness_latency,
                hallucination: hallucination_latency,
            },
            cost_estimate,
            final_score,
            reasoning,
        })
    }
}

/// Builder for constructing an [`Evaluator`].
///
/// The configuration defaults to [`EvalConfig::default()`]; the embedding
/// provider and judge are optional and only needed for the methods that
/// use them.
#[derive(Default)]
pub struct EvaluatorBuilder {
    config: Option<EvalConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    judge: Option<Arc<dyn Judge>>,
}

impl EvaluatorBuilder {
    /// Set the evaluator configuration.
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used by the embedding method.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the judge client used by the judge and composite methods.
    pub fn judge(mut self, judge: Arc<dyn Judge>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Build the [`Evaluator`].
    pub fn build(self) -> Evaluator {
        Evaluator {
            config: self.config.unwrap_or_default(),
            embedding_provider: self.embedding_provider,
            judge: self.judge,
        }
    }
}
