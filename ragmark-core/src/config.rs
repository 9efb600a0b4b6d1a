//! Configuration for the evaluation pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Which hallucination score wins in the composite judge path.
///
/// The composite judge supplies a faithfulness-derived hallucination score
/// alongside relevance. Whether that score or the independent lexical
/// scorer's output ends up in the result record is an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HallucinationSource {
    /// Use the independent lexical overlap scorer (default).
    #[default]
    Lexical,
    /// Use `1 − faithfulness` from the composite judge call.
    Judge,
}

/// Configuration parameters for the evaluation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalConfig {
    /// Maximum number of context snippets retained by the context selector.
    pub context_cap: usize,
    /// A response sentence counts as low-overlap when the fraction of its
    /// words found in the joined context falls below this threshold.
    pub low_overlap_threshold: f64,
    /// Price in USD per 1000 estimated tokens, for cost estimation.
    pub price_per_1k_tokens: f64,
    /// Composite weights for (relevance, completeness, 1 − hallucination).
    pub weights: (f64, f64, f64),
    /// Which hallucination score wins in the composite judge path.
    pub hallucination_source: HallucinationSource,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            context_cap: 6,
            low_overlap_threshold: 0.2,
            price_per_1k_tokens: 0.03,
            weights: (0.5, 0.3, 0.2),
            hallucination_source: HallucinationSource::Lexical,
        }
    }
}

impl EvalConfig {
    /// Create a new builder for constructing an [`EvalConfig`].
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`EvalConfig`].
#[derive(Debug, Clone, Default)]
pub struct EvalConfigBuilder {
    config: EvalConfig,
}

impl EvalConfigBuilder {
    /// Set the maximum number of context snippets to retain.
    pub fn context_cap(mut self, cap: usize) -> Self {
        self.config.context_cap = cap;
        self
    }

    /// Set the low-overlap threshold for the hallucination scorer.
    pub fn low_overlap_threshold(mut self, threshold: f64) -> Self {
        self.config.low_overlap_threshold = threshold;
        self
    }

    /// Set the price in USD per 1000 estimated tokens.
    pub fn price_per_1k_tokens(mut self, price: f64) -> Self {
        self.config.price_per_1k_tokens = price;
        self
    }

    /// Set the composite weights for (relevance, completeness, 1 − hallucination).
    pub fn weights(mut self, relevance: f64, completeness: f64, hallucination: f64) -> Self {
        self.config.weights = (relevance, completeness, hallucination);
        self
    }

    /// Set which hallucination score wins in the composite judge path.
    pub fn hallucination_source(mut self, source: HallucinationSource) -> Self {
        self.config.hallucination_source = source;
        self
    }

    /// Build the [`EvalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Config`] if:
    /// - `context_cap == 0`
    /// - `low_overlap_threshold` is outside `[0, 1]`
    /// - `price_per_1k_tokens` is negative
    /// - any weight is negative
    pub fn build(self) -> Result<EvalConfig> {
        if self.config.context_cap == 0 {
            return Err(EvalError::Config("context_cap must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.config.low_overlap_threshold) {
            return Err(EvalError::Config(format!(
                "low_overlap_threshold ({}) must be within [0, 1]",
                self.config.low_overlap_threshold
            )));
        }
        if self.config.price_per_1k_tokens < 0.0 {
            return Err(EvalError::Config(format!(
                "price_per_1k_tokens ({}) must not be negative",
                self.config.price_per_1k_tokens
            )));
        }
        let (w_r, w_c, w_h) = self.config.weights;
        if w_r < 0.0 || w_c < 0.0 || w_h < 0.0 {
            return Err(EvalError::Config(format!(
                "weights ({w_r}, {w_c}, {w_h}) must not be negative"
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_knobs() {
        let config = EvalConfig::default();
        assert_eq!(config.context_cap, 6);
        assert_eq!(config.low_overlap_threshold, 0.2);
        assert_eq!(config.price_per_1k_tokens, 0.03);
        assert_eq!(config.weights, (0.5, 0.3, 0.2));
        assert_eq!(config.hallucination_source, HallucinationSource::Lexical);
    }

    #[test]
    fn builder_accepts_valid_overrides() {
        let config = EvalConfig::builder()
            .context_cap(10)
            .low_overlap_threshold(0.5)
            .price_per_1k_tokens(0.002)
            .weights(0.6, 0.2, 0.2)
            .hallucination_source(HallucinationSource::Judge)
            .build()
            .unwrap();
        assert_eq!(config.context_cap, 10);
        assert_eq!(config.hallucination_source, HallucinationSource::Judge);
    }

    #[test]
    fn builder_rejects_zero_context_cap() {
        let err = EvalConfig::builder().context_cap(0).build().unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }

    #[test]
    fn builder_rejects_out_of_range_threshold() {
        let err = EvalConfig::builder().low_overlap_threshold(1.5).build().unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }

    #[test]
    fn builder_rejects_negative_weight() {
        let err = EvalConfig::builder().weights(0.5, -0.3, 0.2).build().unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }
}
