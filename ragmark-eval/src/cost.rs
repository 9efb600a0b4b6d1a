//! Deterministic token/cost approximation from response text length.

use ragmark_core::CostEstimate;

/// Estimate token count and USD cost for a response text.
///
/// `tokens_estimated = max(1, round(word_count / 0.75))` — the 0.75 ratio
/// approximates sub-word tokenization. `cost_usd = tokens_estimated /
/// 1000 × price_per_1k`, rounded to 6 decimals.
pub fn estimate_cost(text: &str, price_per_1k_tokens: f64) -> CostEstimate {
    let word_count = text.split_whitespace().count();
    let tokens_estimated = ((word_count as f64 / 0.75).round() as u64).max(1);
    let cost_usd = round6(tokens_estimated as f64 / 1000.0 * price_per_1k_tokens);
    CostEstimate { tokens_estimated, cost_usd }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
