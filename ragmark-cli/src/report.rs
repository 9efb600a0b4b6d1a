//! Markdown rendering of a [`ScoreResult`].

use std::fmt::Write;

use ragmark_core::ScoreResult;

/// Render an evaluation result as a human-readable Markdown report.
pub fn render(result: &ScoreResult) -> String {
    let mut md = String::new();

    writeln!(md, "# LLM Evaluation Report").unwrap();
    writeln!(md).unwrap();
    writeln!(md, "### Method Used: `{}`", result.method).unwrap();
    writeln!(md).unwrap();
    writeln!(md, "## Metrics").unwrap();
    writeln!(md, "- Relevance: **{}**", result.relevance).unwrap();
    writeln!(md, "- Completeness: **{}**", result.completeness).unwrap();
    writeln!(md, "- Hallucination Score: **{}**", result.hallucination_score).unwrap();
    writeln!(md, "- Final Score: **{}**", result.final_score).unwrap();
    writeln!(md).unwrap();
    writeln!(md, "## Latency (ms)").unwrap();
    writeln!(md, "- Relevance: {}", result.latency_ms.relevance).unwrap();
    writeln!(md, "- Completeness: {}", result.latency_ms.completeness).unwrap();
    writeln!(md, "- Hallucination: {}", result.latency_ms.hallucination).unwrap();
    writeln!(md).unwrap();
    writeln!(md, "## Cost").unwrap();
    writeln!(md, "- Tokens Estimated: {}", result.cost_estimate.tokens_estimated).unwrap();
    writeln!(md, "- Cost (USD): {}", result.cost_estimate.cost_usd).unwrap();

    if let Some(reasoning) = &result.reasoning {
        writeln!(md).unwrap();
        writeln!(md, "## Judge Reasoning").unwrap();
        writeln!(md, "- Relevance: {}", reasoning.relevance_reason).unwrap();
        writeln!(md, "- Faithfulness: {}", reasoning.faithfulness_reason).unwrap();
    }

    md
}
