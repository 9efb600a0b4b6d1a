//! Auxiliary scorers: completeness and hallucination.
//!
//! Both are pure word-level heuristics with no stemming or semantic
//! matching.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

fn word_set(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Fraction of user-query vocabulary echoed in the response.
///
/// Tokenizes both texts into lowercase word sets and returns
/// `|intersection| / |user_tokens|`. An empty user message scores 1.0 —
/// an empty question is vacuously answered.
pub fn completeness_score(user: &str, response: &str) -> f64 {
    let user_tokens = word_set(user);
    if user_tokens.is_empty() {
        return 1.0;
    }
    let response_tokens = word_set(response);
    let shared = user_tokens.intersection(&response_tokens).count();
    shared as f64 / user_tokens.len() as f64
}

/// Fraction of response sentences with low lexical overlap against the
/// joined context — a proxy for ungrounded content.
///
/// The response is split on `.`/`!`/`?`. A non-empty sentence is
/// low-overlap when the fraction of its words appearing (case-insensitive
/// substring match) in the joined context falls below `threshold`. The
/// denominator counts all split segments, so a trailing terminator
/// contributes an empty segment; 0.0 when the response is empty.
pub fn hallucination_score(response: &str, context: &[String], threshold: f64) -> f64 {
    let joined = context.join(" ").to_lowercase();
    let lowered = response.to_lowercase();
    let segments: Vec<&str> = lowered.split(['.', '!', '?']).collect();

    let mut low_overlap = 0_usize;
    for segment in &segments {
        let sentence = segment.trim();
        if sentence.is_empty() {
            continue;
        }
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let grounded = words.iter().filter(|w| joined.contains(**w)).count();
        let ratio = grounded as f64 / words.len().max(1) as f64;
        if ratio < threshold {
            low_overlap += 1;
        }
    }

    low_overlap as f64 / segments.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn empty_user_message_is_vacuously_complete() {
        assert_eq!(completeness_score("", "any response at all"), 1.0);
        assert_eq!(completeness_score("", ""), 1.0);
    }

    #[test]
    fn full_echo_is_complete() {
        assert_eq!(completeness_score("capital France", "The capital of France"), 1.0);
    }

    #[test]
    fn partial_echo_is_fractional() {
        // "what" is not echoed; the other five words are.
        let score =
            completeness_score("What is the capital of France?", "Paris is the capital of France.");
        assert_eq!(score, 5.0 / 6.0);
    }

    #[test]
    fn no_echo_is_zero() {
        assert_eq!(completeness_score("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn grounded_response_scores_zero_hallucination() {
        let score = hallucination_score(
            "Paris is the capital of France.",
            &ctx(&["France's capital is Paris.", "Paris has 2M residents."]),
            0.2,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn ungrounded_sentence_raises_the_score() {
        // Second sentence shares nothing with the context; two of the
        // three split segments are non-empty.
        let score = hallucination_score(
            "Paris is the capital. Unicorns graze happily nearby.",
            &ctx(&["France's capital is Paris."]),
            0.2,
        );
        assert!((score - 1.0 / 3.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn empty_response_scores_zero() {
        assert_eq!(hallucination_score("", &ctx(&["context"]), 0.2), 0.0);
    }
}
