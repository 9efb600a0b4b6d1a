//! Call-local TF-IDF relevance scoring.
//!
//! The vectorization is corpus-relative to a single call: vocabulary and
//! IDF weights are fit over `{response} ∪ context` jointly and are not
//! reusable across calls.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

/// Words of two or more word characters; shorter tokens carry no signal
/// for term weighting.
static TERM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w\w+").expect("valid term regex"));

/// Common English stop words excluded from the term vocabulary.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "did",
    "do", "does", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "if", "in", "into", "is", "it",
    "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "you",
    "your",
];

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// TF-IDF cosine similarity between a response and the centroid of its
/// context snippets, rounded to 4 decimals.
///
/// Term frequencies are weighted by smoothed inverse document frequency
/// (`ln((1 + n) / (1 + df)) + 1`) and each document vector is
/// L2-normalized before the context vectors are averaged. Returns 0.0
/// when the response and context share no vocabulary, or when the context
/// is empty.
pub fn lexical_relevance(response: &str, context: &[String]) -> f64 {
    if context.is_empty() {
        return 0.0;
    }

    let mut documents: Vec<Vec<String>> = Vec::with_capacity(context.len() + 1);
    documents.push(tokenize(response));
    documents.extend(context.iter().map(|c| tokenize(c)));

    // Fit the vocabulary and document frequencies over the whole corpus
    let mut vocabulary: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &documents {
        for term in doc {
            let next = vocabulary.len();
            vocabulary.entry(term.as_str()).or_insert(next);
        }
    }
    if vocabulary.is_empty() {
        return 0.0;
    }

    let n_docs = documents.len() as f64;
    let mut document_frequency = vec![0_f64; vocabulary.len()];
    for doc in &documents {
        let mut seen: Vec<bool> = vec![false; vocabulary.len()];
        for term in doc {
            let index = vocabulary[term.as_str()];
            if !seen[index] {
                seen[index] = true;
                document_frequency[index] += 1.0;
            }
        }
    }
    let idf: Vec<f64> =
        document_frequency.iter().map(|df| ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0).collect();

    // L2-normalized TF-IDF vector per document
    let vectors: Vec<Vec<f64>> = documents
        .iter()
        .map(|doc| {
            let mut counts: HashMap<usize, f64> = HashMap::new();
            for term in doc {
                *counts.entry(vocabulary[term.as_str()]).or_insert(0.0) += 1.0;
            }
            let mut vector = vec![0.0; vocabulary.len()];
            for (index, count) in counts {
                vector[index] = count * idf[index];
            }
            let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in &mut vector {
                    *value /= norm;
                }
            }
            vector
        })
        .collect();

    // Average the context vectors into a single centroid
    let context_count = (vectors.len() - 1) as f64;
    let mut centroid = vec![0.0; vocabulary.len()];
    for vector in &vectors[1..] {
        for (accumulated, value) in centroid.iter_mut().zip(vector) {
            *accumulated += value / context_count;
        }
    }

    let response_vector = &vectors[0];
    let dot: f64 = response_vector.iter().zip(&centroid).map(|(a, b)| a * b).sum();
    let norm_response: f64 = response_vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_centroid: f64 = centroid.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_response == 0.0 || norm_centroid == 0.0 {
        return 0.0;
    }

    round4(dot / (norm_response * norm_centroid))
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn self_similarity_is_one() {
        let text = "Paris is the capital of France";
        assert_eq!(lexical_relevance(text, &ctx(&[text])), 1.0);
    }

    #[test]
    fn disjoint_vocabulary_scores_zero() {
        let score = lexical_relevance(
            "quantum entanglement experiments",
            &ctx(&["medieval castle architecture", "gothic cathedral spires"]),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn empty_context_scores_zero() {
        assert_eq!(lexical_relevance("anything", &[]), 0.0);
    }

    #[test]
    fn stop_words_alone_score_zero() {
        assert_eq!(lexical_relevance("the of and", &ctx(&["the of and"])), 0.0);
    }

    #[test]
    fn related_text_scores_above_half() {
        let score = lexical_relevance(
            "Paris is the capital of France.",
            &ctx(&["France's capital is Paris.", "Paris has 2M residents."]),
        );
        assert!(score > 0.5, "expected high relevance, got {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn result_is_rounded_to_four_decimals() {
        let score = lexical_relevance(
            "apple banana cherry",
            &ctx(&["apple banana", "banana cherry date"]),
        );
        assert_eq!(score, round4(score));
    }
}
