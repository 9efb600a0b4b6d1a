//! Best-effort normalization of JSON-like text blobs.
//!
//! Upstream documents are unreliable (hand-edited fixtures, truncated
//! exports), so [`normalize`] is a total function: it degrades through an
//! ordered chain of parser tiers and always produces *some* document
//! rather than aborting.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Value, json};
use tracing::warn;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("valid line comment regex"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"));
static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^'"\\]*)'"#).expect("valid single-quote regex"));
static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("valid key regex"));
static CHAT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""chat_id"\s*:\s*(\d+)"#).expect("valid chat_id regex"));
static USER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""user_id"\s*:\s*(\d+)"#).expect("valid user_id regex"));
static TURN_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"role"\s*:\s*"([^"]+)"\s*,\s*"message"\s*:\s*"([^"]+)""#)
        .expect("valid turn pair regex")
});

/// Recover a structured document from a text blob that may be strict,
/// slightly malformed, or badly corrupted JSON.
///
/// Tiers, tried in order; the first success wins:
/// 1. strict JSON parse
/// 2. syntactic repair (comments, trailing commas, smart quotes), then strict parse
/// 3. permissive literal syntax (single quotes, bare keys, Python-style
///    literals) on top of the tier-2 repairs, then strict parse
/// 4. emergency regex extraction of ids and role/message pairs
///
/// Never fails: tier 4 produces a minimal document with empty fields when
/// nothing matches, logging a diagnostic.
pub fn normalize(raw: &str) -> Value {
    let tiers: [fn(&str) -> Option<Value>; 3] = [parse_strict, parse_repaired, parse_permissive];
    for tier in tiers {
        if let Some(value) = tier(raw) {
            return value;
        }
    }
    warn!(len = raw.len(), "document failed all parse tiers, falling back to emergency extraction");
    emergency_extract(raw)
}

fn parse_strict(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// Strip JS-style comments, trailing commas, and curly quotes.
fn repair(raw: &str) -> String {
    let cleaned = LINE_COMMENT.replace_all(raw, "");
    let cleaned = BLOCK_COMMENT.replace_all(&cleaned, "");
    let cleaned = TRAILING_COMMA.replace_all(&cleaned, "$1");
    cleaned
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

fn parse_repaired(raw: &str) -> Option<Value> {
    serde_json::from_str(&repair(raw)).ok()
}

/// Accept object-literal syntax that is not strict JSON: single-quoted
/// strings, unquoted keys, and Python-style `True`/`False`/`None`.
fn parse_permissive(raw: &str) -> Option<Value> {
    let repaired = repair(raw);
    let relaxed = SINGLE_QUOTED.replace_all(&repaired, |caps: &Captures| format!("\"{}\"", &caps[1]));
    let relaxed =
        BARE_KEY.replace_all(&relaxed, |caps: &Captures| format!("{}\"{}\":", &caps[1], &caps[2]));
    let relaxed = relaxed.replace("True", "true").replace("False", "false").replace("None", "null");
    serde_json::from_str(&relaxed).ok()
}

/// Scrape usable fields out of badly broken text.
///
/// Identifiers are matched as digit sequences against their labeled keys;
/// turns are matched as repeating quoted `role`/`message` pairs. Missing
/// matches yield empty fields and an empty turn list.
fn emergency_extract(text: &str) -> Value {
    let first_digits =
        |re: &Regex| re.captures(text).map(|c| c[1].trim().to_string()).unwrap_or_default();

    let turns: Vec<Value> = TURN_PAIR
        .captures_iter(text)
        .map(|c| json!({"role": c[1].to_string(), "message": c[2].to_string()}))
        .collect();

    json!({
        "chat_id": first_digits(&CHAT_ID),
        "user_id": first_digits(&USER_ID),
        "conversation_turns": turns,
    })
}
