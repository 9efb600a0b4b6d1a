//! Locating the most recent user and AI turns in a conversation.

use ragmark_core::{ConversationDocument, Turn};

/// Find the most recent user turn and the most recent AI turn.
///
/// Scans `conversation_turns` from the end; `role` is matched by
/// case-insensitive prefix ("ai", "user"), so variants like
/// "AI_assistant" are accepted. The first match from the end wins for
/// each role independently, and the scan stops once both are found.
///
/// This is a best-effort pairing, not strict turn-adjacency matching: an
/// AI turn found before its triggering user turn in reverse order is
/// still accepted, so the pair is not guaranteed to be causally adjacent.
pub fn extract_latest(doc: &ConversationDocument) -> (Option<&Turn>, Option<&Turn>) {
    let mut last_user = None;
    let mut last_ai = None;

    for turn in doc.conversation_turns.iter().rev() {
        let role = turn.role.to_lowercase();
        if last_ai.is_none() && role.starts_with("ai") {
            last_ai = Some(turn);
        }
        if last_user.is_none() && role.starts_with("user") {
            last_user = Some(turn);
        }
        if last_ai.is_some() && last_user.is_some() {
            break;
        }
    }

    (last_user, last_ai)
}
