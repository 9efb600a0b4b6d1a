//! Assembling raw document text into a normalized [`EvaluationInput`].

use ragmark_core::{ContextDocument, ConversationDocument, EvalConfig, EvaluationInput};
use tracing::info;

use crate::context::select_context;
use crate::conversation::extract_latest;
use crate::normalize::normalize;

/// Turn raw conversation and context text into an [`EvaluationInput`].
///
/// Total function: both blobs go through the normalizer chain, so even
/// badly corrupted input produces a (possibly empty) evaluation unit.
/// Missing turns become empty messages.
pub fn preprocess(conversation_raw: &str, context_raw: &str, config: &EvalConfig) -> EvaluationInput {
    // 1. Normalize both blobs into structured documents
    let conversation: ConversationDocument =
        serde_json::from_value(normalize(conversation_raw)).unwrap_or_default();
    let context_doc: ContextDocument =
        serde_json::from_value(normalize(context_raw)).unwrap_or_default();

    // 2. Locate the most recent user and AI turns
    let (last_user, last_ai) = extract_latest(&conversation);

    // 3. Extract the bounded context snippet list
    let context = select_context(&context_doc, config.context_cap);

    let input = EvaluationInput {
        chat_id: conversation.chat_id.clone(),
        user_id: conversation.user_id.clone(),
        user_message: last_user.map(|t| t.message.clone()).unwrap_or_default(),
        ai_response: last_ai.map(|t| t.message.clone()).unwrap_or_default(),
        context,
    };

    info!(
        chat_id = %input.chat_id,
        context_count = input.context.len(),
        has_user = !input.user_message.is_empty(),
        has_response = !input.ai_response.is_empty(),
        "preprocessing completed"
    );

    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_input_from_strict_documents() {
        let conversation = r#"{
            "chat_id": 12,
            "user_id": 34,
            "conversation_turns": [
                {"role": "user", "message": "What is the capital of France?"},
                {"role": "ai", "message": "Paris is the capital of France."}
            ]
        }"#;
        let context = r#"{"data": {"vector_data": [
            {"text": "France's capital is Paris."},
            {"text": "Paris has 2M residents."}
        ]}}"#;

        let input = preprocess(conversation, context, &EvalConfig::default());
        assert_eq!(input.chat_id, "12");
        assert_eq!(input.user_id, "34");
        assert_eq!(input.user_message, "What is the capital of France?");
        assert_eq!(input.ai_response, "Paris is the capital of France.");
        assert_eq!(input.context.len(), 2);
    }

    #[test]
    fn corrupted_documents_degrade_to_empty_input() {
        let input = preprocess("<<not json at all>>", "also broken", &EvalConfig::default());
        assert_eq!(input.chat_id, "");
        assert_eq!(input.user_message, "");
        assert_eq!(input.ai_response, "");
        assert!(input.context.is_empty());
    }

    #[test]
    fn recovers_turns_through_emergency_extraction() {
        let conversation = r#"broken { "chat_id": 5 junk
            "role": "user", "message": "ping"
            "role": "ai", "message": "pong" garbage"#;
        let input = preprocess(conversation, "{}", &EvalConfig::default());
        assert_eq!(input.chat_id, "5");
        assert_eq!(input.user_message, "ping");
        assert_eq!(input.ai_response, "pong");
    }
}
