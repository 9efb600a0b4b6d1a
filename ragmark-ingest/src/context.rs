//! Extracting a bounded list of context snippets from a context document.

use ragmark_core::ContextDocument;

/// Extract snippet texts from `data.vector_data` in stored order,
/// truncated to the first `cap` entries.
///
/// No relevance filtering happens here — ordering and truncation are the
/// only decisions. A record with a missing `text` field contributes an
/// empty string.
pub fn select_context(doc: &ContextDocument, cap: usize) -> Vec<String> {
    doc.data.vector_data.iter().take(cap).map(|record| record.text.clone()).collect()
}
