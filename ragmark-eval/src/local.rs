//! Local sentence-embedding provider backed by `fastembed`.
//!
//! This module is only available when the `fastembed` feature is enabled.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use ragmark_core::{EvalError, Result};

use crate::embedding::EmbeddingProvider;

/// Embedding dimensionality of AllMiniLML6V2.
const MINILM_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] running AllMiniLML6V2 in-process via
/// [`fastembed`].
///
/// The model is loaded once at construction (the entry point owns the
/// lifecycle and shares the provider via `Arc`). `TextEmbedding::embed`
/// requires `&mut self`, so the model sits behind a `Mutex`; inference
/// performs no other internal mutation.
pub struct LocalEmbeddingProvider {
    model: Mutex<fastembed::TextEmbedding>,
}

impl LocalEmbeddingProvider {
    /// Load the AllMiniLML6V2 model.
    ///
    /// Downloads the model files on first use; subsequent constructions
    /// read from the local cache.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Embedding`] if the model cannot be loaded
    /// (e.g. no network and no cached copy).
    pub fn new() -> Result<Self> {
        let model = fastembed::TextEmbedding::try_new(
            fastembed::InitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2)
                .with_show_download_progress(false),
        )
        .map_err(|e| EvalError::Embedding {
            provider: "fastembed".to_string(),
            message: format!("failed to load AllMiniLML6V2: {e}"),
        })?;

        info!(model = "AllMiniLML6V2", dimensions = MINILM_DIMENSIONS, "embedding model loaded");

        Ok(Self { model: Mutex::new(model) })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text]).await?;
        embeddings.into_iter().next().ok_or_else(|| EvalError::Embedding {
            provider: "fastembed".to_string(),
            message: "model returned no embeddings".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), "embedding batch locally");

        let mut model = self.model.lock().map_err(|_| EvalError::Embedding {
            provider: "fastembed".to_string(),
            message: "embedding model mutex poisoned".to_string(),
        })?;

        model.embed(texts.to_vec(), None).map_err(|e| EvalError::Embedding {
            provider: "fastembed".to_string(),
            message: format!("inference failed: {e}"),
        })
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }
}
