//! Gemini judge client using the `generateContent` REST endpoint.
//!
//! This module is only available when the `gemini` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use ragmark_core::{EvalError, Result};

use crate::judge::Judge;

/// The Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The default judge model.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout. Judge calls are blocking network operations
/// with no retry, so a run never hangs longer than this per call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`Judge`] backed by the Gemini `generateContent` API.
///
/// Uses `reqwest` to call the REST endpoint directly with an explicit
/// request timeout.
///
/// # Configuration
///
/// - `model` – defaults to `gemini-2.5-flash`.
/// - `api_key` – from the constructor or the `GOOGLE_API_KEY` environment
///   variable.
pub struct GeminiJudge {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiJudge {
    /// Create a new judge with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new judge with an explicit request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(EvalError::ExternalService {
                provider: "Gemini".to_string(),
                message: "API key must not be empty".to_string(),
            });
        }

        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            EvalError::ExternalService {
                provider: "Gemini".to_string(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self { client, api_key, model: DEFAULT_MODEL.to_string() })
    }

    /// Create a new judge using the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| EvalError::ExternalService {
            provider: "Gemini".to_string(),
            message: "GOOGLE_API_KEY environment variable not set".to_string(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gemini-2.5-pro`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Judge implementation ───────────────────────────────────────────

#[async_trait]
impl Judge for GeminiJudge {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "sending grading prompt");

        let url = format!("{GEMINI_BASE_URL}/{}:generateContent", self.model);
        let request_body =
            GenerateRequest { contents: vec![Content { parts: vec![Part { text: prompt }] }] };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                EvalError::ExternalService {
                    provider: "Gemini".to_string(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "Gemini", %status, "API error");
            return Err(EvalError::ExternalService {
                provider: "Gemini".to_string(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse response");
            EvalError::ExternalService {
                provider: "Gemini".to_string(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let reply = generate_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(EvalError::ExternalService {
                provider: "Gemini".to_string(),
                message: "API returned no candidate text".to_string(),
            });
        }

        Ok(reply)
    }
}
