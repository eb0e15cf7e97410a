/// LLM Client: the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// All text generation MUST go through a `TextGenerator` from this module.
///
/// Candidate models are hardcoded (see `CANDIDATE_MODELS`) to prevent drift.
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Ordered fallback list; the first model that answers wins.
pub const CANDIDATE_MODELS: [&str; 2] = ["gemini-1.5-flash", "gemini-1.5-pro"];

/// Message of the error returned once every candidate model has failed.
pub const GENERATION_ERROR_MARKER: &str = "Error: Could not generate content.";

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("{}", GENERATION_ERROR_MARKER)]
    Exhausted,
}

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
    max_output_tokens: 2048,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// The single capability every generation backend exposes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// One Gemini model reached over the `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiModel {
    pub fn new(client: Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: &GENERATION_CONFIG,
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.into_text().ok_or(LlmError::EmptyContent)?;
        debug!("{} returned {} chars", self.model, text.len());
        Ok(text)
    }
}

/// Ordered list of candidate generators. The first success wins; later
/// candidates are not invoked. No retries beyond walking the list.
#[derive(Clone)]
pub struct ModelFallback {
    candidates: Vec<Arc<dyn TextGenerator>>,
}

impl ModelFallback {
    pub fn new(candidates: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { candidates }
    }

    /// Builds the production fallback chain over `CANDIDATE_MODELS`.
    pub fn gemini(base_url: &str, api_key: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let candidates = CANDIDATE_MODELS
            .iter()
            .map(|model| {
                Arc::new(GeminiModel::new(client.clone(), base_url, api_key, model))
                    as Arc<dyn TextGenerator>
            })
            .collect();

        Ok(Self::new(candidates))
    }
}

#[async_trait]
impl TextGenerator for ModelFallback {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        for candidate in &self.candidates {
            match candidate.generate(prompt).await {
                Ok(text) => {
                    info!("Generated with model {}", candidate.name());
                    return Ok(text);
                }
                Err(e) => warn!("Model {} failed: {e}", candidate.name()),
            }
        }

        warn!("All {} candidate models failed", self.candidates.len());
        Err(LlmError::Exhausted)
    }
}
