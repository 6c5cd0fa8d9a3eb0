//! Extraction client for the Gemini generateContent API.
//!
//! The client builds a schema-constrained request, sends it through a
//! pluggable transport, and deserializes the response into typed claims.
//! A call either yields a complete claim sequence or fails with one of the
//! three error kinds below; there are no retries, no caching, and no
//! partial results.

use crate::extractor::prompt::{claim_response_schema, INGESTION_PROMPT};
use crate::models::Claim;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from one extraction attempt. All are terminal for the attempt;
/// none are retried.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Required credential or configuration is absent. Raised before any
    /// network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider call failed (network, auth, quota, server error).
    /// Carries the provider's message when available.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call succeeded but the payload is empty, not valid JSON, or
    /// does not match the claim shape.
    #[error("response format error: {0}")]
    ResponseFormat(String),
}

/// Configuration for the extraction client.
///
/// The credential is an explicit field rather than ambient process state
/// so tests can construct clients without touching the environment.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Gemini API key. An empty key fails extraction with a
    /// configuration error before any request is issued.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// API base URL.
    pub api_url: String,
    /// Temperature for generation.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-3-flash-preview".to_string(),
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.2,
            timeout_seconds: 120,
        }
    }
}

/// A text part of a Gemini content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// A Gemini content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    fn from_text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// Gemini generateContent request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub response_mime_type: String,
    pub response_schema: Value,
}

/// Gemini generateContent response envelope.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Provider error envelope, kept so the original message survives to the
/// presentation boundary.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Transport seam between the extraction client and the provider.
///
/// Returns the model's raw text output for a request. Production code
/// uses [`GeminiTransport`]; tests substitute mocks.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ExtractError>;
}

/// HTTP transport for the Gemini generateContent endpoint.
pub struct GeminiTransport {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiTransport {
    /// Create a transport for the given configuration.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ExtractError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: format!(
                "{}/models/{}:generateContent",
                config.api_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ExtractError> {
        debug!("Sending generateContent request to {}", self.url);

        let response = self
            .http_client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Transport("request to Gemini timed out".to_string())
                } else if e.is_connect() {
                    ExtractError::Transport(format!("cannot connect to Gemini at {}", self.url))
                } else {
                    ExtractError::Transport(format!("failed to send request: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Surface the provider's own message when the envelope parses.
            let message = match serde_json::from_str::<ProviderError>(&body) {
                Ok(provider) => provider.error.message,
                Err(_) => body,
            };
            return Err(ExtractError::Transport(format!(
                "Gemini API error {}: {}",
                status, message
            )));
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::ResponseFormat(format!("invalid response envelope: {}", e)))?;

        let text: String = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}

/// The claim extraction client.
pub struct ClaimExtractor {
    config: ExtractorConfig,
    transport: Box<dyn ModelTransport>,
}

impl ClaimExtractor {
    /// Create an extractor with an explicit transport.
    pub fn new(config: ExtractorConfig, transport: Box<dyn ModelTransport>) -> Self {
        Self { config, transport }
    }

    /// Create an extractor backed by the HTTP Gemini transport.
    pub fn with_http(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let transport = GeminiTransport::new(&config)?;
        Ok(Self::new(config, Box::new(transport)))
    }

    /// Extract claims from the given source text.
    ///
    /// Fails atomically: either the complete claim sequence is returned
    /// or one of the three [`ExtractError`] kinds is raised. The returned
    /// order is the provider's order; display order is the caller's
    /// concern.
    pub async fn extract(&self, text: &str) -> Result<Vec<Claim>, ExtractError> {
        if self.config.api_key.is_empty() {
            return Err(ExtractError::Configuration(
                "API key is missing. Set GEMINI_API_KEY or [model].api_key in .claimlens.toml"
                    .to_string(),
            ));
        }

        let request = GenerateRequest {
            system_instruction: Content::from_text(INGESTION_PROMPT),
            contents: vec![Content::from_text(text)],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: claim_response_schema(),
            },
        };

        info!("Requesting claim extraction from {}", self.config.model);
        let payload = self.transport.generate(&request).await?;

        if payload.trim().is_empty() {
            return Err(ExtractError::ResponseFormat(
                "empty response from the model".to_string(),
            ));
        }

        let claims: Vec<Claim> = serde_json::from_str(&payload).map_err(|e| {
            ExtractError::ResponseFormat(format!("failed to parse claims: {}", e))
        })?;

        info!("Extracted {} claims", claims.len());
        Ok(claims)
    }
}
