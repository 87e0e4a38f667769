//! Typed HTTP clients for the two hosted generation APIs.

use crate::errors::{RagError, Result};
use crate::remote::AnswerService;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call budget for a remote answer tier
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const MAX_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.2;

/// Request body shared by both services
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

/// Gemini-style response: text lives at `candidates[0].content`
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: String,
}

/// Groq-style response: text lives at `text`
#[derive(Debug, Deserialize)]
struct GroqResponse {
    #[serde(default)]
    text: String,
}

/// Primary answer tier (Gemini-shaped API)
pub struct GeminiClient {
    client: Client,
    url: String,
    api_key: String,
}

/// Secondary answer tier (Groq-shaped API)
pub struct GroqClient {
    client: Client,
    url: String,
    api_key: String,
}

fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(RagError::Http)
}

/// POST the shared request shape and return the raw response body on 2xx
async fn post_generate(
    client: &Client,
    service: &str,
    url: &str,
    api_key: &str,
    prompt: &str,
) -> Result<String> {
    let request = GenerateRequest {
        prompt,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| RagError::RemoteApi {
            service: service.to_string(),
            reason: format!("request failed: {}", e),
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(RagError::RemoteApi {
            service: service.to_string(),
            reason: format!("HTTP {}: {}", status, body),
        });
    }

    response.text().await.map_err(|e| RagError::RemoteApi {
        service: service.to_string(),
        reason: format!("failed to read body: {}", e),
    })
}

/// Reject blank generations so the orchestrator advances the chain
fn require_text(service: &str, text: String) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RagError::RemoteApi {
            service: service.to_string(),
            reason: "empty generation".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

impl GeminiClient {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl AnswerService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn answer(&self, prompt: &str) -> Result<String> {
        let body = post_generate(&self.client, self.name(), &self.url, &self.api_key, prompt).await?;

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| RagError::RemoteApi {
                service: self.name().to_string(),
                reason: format!("invalid response: {}", e),
            })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content)
            .unwrap_or_default();

        require_text(self.name(), text)
    }
}

impl GroqClient {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl AnswerService for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn answer(&self, prompt: &str) -> Result<String> {
        let body = post_generate(&self.client, self.name(), &self.url, &self.api_key, prompt).await?;

        let parsed: GroqResponse =
            serde_json::from_str(&body).map_err(|e| RagError::RemoteApi {
                service: self.name().to_string(),
                reason: format!("invalid response: {}", e),
            })?;

        require_text(self.name(), parsed.text)
    }
}
