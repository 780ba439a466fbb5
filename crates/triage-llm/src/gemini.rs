//! Gemini Provider Implementation
//!
//! Calls the Google Generative Language `generateContent` endpoint. The
//! defaults (model `gemini-2.0-flash`, temperature 0.2) match the hosted
//! deployment the triage prompt was tuned against.

use crate::retry::{Attempt, Backoff};
use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use triage_domain::traits::CompletionModel;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default timeout for model requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider for Google's Gemini models
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    client: reqwest::blocking::Client,
    backoff: Backoff,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        Some(text)
    }
}

impl GeminiProvider {
    /// Create a provider for the default model
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create a provider for a specific model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("Gemini API key is empty".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key,
            temperature: DEFAULT_TEMPERATURE,
            client,
            backoff: Backoff::new(3),
        })
    }

    /// Override the API base URL (for proxies and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of attempts (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.backoff.max_retries = max_retries.max(1);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn attempt(&self, url: &str, body: &GenerateContentRequest<'_>) -> Attempt<String> {
        let response = match self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Retry(LlmError::Communication(format!(
                    "Request failed: {}",
                    e.without_url()
                )))
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Attempt::Retry(LlmError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Attempt::Fail(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status.is_client_error() {
            let error_text = response.text().unwrap_or_default();
            return Attempt::Fail(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }
        if !status.is_success() {
            return Attempt::Retry(LlmError::Communication(format!("HTTP {}", status)));
        }

        match response.json::<GenerateContentResponse>() {
            Ok(parsed) => match parsed.into_text() {
                Some(text) => Attempt::Done(text),
                None => Attempt::Fail(LlmError::InvalidResponse(
                    "Response contained no candidates".to_string(),
                )),
            },
            Err(e) => Attempt::Fail(LlmError::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            ))),
        }
    }
}

impl CompletionModel for GeminiProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let url = self.endpoint();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        debug!("Sending {} char prompt to Gemini model '{}'", prompt.len(), self.model);
        self.backoff.run("Gemini", || self.attempt(&url, &body))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
