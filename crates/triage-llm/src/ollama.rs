//! Ollama Provider Implementation
//!
//! Integration with Ollama's local generate API, for running triage against
//! a local model.
//!
//! # Features
//!
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use triage_llm::OllamaProvider;
//! use triage_domain::traits::CompletionModel;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
//! let reply = provider.complete("Summarize this claim ...").unwrap();
//! ```

use crate::retry::{Attempt, Backoff};
use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use triage_domain::traits::CompletionModel;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for model requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    temperature: f32,
    client: reqwest::blocking::Client,
    backoff: Backoff,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 0.2,
            client,
            backoff: Backoff::new(DEFAULT_MAX_RETRIES),
        })
    }

    /// Create a new Ollama provider at the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.backoff.max_retries = max_retries.max(1);
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn attempt(&self, url: &str, body: &OllamaGenerateRequest<'_>) -> Attempt<String> {
        let response = match self.client.post(url).json(body).send() {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Retry(LlmError::Communication(format!("Request failed: {}", e)))
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Attempt::Fail(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Attempt::Retry(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        match response.json::<OllamaGenerateResponse>() {
            Ok(parsed) => Attempt::Done(parsed.response),
            Err(e) => Attempt::Fail(LlmError::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            ))),
        }
    }
}

impl CompletionModel for OllamaProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        debug!("Sending {} char prompt to Ollama model '{}'", prompt.len(), self.model);
        self.backoff.run("Ollama", || self.attempt(&url, &body))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
