//! Collaborator construction from configuration.
//!
//! The pipeline is generic over its model and notifier; these enums pick a
//! concrete implementation at runtime.

use crate::config::{ModelConfig, ModelProvider, NotifierConfig, NotifierKind};
use crate::error::{CliError, Result};
use tracing::debug;
use triage_domain::traits::{CompletionModel, Notifier};
use triage_llm::{GeminiProvider, LlmError, OllamaProvider};
use triage_notify::{HttpNotifier, LogNotifier, NotifyError};

/// Completion model chosen by configuration.
pub enum ModelBackend {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
}

impl ModelBackend {
    /// Build the configured backend, reading secrets from the environment.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        match config.provider {
            ModelProvider::Gemini => {
                let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                    CliError::Config(format!(
                        "environment variable {} is not set",
                        config.api_key_env
                    ))
                })?;

                let mut provider = GeminiProvider::with_model(api_key, &config.name)?
                    .with_temperature(config.temperature)
                    .with_max_retries(config.max_retries);
                if let Some(base_url) = &config.endpoint {
                    provider = provider.with_base_url(base_url);
                }
                debug!("Using Gemini model {}", config.name);
                Ok(ModelBackend::Gemini(provider))
            }
            ModelProvider::Ollama => {
                let provider = match &config.endpoint {
                    Some(endpoint) => OllamaProvider::new(endpoint, &config.name)?,
                    None => OllamaProvider::default_endpoint(&config.name)?,
                }
                .with_temperature(config.temperature)
                .with_max_retries(config.max_retries);
                debug!("Using Ollama model {}", config.name);
                Ok(ModelBackend::Ollama(provider))
            }
        }
    }
}

impl CompletionModel for ModelBackend {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> std::result::Result<String, Self::Error> {
        match self {
            ModelBackend::Gemini(provider) => provider.complete(prompt),
            ModelBackend::Ollama(provider) => provider.complete(prompt),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            ModelBackend::Gemini(provider) => provider.model_name(),
            ModelBackend::Ollama(provider) => provider.model_name(),
        }
    }
}

/// Alert channel chosen by configuration.
pub enum AlertChannel {
    /// Log only
    Log(LogNotifier),
    /// HTTP relay
    Http(HttpNotifier),
}

impl AlertChannel {
    /// Build the configured channel, reading the relay token from the environment.
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        match config.kind {
            NotifierKind::Log => Ok(AlertChannel::Log(LogNotifier)),
            NotifierKind::Http => {
                let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                    CliError::Config("notifier.endpoint is required for the http notifier".into())
                })?;

                let mut notifier = HttpNotifier::new(endpoint)?;
                if let Ok(token) = std::env::var(&config.token_env) {
                    notifier = notifier.with_bearer_token(token);
                }
                Ok(AlertChannel::Http(notifier))
            }
        }
    }
}

impl Notifier for AlertChannel {
    type Error = NotifyError;

    fn send(&self, subject: &str, body: &str, recipient: &str) -> std::result::Result<(), Self::Error> {
        match self {
            AlertChannel::Log(notifier) => notifier.send(subject, body, recipient),
            AlertChannel::Http(notifier) => notifier.send(subject, body, recipient),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_channel_from_default_config() {
        let channel = AlertChannel::from_config(&NotifierConfig::default()).unwrap();
        assert!(matches!(channel, AlertChannel::Log(_)));
        assert!(channel.send("s", "b", "r@example.com").is_ok());
    }

    #[test]
    fn test_http_channel_requires_endpoint() {
        let config = NotifierConfig {
            kind: NotifierKind::Http,
            ..NotifierConfig::default()
        };
        assert!(matches!(
            AlertChannel::from_config(&config),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_gemini_requires_api_key_env() {
        let config = ModelConfig {
            api_key_env: "CLAIM_TRIAGE_TEST_UNSET_KEY".to_string(),
            ..ModelConfig::default()
        };
        assert!(matches!(
            ModelBackend::from_config(&config),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_ollama_backend_from_config() {
        let config = ModelConfig {
            provider: ModelProvider::Ollama,
            name: "llama3".to_string(),
            endpoint: Some("http://127.0.0.1:11434".to_string()),
            ..ModelConfig::default()
        };
        let backend = ModelBackend::from_config(&config).unwrap();
        assert_eq!(backend.model_name(), "llama3");
    }
}
