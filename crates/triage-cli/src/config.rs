//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triage_pipeline::PipelineConfig;

/// CLI configuration.
///
/// Secrets are never stored here: the model and notifier sections name the
/// environment variables to read them from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Completion model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Record store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Alert delivery settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Pipeline behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which completion model backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Google Gemini generateContent API
    Gemini,
    /// Local Ollama server
    Ollama,
}

/// Completion model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend
    #[serde(default = "default_provider")]
    pub provider: ModelProvider,

    /// Model name
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Override for the API base URL (Gemini) or server endpoint (Ollama)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (Gemini only)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// SQLite database path; defaults to `claims.db` next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// How alerts are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Log alerts only
    Log,
    /// POST alerts to an HTTP relay
    Http,
}

/// Alert delivery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Delivery channel
    #[serde(default = "default_notifier_kind")]
    pub kind: NotifierKind,

    /// Relay endpoint (http only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the relay bearer token (http only)
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".claim-triage").join("config.toml"))
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().map_err(CliError::Config)?;

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(CliError::Config(format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.name.trim().is_empty() {
            return Err(CliError::Config("model.name must not be empty".into()));
        }
        if self.notifier.kind == NotifierKind::Http && self.notifier.endpoint.is_none() {
            return Err(CliError::Config(
                "notifier.endpoint is required for the http notifier".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the store path; relative to `config_path`'s directory when unset.
    pub fn store_path(&self, config_path: &Path) -> PathBuf {
        match &self.store.path {
            Some(path) => path.clone(),
            None => config_path
                .parent()
                .map(|dir| dir.join("claims.db"))
                .unwrap_or_else(|| PathBuf::from("claims.db")),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            name: default_model_name(),
            temperature: default_temperature(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: default_notifier_kind(),
            endpoint: None,
            token_env: default_token_env(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_provider() -> ModelProvider {
    ModelProvider::Gemini
}

fn default_model_name() -> String {
    triage_llm::gemini::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    triage_llm::gemini::DEFAULT_TEMPERATURE
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_notifier_kind() -> NotifierKind {
    NotifierKind::Log
}

fn default_token_env() -> String {
    "CLAIM_TRIAGE_RELAY_TOKEN".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
