//! Configuration for the triage pipeline

use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use triage_domain::{ClaimIdPolicy, SchemaVariant};

/// Default directory for rendered reports
pub const DEFAULT_REPORT_DIR: &str = "claim_triage_reports";

/// Default alert recipient
pub const DEFAULT_ALERT_RECIPIENT: &str = "claims-escalations@example.com";

/// Configuration for the triage pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Which fields the model is asked to extract
    pub schema: SchemaVariant,

    /// How the record's claim id is resolved
    pub claim_id_policy: ClaimIdPolicy,

    /// Directory reports are written to
    pub report_dir: PathBuf,

    /// Report encoding
    pub report_format: ReportFormat,

    /// Fixed recipient for high-priority alerts
    pub alert_recipient: String,

    /// Whether qualifying claims trigger an alert at all
    pub alerts_enabled: bool,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.report_dir.as_os_str().is_empty() {
            return Err("report_dir must not be empty".to_string());
        }
        if self.alerts_enabled {
            let recipient = self.alert_recipient.trim();
            if recipient.is_empty() {
                return Err("alert_recipient is required when alerts are enabled".to_string());
            }
            if !recipient.contains('@') {
                return Err(format!("alert_recipient is not an address: '{}'", recipient));
            }
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    /// Standard schema, supplied id wins, PDF reports, alerts on
    fn default() -> Self {
        Self {
            schema: SchemaVariant::Standard,
            claim_id_policy: ClaimIdPolicy::SuppliedFirst,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            report_format: ReportFormat::Pdf,
            alert_recipient: DEFAULT_ALERT_RECIPIENT.to_string(),
            alerts_enabled: true,
        }
    }
}

impl PipelineConfig {
    /// Extended preset: identity fields collected, the document's own claim
    /// number wins over an operator-supplied id
    pub fn extended() -> Self {
        Self {
            schema: SchemaVariant::Extended,
            claim_id_policy: ClaimIdPolicy::ExtractedFirst,
            ..Self::default()
        }
    }

    /// Dry-run preset: text reports, no alerts
    pub fn dry_run() -> Self {
        Self {
            report_format: ReportFormat::Txt,
            alerts_enabled: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
