//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use triage_domain::{ClaimRecord, UpsertOutcome};
use triage_pipeline::{requires_alert, AlertOutcome, TriageOutcome};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a triage run.
    pub fn format_outcome(&self, outcome: &TriageOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "record": outcome.record,
                    "degraded": outcome.degraded,
                    "stored": describe_persistence(&outcome.persistence),
                    "report": match &outcome.report {
                        Ok(path) => path.display().to_string(),
                        Err(e) => format!("failed: {}", e),
                    },
                    "alert": describe_alert(&outcome.alert),
                    "model": outcome.metadata.model_name,
                    "processing_time_ms": outcome.metadata.processing_time_ms,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(outcome.record.claim_id.clone()),
            OutputFormat::Table => {
                let mut out = self.record_table(&outcome.record);
                out.push('\n');

                if outcome.degraded {
                    out.push_str(&self.warning("Model reply could not be parsed; raw output stored"));
                    out.push('\n');
                }

                out.push_str(&match &outcome.persistence {
                    Ok(_) => self.success(&describe_persistence(&outcome.persistence)),
                    Err(e) => self.error(&format!("Not stored: {}", e)),
                });
                out.push('\n');

                out.push_str(&match &outcome.report {
                    Ok(path) => self.success(&format!("Report written to {}", path.display())),
                    Err(e) => self.error(&format!("Report failed: {}", e)),
                });
                out.push('\n');

                out.push_str(&match &outcome.alert {
                    AlertOutcome::Sent => self.warning(&describe_alert(&outcome.alert)),
                    AlertOutcome::Failed(_) => self.error(&describe_alert(&outcome.alert)),
                    _ => self.info(&describe_alert(&outcome.alert)),
                });
                Ok(out)
            }
        }
    }

    /// Format a single record.
    pub fn format_record(&self, record: &ClaimRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record.claim_id.clone()),
            OutputFormat::Table => Ok(self.record_table(record)),
        }
    }

    /// Format a list of records.
    pub fn format_records(&self, records: &[ClaimRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Quiet => {
                let ids: Vec<&str> = records.iter().map(|r| r.claim_id.as_str()).collect();
                Ok(ids.join("\n"))
            }
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok(self.colorize("No claims found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Claim ID", "Type", "Severity", "Risk", "Priority", "Processed On"]);

                for record in records {
                    let priority = if record.is_degraded() {
                        "(unparsed)".to_string()
                    } else {
                        self.priority(&record.priority)
                    };
                    builder.push_record([
                        record.claim_id.clone(),
                        record.claim_type.clone(),
                        record.severity.clone(),
                        record.risk.clone(),
                        priority,
                        record.processed_on(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Two-column table of every labeled field.
    fn record_table(&self, record: &ClaimRecord) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (label, value) in record.labeled_values() {
            let value = if label == "Priority" {
                self.priority(&value)
            } else {
                value
            };
            builder.push_record([label.to_string(), value]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Priority value, highlighted when it triggers an alert.
    fn priority(&self, priority: &str) -> String {
        if requires_alert(priority) {
            self.colorize(priority, "red")
        } else {
            priority.to_string()
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn describe_persistence(persistence: &std::result::Result<UpsertOutcome, String>) -> String {
    match persistence {
        Ok(UpsertOutcome::Inserted) => "Stored new record".to_string(),
        Ok(UpsertOutcome::Replaced) => "Replaced existing record".to_string(),
        Err(e) => format!("failed: {}", e),
    }
}

fn describe_alert(alert: &AlertOutcome) -> String {
    match alert {
        AlertOutcome::NotRequired => "No alert required".to_string(),
        AlertOutcome::Suppressed => "Alert suppressed (alerts disabled)".to_string(),
        AlertOutcome::Sent => "High priority alert sent".to_string(),
        AlertOutcome::Failed(e) => format!("Alert failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;
    use triage_pipeline::TriageMetadata;

    fn record() -> ClaimRecord {
        let mut record = ClaimRecord::empty(
            "CLAIM12345",
            Utc.with_ymd_and_hms(2025, 4, 2, 9, 15, 0).unwrap(),
        );
        record.claim_type = "Auto".to_string();
        record.priority = "High".to_string();
        record
    }

    fn outcome() -> TriageOutcome {
        TriageOutcome {
            record: record(),
            degraded: false,
            persistence: Ok(UpsertOutcome::Replaced),
            report: Ok(PathBuf::from("reports/CLAIM12345.pdf")),
            alert: AlertOutcome::Sent,
            metadata: TriageMetadata {
                model_name: "mock".to_string(),
                prompt_chars: 100,
                reply_chars: 50,
                processing_time_ms: 7,
            },
        }
    }

    #[test]
    fn test_outcome_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_outcome(&outcome()).unwrap();
        assert!(output.contains("CLAIM12345"));
        assert!(output.contains("Replaced existing record"));
        assert!(output.contains("High priority alert sent"));
    }

    #[test]
    fn test_outcome_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_outcome(&outcome()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["record"]["claim_id"], "CLAIM12345");
        assert_eq!(value["alert"], "High priority alert sent");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_outcome(&outcome()).unwrap(), "CLAIM12345");
        assert_eq!(formatter.format_records(&[record(), record()]).unwrap(), "CLAIM12345\nCLAIM12345");
    }

    #[test]
    fn test_records_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[record()]).unwrap();
        assert!(output.contains("Priority"));
        assert!(output.contains("2025-04-02T09:15:00Z"));
    }

    #[test]
    fn test_empty_records() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_records(&[]).unwrap();
        assert!(output.contains("No claims found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
