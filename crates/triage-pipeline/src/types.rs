//! Request and outcome types for the triage pipeline

use crate::alert::AlertOutcome;
use std::path::PathBuf;
use triage_domain::{ClaimRecord, UpsertOutcome};

/// Request to triage one claim document
#[derive(Debug, Clone)]
pub struct TriageRequest {
    /// Extracted document text
    pub document_text: String,

    /// Operator-supplied claim id, if any
    pub supplied_claim_id: Option<String>,
}

impl TriageRequest {
    /// Create a request with no supplied claim id
    pub fn new(document_text: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            supplied_claim_id: None,
        }
    }

    /// Attach an operator-supplied claim id
    pub fn with_claim_id(mut self, claim_id: impl Into<String>) -> Self {
        self.supplied_claim_id = Some(claim_id.into());
        self
    }
}

/// Result of one pipeline run
///
/// The record always exists; each side-effect branch reports its own status
/// so partial success is visible to the caller.
#[derive(Debug)]
pub struct TriageOutcome {
    /// The assembled record
    pub record: ClaimRecord,

    /// Whether the model reply could not be parsed
    pub degraded: bool,

    /// Upsert result, or the storage error message
    pub persistence: Result<UpsertOutcome, String>,

    /// Path of the written report, or the report error message
    pub report: Result<PathBuf, String>,

    /// What the alert stage did
    pub alert: AlertOutcome,

    /// Metadata about the run
    pub metadata: TriageMetadata,
}

impl TriageOutcome {
    /// Whether every side-effect branch succeeded
    pub fn is_complete(&self) -> bool {
        self.persistence.is_ok() && self.report.is_ok() && !self.alert.is_failure()
    }
}

/// Metadata about a pipeline run
#[derive(Debug, Clone)]
pub struct TriageMetadata {
    /// Name of the model that produced the reply
    pub model_name: String,

    /// Length of the prompt sent (characters)
    pub prompt_chars: usize,

    /// Length of the reply received (characters)
    pub reply_chars: usize,

    /// Wall-clock time for the whole run
    pub processing_time_ms: u64,
}
