//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the triage pipeline and the
//! infrastructure it talks to. Implementations live in other crates and are
//! injected into the pipeline by the caller.

use crate::ClaimRecord;

/// Whether an upsert created a new record or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed for the claim id
    Inserted,

    /// An existing record was fully replaced
    Replaced,
}

/// Trait for the generative-text model
///
/// Implemented by the infrastructure layer (triage-llm)
pub trait CompletionModel {
    /// Error type for model invocations
    type Error;

    /// Return the completion for a prompt
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the underlying model, for logging and metadata
    fn model_name(&self) -> &str;
}

/// Trait for the durable record store
///
/// Implemented by the infrastructure layer (triage-store)
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Insert or fully replace the record keyed by `record.claim_id`
    fn upsert(&mut self, record: &ClaimRecord) -> Result<UpsertOutcome, Self::Error>;

    /// Get a record by claim id
    fn get(&self, claim_id: &str) -> Result<Option<ClaimRecord>, Self::Error>;

    /// List records, most recently processed first
    fn list(&self, limit: Option<usize>) -> Result<Vec<ClaimRecord>, Self::Error>;
}

/// Trait for outbound alert delivery
///
/// Implemented by the infrastructure layer (triage-notify)
pub trait Notifier {
    /// Error type for delivery failures
    type Error;

    /// Deliver one message to one recipient
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), Self::Error>;
}

/// Trait for turning document bytes into text
///
/// Implemented by the application layer (triage-pipeline)
pub trait TextExtractor {
    /// Error type for extraction failures
    type Error;

    /// Extract the full text of a document
    fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error>;
}
