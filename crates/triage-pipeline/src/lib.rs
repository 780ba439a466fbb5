//! Claim Triage Pipeline
//!
//! Turns an unstructured insurance-claim document into a validated,
//! persisted and reportable `ClaimRecord`, alerting on urgent claims.
//!
//! # Architecture
//!
//! ```text
//! bytes → TextExtractor → PromptBuilder → CompletionModel → parse_response
//!       → RecordAssembler → { DocumentStore, ReportWriter } → AlertDispatcher
//! ```
//!
//! Only text extraction, prompt construction and the model call can fail
//! the pipeline. An unparsable model reply degrades to a record carrying
//! the raw reply; storage, report and alert failures are reported in the
//! [`TriageOutcome`].
//!
//! # Example Usage
//!
//! ```no_run
//! use triage_pipeline::{PipelineConfig, TriagePipeline, TriageRequest};
//! use triage_llm::MockProvider;
//! use triage_notify::LogNotifier;
//! use triage_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"priority": "Low"}"#);
//! let store = SqliteStore::in_memory()?;
//! let pipeline = TriagePipeline::new(llm, store, LogNotifier, PipelineConfig::default())?;
//!
//! let request = TriageRequest::new("Front bumper damage, minor collision.")
//!     .with_claim_id("CLAIM12345");
//! let outcome = pipeline.process(request).await?;
//!
//! println!("Priority: {}", outcome.record.priority);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod alert;
mod assembler;
mod config;
mod document;
mod error;
mod parser;
mod pipeline;
mod prompt;
mod report;
mod types;


pub use alert::{
    alert_body, alert_subject, requires_alert, AlertDispatcher, AlertOutcome, ALERT_PRIORITIES,
};
pub use assembler::RecordAssembler;
pub use config::{PipelineConfig, DEFAULT_ALERT_RECIPIENT, DEFAULT_REPORT_DIR};
pub use document::{DocumentKind, PdfTextExtractor, PlainTextExtractor};
pub use error::{ExtractionError, PipelineError, ReportError};
pub use parser::parse_response;
pub use pipeline::TriagePipeline;
pub use prompt::PromptBuilder;
pub use report::{
    encode_pdf, encode_text, wrap_text, PageGeometry, ReportFormat, ReportLayout, ReportLine,
    ReportPage, ReportRenderer, ReportWriter, REPORT_TITLE, WRAP_WIDTH,
};
pub use types::{TriageMetadata, TriageOutcome, TriageRequest};
