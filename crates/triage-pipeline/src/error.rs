//! Error types for the triage pipeline

use thiserror::Error;

/// Fatal pipeline errors
///
/// Only the stages before a record exists can fail the pipeline. Storage,
/// report and alert failures are reported in the outcome instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The document could not be turned into text
    #[error("Text extraction error: {0}")]
    Extraction(String),

    /// The document text is empty after trimming
    #[error("Document contains no text to triage")]
    EmptyDocument,

    /// The completion model could not be invoked or gave no reply
    #[error("Model error: {0}")]
    Model(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ExtractionError> for PipelineError {
    fn from(e: ExtractionError) -> Self {
        PipelineError::Extraction(e.to_string())
    }
}

/// Errors from rendering or writing a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF encoding error
    #[error("PDF encoding error: {0}")]
    Pdf(String),
}

/// Errors from the bundled text extractors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The PDF could not be parsed
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    /// No extractor handles this file type
    #[error("Unsupported document type: {0}")]
    UnsupportedFormat(String),
}
