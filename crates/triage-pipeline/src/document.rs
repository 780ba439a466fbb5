//! Text extraction from claim documents

use crate::error::ExtractionError;
use std::path::Path;
use triage_domain::traits::TextExtractor;

/// PDF text extractor using the pdf-extract crate
///
/// Handles digital PDFs with an embedded text layer. Page texts are joined
/// with a single space.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    type Error = ExtractionError;

    fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;
        Ok(pages.join(" "))
    }
}

/// Extractor for plain-text documents (lossy UTF-8)
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    type Error = ExtractionError;

    fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Extractor chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.pdf`
    Pdf,
    /// `.txt`, `.text`, `.md`
    Text,
}

impl DocumentKind {
    /// Detect the kind of a document from its path
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "text" | "md" => Ok(DocumentKind::Text),
            _ => Err(ExtractionError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl TextExtractor for DocumentKind {
    type Error = ExtractionError;

    fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error> {
        match self {
            DocumentKind::Pdf => PdfTextExtractor.extract_text(bytes),
            DocumentKind::Text => PlainTextExtractor.extract_text(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("claim.PDF")).unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")).unwrap(), DocumentKind::Text);
        assert!(matches!(
            DocumentKind::from_path(Path::new("scan.tiff")),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
        assert!(DocumentKind::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_plain_text_is_lossy() {
        let text = PlainTextExtractor.extract_text(b"Claim \xFF form").unwrap();
        assert_eq!(text, "Claim \u{FFFD} form");
    }

    #[test]
    fn test_garbage_pdf_fails() {
        let result = PdfTextExtractor.extract_text(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }
}
