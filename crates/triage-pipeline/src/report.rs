//! Report rendering
//!
//! A record is first laid out into pages of positioned lines (pure and
//! deterministic), then encoded as PDF or plain text and written to
//! `<report_dir>/<claim_id>.<ext>`.

use crate::error::ReportError;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt};
use serde::{Deserialize, Serialize};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use triage_domain::ClaimRecord;

/// Title printed at the top of the first page
pub const REPORT_TITLE: &str = "CLAIM TRIAGE REPORT";

/// Column at which report lines are wrapped
pub const WRAP_WIDTH: usize = 100;

/// Output encoding for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// A4 PDF with builtin Helvetica fonts
    #[default]
    Pdf,

    /// Plain UTF-8 text, pages separated by a form feed
    Txt,
}

impl ReportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Txt => "txt",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "txt" | "text" => Ok(ReportFormat::Txt),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

/// Page geometry in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// x of the title
    pub title_x: f32,
    /// Distance from the top edge to the title baseline
    pub title_offset: f32,
    /// Distance from the top edge to the first body line on page one
    pub first_body_offset: f32,
    /// Distance from the top edge to the first body line on later pages
    pub body_offset: f32,
    /// x of body lines
    pub body_x: f32,
    /// Vertical advance per body line
    pub line_step: f32,
    /// A new page starts once y drops below this
    pub bottom_margin: f32,
    /// Title font size
    pub title_size: f32,
    /// Body font size
    pub body_size: f32,
}

impl PageGeometry {
    /// A4 portrait
    pub const A4: PageGeometry = PageGeometry {
        width: 595.0,
        height: 842.0,
        title_x: 180.0,
        title_offset: 40.0,
        first_body_offset: 80.0,
        body_offset: 50.0,
        body_x: 50.0,
        line_step: 15.0,
        bottom_margin: 50.0,
        title_size: 14.0,
        body_size: 11.0,
    };
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    /// Text to draw
    pub text: String,
    /// x in points from the left edge
    pub x: f32,
    /// y in points from the bottom edge
    pub y: f32,
    /// Font size in points
    pub size: f32,
    /// Bold face (title only)
    pub bold: bool,
}

/// One page of a report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportPage {
    /// Lines in drawing order
    pub lines: Vec<ReportLine>,
}

/// A fully laid-out report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// Geometry the layout was computed for
    pub geometry: PageGeometry,
    /// Pages in order; never empty
    pub pages: Vec<ReportPage>,
}

impl ReportLayout {
    /// Total number of body and title lines
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

/// Turns records into layouts and layouts into bytes
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    geometry: PageGeometry,
}

impl ReportRenderer {
    /// Create a renderer for the given geometry
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    /// Lay out a record
    pub fn render(&self, record: &ClaimRecord) -> ReportLayout {
        let g = self.geometry;
        let mut pages = Vec::new();
        let mut page = ReportPage::default();

        page.lines.push(ReportLine {
            text: REPORT_TITLE.to_string(),
            x: g.title_x,
            y: g.height - g.title_offset,
            size: g.title_size,
            bold: true,
        });

        let mut y = g.height - g.first_body_offset;
        for (label, value) in record.labeled_values() {
            for text in wrap_text(&format!("{}: {}", label, value), WRAP_WIDTH) {
                page.lines.push(ReportLine {
                    text,
                    x: g.body_x,
                    y,
                    size: g.body_size,
                    bold: false,
                });
                y -= g.line_step;
                if y < g.bottom_margin {
                    pages.push(std::mem::take(&mut page));
                    y = g.height - g.body_offset;
                }
            }
        }

        if !page.lines.is_empty() {
            pages.push(page);
        }

        ReportLayout {
            geometry: g,
            pages,
        }
    }

    /// Encode a layout in the requested format
    pub fn encode(&self, layout: &ReportLayout, format: ReportFormat) -> Result<Vec<u8>, ReportError> {
        match format {
            ReportFormat::Pdf => encode_pdf(layout),
            ReportFormat::Txt => Ok(encode_text(layout)),
        }
    }
}

/// Encode as plain text: one line per entry, a form feed between pages
pub fn encode_text(layout: &ReportLayout) -> Vec<u8> {
    let mut out = String::new();
    for (idx, page) in layout.pages.iter().enumerate() {
        if idx > 0 {
            out.push('\u{0C}');
        }
        for line in &page.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
    }
    out.into_bytes()
}

/// Encode as an A4 PDF
///
/// Output is not byte-stable across runs: printpdf writes a fresh XMP
/// instance id on every save. Use the layout or the txt encoding when
/// identical bytes are required.
pub fn encode_pdf(layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let g = layout.geometry;
    let width = Mm::from(Pt(g.width));
    let height = Mm::from(Pt(g.height));

    let (doc, page1, layer1) = PdfDocument::new(REPORT_TITLE, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, &font, &bold);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &ReportPage,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for line in &page.lines {
        let face = if line.bold { bold } else { font };
        layer.use_text(
            line.text.as_str(),
            line.size,
            Mm::from(Pt(line.x)),
            Mm::from(Pt(line.y)),
            face,
        );
    }
}

/// Greedy word wrap at `width` characters
///
/// Runs of whitespace collapse to one space; words longer than `width` are
/// split. Blank input yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while !chars.is_empty() {
            let needed = if current_len == 0 { chars.len() } else { current_len + 1 + chars.len() };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(chars.iter());
                current_len += chars.len();
                chars.clear();
            } else if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            } else {
                let rest = chars.split_off(width.min(chars.len()));
                lines.push(chars.iter().collect());
                chars = rest;
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Writes rendered reports to a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    format: ReportFormat,
    renderer: ReportRenderer,
}

impl ReportWriter {
    /// Create a writer for `dir` in the given format
    pub fn new(dir: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            renderer: ReportRenderer::default(),
        }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output format
    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Path the report for `claim_id` is written to
    pub fn path_for(&self, claim_id: &str) -> PathBuf {
        let name = sanitize_file_stem(claim_id);
        self.dir.join(format!("{}.{}", name, self.format.extension()))
    }

    /// Render, encode and write the report for a record
    ///
    /// An existing report for the same claim id is overwritten.
    pub fn write(&self, record: &ClaimRecord) -> Result<PathBuf, ReportError> {
        let layout = self.renderer.render(record);
        debug!(
            "Report for {} laid out on {} page(s)",
            record.claim_id,
            layout.pages.len()
        );
        let bytes = self.renderer.encode(&layout, self.format)?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&record.claim_id);
        std::fs::write(&path, bytes)?;

        info!("Report written to {}", path.display());
        Ok(path)
    }
}

fn sanitize_file_stem(claim_id: &str) -> String {
    claim_id
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
