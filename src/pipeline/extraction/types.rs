use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Declared kind of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Classify by file extension: `.pdf` is a PDF, anything else is
    /// treated as an image (the upload layer only admits those two).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Image,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

/// Text acquired from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub number: usize,
    pub text: String,
    /// Whether the text came from the OCR fallback rather than the text layer.
    pub via_ocr: bool,
}

impl PageText {
    /// Page block with its header label, as concatenated into the document text.
    pub fn labeled(&self) -> String {
        if self.via_ocr {
            format!("--- Página {} (OCR) ---\n{}", self.number, self.text)
        } else {
            format!("--- Página {} ---\n{}", self.number, self.text)
        }
    }
}

/// Outcome of text acquisition for one document.
///
/// `Empty` is a valid, non-error outcome (a PDF with no extractable text, an
/// image with no detectable text); acquisition failures are `Err` at the
/// call site. [`Acquired::into_marker`] renders the legacy flat-string
/// protocol for callers that branch on `"[INFO]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired {
    /// Usable text.
    Text(String),
    /// Nothing extractable; `detail` explains why.
    Empty { detail: String },
}

impl Acquired {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Legacy flat-string form: the text itself, or `"[INFO] <detail>"`.
    pub fn into_marker(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Empty { detail } => format!("[INFO] {detail}"),
        }
    }
}

/// OCR engine abstraction (allows mocking for tests).
pub trait OcrEngine {
    /// Recognize text in an encoded image (PNG/JPEG bytes).
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Direct text-layer extraction from a PDF, page by page.
pub trait PdfTextLayer {
    /// One string per page, in page order; empty string for pages
    /// without a text layer.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// PDF page rasterization for the OCR fallback.
pub trait PdfPageRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    /// Render a 0-based page to encoded PNG bytes at the given DPI.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_number: usize,
        dpi: u32,
    ) -> Result<Vec<u8>, ExtractionError>;
}
