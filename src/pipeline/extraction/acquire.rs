//! Text acquisition orchestrator.
//!
//! One call per document: PDFs get per-page direct text extraction with a
//! rasterize-and-OCR fallback for pages without a text layer; images are
//! OCR'd whole. Trait objects for the OCR engine, text layer and page
//! renderer allow dependency injection in tests.

use std::path::Path;

use super::pdf::PdfTextExtractor;
use super::pdfium::{PdfiumRenderer, RENDER_DPI};
use super::types::{Acquired, DocumentKind, OcrEngine, PageText, PdfPageRenderer, PdfTextLayer};
use super::ExtractionError;

pub struct DocumentExtractor {
    ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    text_layer: Box<dyn PdfTextLayer + Send + Sync>,
    renderer: Option<Box<dyn PdfPageRenderer + Send + Sync>>,
}

impl DocumentExtractor {
    pub fn new(
        ocr_engine: Box<dyn OcrEngine + Send + Sync>,
        text_layer: Box<dyn PdfTextLayer + Send + Sync>,
    ) -> Self {
        Self {
            ocr_engine,
            text_layer,
            renderer: None,
        }
    }

    /// Add a PDF page renderer for per-page OCR of scanned PDFs.
    pub fn with_renderer(mut self, renderer: Box<dyn PdfPageRenderer + Send + Sync>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Production assembly: pdf-extract text layer, PDFium rasterization when
    /// the library is present, Tesseract when compiled in. Missing pieces
    /// degrade (scanned pages stay empty) instead of failing startup.
    pub fn from_environment() -> Self {
        #[cfg(feature = "ocr")]
        let ocr_engine: Box<dyn OcrEngine + Send + Sync> =
            Box::new(super::ocr::SpanishTesseract::new());
        #[cfg(not(feature = "ocr"))]
        let ocr_engine: Box<dyn OcrEngine + Send + Sync> = Box::new(super::ocr::NullOcrEngine);

        let extractor = Self::new(ocr_engine, Box::new(PdfTextExtractor));

        match PdfiumRenderer::new() {
            Ok(renderer) => extractor.with_renderer(Box::new(renderer)),
            Err(e) => {
                tracing::warn!(error = %e, "PDFium unavailable, scanned pages will not be rasterized");
                extractor
            }
        }
    }

    /// Acquire text from the document at `path`.
    ///
    /// Acquisition failures (missing file, corrupt document, whole-image OCR
    /// failure) are errors; a valid document with nothing extractable is
    /// `Ok(Acquired::Empty)`. Per-page OCR failures are logged and that page
    /// contributes nothing; the remaining pages still go through.
    pub fn extract(&self, path: &Path, kind: DocumentKind) -> Result<Acquired, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;

        tracing::info!(
            path = %path.display(),
            kind = kind.as_str(),
            size = bytes.len(),
            "Starting text acquisition"
        );

        match kind {
            DocumentKind::Pdf => self.extract_pdf(&bytes),
            DocumentKind::Image => self.extract_image(&bytes),
        }
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<Acquired, ExtractionError> {
        let direct_pages = self.text_layer.extract_pages(bytes)?;

        let mut blocks: Vec<PageText> = Vec::with_capacity(direct_pages.len());
        for (index, direct) in direct_pages.iter().enumerate() {
            let number = index + 1;
            let trimmed = direct.trim();
            if !trimmed.is_empty() {
                blocks.push(PageText {
                    number,
                    text: trimmed.to_string(),
                    via_ocr: false,
                });
                continue;
            }

            match self.ocr_page(bytes, index) {
                Ok(Some(text)) => blocks.push(PageText {
                    number,
                    text,
                    via_ocr: true,
                }),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(page = number, error = %e, "OCR fallback failed for page");
                }
            }
        }

        if blocks.is_empty() {
            return Ok(Acquired::Empty {
                detail: "PDF sin texto extraíble".to_string(),
            });
        }

        let text = blocks
            .iter()
            .map(PageText::labeled)
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(Acquired::Text(text))
    }

    /// Rasterize one page and OCR it; `None` when the page has no
    /// recognizable text or no renderer is available.
    fn ocr_page(&self, bytes: &[u8], index: usize) -> Result<Option<String>, ExtractionError> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(None);
        };
        let png = renderer.render_page(bytes, index, RENDER_DPI)?;
        let text = self.ocr_engine.ocr_image(&png)?;
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    fn extract_image(&self, bytes: &[u8]) -> Result<Acquired, ExtractionError> {
        let text = self.ocr_engine.ocr_image(bytes)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Acquired::Empty {
                detail: "Imagen sin texto detectable".to_string(),
            });
        }
        Ok(Acquired::Text(trimmed.to_string()))
    }
}

/// Legacy flat-string protocol: the acquired text, `"[INFO] <detail>"` for an
/// empty-but-valid document, or `"[ERROR] <detail>"` for an acquisition
/// failure. Callers must check the `"[ERROR]"` prefix before treating the
/// result as usable text.
pub fn extract_text_marker(
    extractor: &DocumentExtractor,
    path: &Path,
    kind: DocumentKind,
) -> String {
    match extractor.extract(path, kind) {
        Ok(acquired) => acquired.into_marker(),
        Err(ExtractionError::FileNotFound(_)) => "[ERROR] Archivo no encontrado".to_string(),
        Err(e) => match kind {
            DocumentKind::Pdf => format!("[ERROR] Procesando PDF: {e}"),
            DocumentKind::Image => format!("[ERROR] Procesando imagen: {e}"),
        },
    }
}
