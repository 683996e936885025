pub mod acquire;
pub mod ocr;
pub mod pdf;
pub mod pdfium;
pub mod types;

pub use acquire::*;
pub use ocr::*;
pub use pdf::*;
pub use pdfium::*;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("OCR engine not available (built without the `ocr` feature)")]
    OcrUnavailable,

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF page {page} rendering failed: {reason}")]
    PdfRendering { page: usize, reason: String },

    #[error("PDF is password-protected")]
    PdfEncrypted,

    #[error("image processing error: {0}")]
    ImageProcessing(String),
}
