use super::types::OcrEngine;
use super::ExtractionError;

/// Character whitelist for contract OCR: alphanumerics plus accented Spanish
/// letters and the punctuation that appears in amounts, clauses and folios.
pub const SPANISH_WHITELIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyzÁÉÍÓÚáéíóúÑñ.,;:()$-/ ";

/// Tesseract OCR with the Spanish language model.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct SpanishTesseract {
    lang: String,
    whitelist: String,
}

#[cfg(feature = "ocr")]
impl SpanishTesseract {
    pub fn new() -> Self {
        Self {
            lang: "spa".to_string(),
            whitelist: SPANISH_WHITELIST.to_string(),
        }
    }

    /// Override the language(s), e.g. `"spa+eng"`.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }
}

#[cfg(feature = "ocr")]
impl Default for SpanishTesseract {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for SpanishTesseract {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        use tesseract::{OcrEngineMode, PageSegMode, Tesseract};

        let tess = Tesseract::new_with_oem(None, Some(&self.lang), OcrEngineMode::Default)
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let tess = tess
            .set_variable("tessedit_char_whitelist", &self.whitelist)
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
        tess.set_page_seg_mode(PageSegMode::PsmSingleBlock);

        let text = tess
            .get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        Ok(text.trim().to_string())
    }
}

/// Stand-in used when the binary is built without the `ocr` feature.
/// Every call fails, which the PDF path degrades over (pages without a
/// text layer stay empty) and the image path surfaces to the caller.
pub struct NullOcrEngine;

impl OcrEngine for NullOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrUnavailable)
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

/// OCR engine that always fails, for error-path tests.
pub struct FailingOcrEngine;

impl OcrEngine for FailingOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrProcessing("engine crashed".into()))
    }
}
