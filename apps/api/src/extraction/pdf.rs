use super::ExtractionError;

/// Best-effort text extraction from PDF bytes.
///
/// Scanned (image-only) PDFs parse successfully but yield no text; the caller's
/// minimum-length check rejects those.
pub fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

