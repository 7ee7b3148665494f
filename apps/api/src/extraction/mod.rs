// CV text extraction: uploaded file → plain text.
// PDF and DOCX parsing is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod docx;
pub mod pdf;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type (content type: {content_type:?}, name: {file_name:?})")]
    Unsupported {
        content_type: Option<String>,
        file_name: Option<String>,
    },

    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX parse error: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Picks a parser from the declared content type, falling back to the file extension.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();
        let name = file_name.map(str::to_ascii_lowercase).unwrap_or_default();

        if mime == PDF_MIME || name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if mime == DOCX_MIME || name.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else if mime == TEXT_MIME || name.ends_with(".txt") {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }
}

/// A file part received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    /// Browsers submit an empty, unnamed part when no file was chosen.
    pub fn is_blank(&self) -> bool {
        self.data.is_empty() && self.file_name.as_deref().unwrap_or("").is_empty()
    }
}

/// Extracts normalised plain text from an uploaded file.
pub async fn extract_text(file: UploadedFile) -> Result<String, ExtractionError> {
    let kind = DocumentKind::detect(file.content_type.as_deref(), file.file_name.as_deref())
        .ok_or_else(|| ExtractionError::Unsupported {
            content_type: file.content_type.clone(),
            file_name: file.file_name.clone(),
        })?;

    debug!(
        "Extracting {:?} from {:?} ({} bytes)",
        kind,
        file.file_name,
        file.data.len()
    );

    let raw = match kind {
        DocumentKind::PlainText => decode_plain_text(&file.data),
        DocumentKind::Pdf => {
            run_blocking(file.data, pdf::extract_pdf_text, ExtractionError::Pdf).await?
        }
        DocumentKind::Docx => {
            run_blocking(file.data, docx::extract_docx_text, ExtractionError::Docx).await?
        }
    };

    let text = normalize_whitespace(&raw);
    debug!("Extracted {} characters", text.chars().count());
    Ok(text)
}

/// Runs a parser on the blocking pool. A parser that panics or is cancelled
/// is reported through `failed`, the same as a parse error of that format.
async fn run_blocking<F>(
    data: Bytes,
    parse: F,
    failed: fn(String) -> ExtractionError,
) -> Result<String, ExtractionError>
where
    F: FnOnce(&[u8]) -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || parse(&data))
        .await
        .map_err(|e| {
            if e.is_panic() {
                warn!("Parser panicked on uploaded document");
                failed("parser panicked on this document".to_string())
            } else {
                failed(e.to_string())
            }
        })?
}

fn decode_plain_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data)
        .trim_start_matches('\u{feff}')
        .to_string()
}

/// Trims trailing whitespace per line, collapses runs of blank lines to one,
/// and trims the whole text.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.replace("\r\n", "\n").replace('\r', "\n").lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}
