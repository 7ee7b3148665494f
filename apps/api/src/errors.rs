use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::evaluation::audit::ScoreAudit;
use crate::evaluation::schema::SchemaError;
use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Number of characters of a bad model reply echoed back for debugging.
const RESPONSE_SAMPLE_CHARS: usize = 300;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Input problems map to 400, downstream model and validation failures to 500.
/// The body is always `{ "error": string, "debug"?: any }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid role")]
    InvalidRole,

    #[error("No CV content provided")]
    MissingContent,

    #[error("CV content too short")]
    ContentTooShort,

    #[error("Invalid form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Not a multipart form: {0}")]
    FormRejected(#[from] MultipartRejection),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Model response is not JSON: {message}")]
    ResponseParse {
        message: String,
        response_length: usize,
        response_sample: String,
    },

    #[error("Schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("Score consistency check failed")]
    ScoreInconsistent(ScoreAudit),
}

impl AppError {
    pub fn response_parse(err: &serde_json::Error, raw: &str) -> Self {
        AppError::ResponseParse {
            message: err.to_string(),
            response_length: raw.len(),
            response_sample: raw.chars().take(RESPONSE_SAMPLE_CHARS).collect(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRole
            | AppError::MissingContent
            | AppError::ContentTooShort
            | AppError::Multipart(_)
            | AppError::FormRejected(_)
            | AppError::Extraction(_) => StatusCode::BAD_REQUEST,
            AppError::Llm(_)
            | AppError::ResponseParse { .. }
            | AppError::Schema(_)
            | AppError::ScoreInconsistent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message and optional debug payload for the response body.
    fn body_parts(&self) -> (String, Option<Value>) {
        match self {
            AppError::InvalidRole => (
                "Please select a valid role: data_science or digital_marketing".to_string(),
                None,
            ),
            AppError::MissingContent => ("No CV content provided".to_string(), None),
            AppError::ContentTooShort => (
                "CV content too short. Please provide a complete CV.".to_string(),
                None,
            ),
            AppError::Multipart(e) => ("Invalid form data.".to_string(), Some(json!(e.body_text()))),
            AppError::FormRejected(e) => {
                ("Invalid form data.".to_string(), Some(json!(e.body_text())))
            }
            AppError::Extraction(ExtractionError::Unsupported { .. }) => (
                "Unsupported file type. Please upload a .pdf, .docx, or .txt file.".to_string(),
                None,
            ),
            AppError::Extraction(e @ ExtractionError::Pdf(_)) => (
                "PDF parsing failed. Please try uploading a .docx file instead.".to_string(),
                Some(json!(e.to_string())),
            ),
            AppError::Extraction(e) => (
                "Failed to read file content.".to_string(),
                Some(json!(e.to_string())),
            ),
            AppError::Llm(e @ LlmError::EmptyContent { .. }) => (
                "Malformed response from model".to_string(),
                Some(json!({ "name": e.kind(), "message": e.to_string() })),
            ),
            AppError::Llm(e) => (
                "Model call failed".to_string(),
                Some(json!({
                    "name": e.kind(),
                    "message": e.to_string(),
                    "status": e.status(),
                })),
            ),
            AppError::ResponseParse {
                message,
                response_length,
                response_sample,
            } => (
                "Failed to parse model response as JSON".to_string(),
                Some(json!({
                    "message": message,
                    "responseLength": response_length,
                    "responseSample": response_sample,
                })),
            ),
            AppError::Schema(e) => (
                "Model output does not match expected schema".to_string(),
                Some(json!({
                    "message": e.to_string(),
                    "firstError": e.issues.first(),
                    "issues": e.issues,
                    "receivedKeys": e.received_keys,
                })),
            ),
            AppError::ScoreInconsistent(audit) => (
                "Model output failed score consistency check".to_string(),
                Some(json!({
                    "recomputedSum": audit.recomputed_sum,
                    "discrepancies": audit.discrepancies,
                })),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self:?}");
        } else {
            tracing::warn!("Rejected request: {self}");
        }

        let (message, debug) = self.body_parts();
        let body = match debug {
            Some(debug) => json!({ "error": message, "debug": debug }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}
