//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::evaluator::evaluate_cv;
use crate::evaluation::models::{
    EvaluationRequest, EvaluationResult, Role, ScoreBand, EXPERIENCED_THRESHOLD_YEARS,
};
use crate::evaluation::rubric::{rubric_for, Rubric, RISK_PENALTY_POINTS};
use crate::extraction::{extract_text, UploadedFile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// The raw multipart form: `cv` (file), `text` (string), `role` (string).
#[derive(Debug, Default)]
pub struct EvaluateForm {
    pub cv: Option<UploadedFile>,
    pub text: Option<String>,
    pub role: Option<String>,
}

impl EvaluateForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = EvaluateForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "cv" => {
                    let file_name = field.file_name().map(String::from);
                    let content_type = field.content_type().map(String::from);
                    let data = field.bytes().await?;
                    let file = UploadedFile {
                        file_name,
                        content_type,
                        data,
                    };
                    if !file.is_blank() {
                        form.cv = Some(file);
                    }
                }
                "text" => form.text = Some(field.text().await?),
                "role" => form.role = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn role(&self) -> Result<Role, AppError> {
        self.role.as_deref().ok_or(AppError::InvalidRole)?.parse()
    }

    /// Resolves the CV text. An uploaded file takes precedence over pasted text.
    pub async fn into_cv_text(self) -> Result<String, AppError> {
        if let Some(file) = self.cv {
            info!(
                "Received file {:?} ({:?}, {} bytes)",
                file.file_name,
                file.content_type,
                file.data.len()
            );
            return Ok(extract_text(file).await?);
        }

        match self.text {
            Some(text) if !text.trim().is_empty() => {
                info!("Using pasted text ({} chars)", text.chars().count());
                Ok(text)
            }
            _ => Err(AppError::MissingContent),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBandInfo {
    pub band: ScoreBand,
    pub min_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricResponse {
    pub roles: Vec<&'static Rubric>,
    pub score_bands: Vec<ScoreBandInfo>,
    pub risk_penalty_points: f64,
    pub experienced_threshold_years: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/evaluate
///
/// Extracts the CV text, asks the model for a verdict and returns it once it
/// passes schema validation.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let multipart = multipart?;
    let request_id = Uuid::new_v4();
    let span = info_span!("evaluate", %request_id);

    async move {
        let form = EvaluateForm::from_multipart(multipart).await?;
        let role = form.role()?;
        let cv_text = form.into_cv_text().await?;
        let request = EvaluationRequest::new(role, cv_text, state.config.min_cv_chars)?;

        info!(
            "Evaluating {} chars for role {}",
            request.cv_text.chars().count(),
            role
        );

        let result = evaluate_cv(state.model.as_ref(), &request, state.config.score_check).await?;
        Ok::<_, AppError>(Json(result))
    }
    .instrument(span)
    .await
}

/// GET /api/rubric
///
/// The evaluation matrix: per-role parameters and weights, score bands and penalty rules.
pub async fn handle_rubric() -> Json<RubricResponse> {
    Json(RubricResponse {
        roles: Role::ALL.into_iter().map(rubric_for).collect(),
        score_bands: ScoreBand::ALL
            .into_iter()
            .map(|band| ScoreBandInfo {
                band,
                min_score: band.min_score(),
            })
            .collect(),
        risk_penalty_points: RISK_PENALTY_POINTS,
        experienced_threshold_years: EXPERIENCED_THRESHOLD_YEARS,
    })
}
