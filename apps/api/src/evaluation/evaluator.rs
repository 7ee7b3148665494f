//! Evaluator: the request/validate pipeline.
//!
//! prompt → model → clean → parse → schema validation → score audit.
//! Nothing is retried and no partial result is ever returned.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ScoreCheck;
use crate::errors::AppError;
use crate::evaluation::audit::audit_scores;
use crate::evaluation::models::{EvaluationRequest, EvaluationResult, ScoreBand};
use crate::evaluation::prompts::build_evaluation_prompt;
use crate::evaluation::schema::validate_evaluation;
use crate::llm_client::{clean_model_output, GenerativeModel};

pub async fn evaluate_cv(
    model: &dyn GenerativeModel,
    request: &EvaluationRequest,
    score_check: ScoreCheck,
) -> Result<EvaluationResult, AppError> {
    let prompt = build_evaluation_prompt(request.role, &request.cv_text);
    debug!(
        "Calling model={} role={} prompt_len={}",
        model.model_id(),
        request.role,
        prompt.len()
    );

    let started = Instant::now();
    let raw = model.generate(&prompt).await?;
    info!(
        "Model replied in {}ms ({} chars)",
        started.elapsed().as_millis(),
        raw.len()
    );

    let cleaned = clean_model_output(&raw);
    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| AppError::response_parse(&e, &raw))?;

    let result = validate_evaluation(&value)?;

    if score_check != ScoreCheck::Off {
        let audit = audit_scores(&result, request.role);
        if !audit.is_consistent() {
            if score_check == ScoreCheck::Enforce {
                return Err(AppError::ScoreInconsistent(audit));
            }
            warn!(
                "Model score arithmetic is inconsistent (recomputed sum {}): {:?}",
                audit.recomputed_sum, audit.discrepancies
            );
        }
    }

    info!(
        "Evaluation complete: score={} band={:?} level={:?} penalty={}",
        result.overall_score,
        ScoreBand::from_score(result.overall_score),
        result.experience_level,
        result.risk_penalty_applied
    );

    Ok(result)
}
