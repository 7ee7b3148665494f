//! Score audit: recomputes the arithmetic the model was instructed to perform.
//!
//! The audit never rewrites a result. It reports discrepancies, and the caller
//! decides (via `ScoreCheck`) whether to ignore, log or reject them.

use serde::Serialize;

use crate::evaluation::models::{EvaluationResult, ExperienceLevel, Role};
use crate::evaluation::rubric::{rubric_for, RISK_PENALTY_POINTS};

const WEIGHTED_SCORE_TOLERANCE: f64 = 0.5;
const OVERALL_SCORE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    WeightedScore {
        parameter: String,
        expected: f64,
        reported: f64,
    },
    OverallScore {
        expected: f64,
        reported: f64,
    },
    WeightTotal {
        total: f64,
    },
    RubricWeight {
        parameter: String,
        expected: u32,
        reported: f64,
    },
    RoleMismatch {
        requested: Role,
        reported: Role,
    },
    ExperienceLevel {
        years: f64,
        expected: ExperienceLevel,
        reported: ExperienceLevel,
    },
    MissingPenaltyReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreAudit {
    /// Σ weight × score / 100, before any penalty.
    pub recomputed_sum: f64,
    pub discrepancies: Vec<Discrepancy>,
}

impl ScoreAudit {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

pub fn audit_scores(result: &EvaluationResult, requested: Role) -> ScoreAudit {
    let mut discrepancies = Vec::new();
    let rubric = rubric_for(requested);

    let mut recomputed_sum = 0.0;
    let mut weight_total = 0.0;
    for p in &result.parameters {
        let expected = p.weight * p.score / 100.0;
        recomputed_sum += expected;
        weight_total += p.weight;

        if (expected - p.weighted_score).abs() > WEIGHTED_SCORE_TOLERANCE {
            discrepancies.push(Discrepancy::WeightedScore {
                parameter: p.name.clone(),
                expected: round1(expected),
                reported: p.weighted_score,
            });
        }

        if let Some(rp) = rubric.parameter(&p.name) {
            if (f64::from(rp.weight) - p.weight).abs() > f64::EPSILON {
                discrepancies.push(Discrepancy::RubricWeight {
                    parameter: p.name.clone(),
                    expected: rp.weight,
                    reported: p.weight,
                });
            }
        }
    }

    if (weight_total - 100.0).abs() > f64::EPSILON {
        discrepancies.push(Discrepancy::WeightTotal {
            total: weight_total,
        });
    }

    let penalty = if result.risk_penalty_applied {
        RISK_PENALTY_POINTS
    } else {
        0.0
    };
    let expected_overall = (recomputed_sum - penalty).clamp(0.0, 100.0);
    if (expected_overall - result.overall_score).abs() > OVERALL_SCORE_TOLERANCE {
        discrepancies.push(Discrepancy::OverallScore {
            expected: round1(expected_overall),
            reported: result.overall_score,
        });
    }

    if result.function != requested {
        discrepancies.push(Discrepancy::RoleMismatch {
            requested,
            reported: result.function,
        });
    }

    let expected_level = ExperienceLevel::from_years(result.years_of_experience);
    if expected_level != result.experience_level {
        discrepancies.push(Discrepancy::ExperienceLevel {
            years: result.years_of_experience,
            expected: expected_level,
            reported: result.experience_level,
        });
    }

    let has_reason = result
        .risk_penalty_reason
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if result.risk_penalty_applied && !has_reason {
        discrepancies.push(Discrepancy::MissingPenaltyReason);
    }

    ScoreAudit {
        recomputed_sum: round1(recomputed_sum),
        discrepancies,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
