use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::errors::AppError;

/// Years of experience at which a candidate stops being a fresher.
pub const EXPERIENCED_THRESHOLD_YEARS: f64 = 3.0;

/// The job track a CV is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DataScience,
    DigitalMarketing,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::DataScience, Role::DigitalMarketing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::DataScience => "data_science",
            Role::DigitalMarketing => "digital_marketing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::DataScience => "Data Science",
            Role::DigitalMarketing => "Digital Marketing",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data_science" => Ok(Role::DataScience),
            "digital_marketing" => Ok(Role::DigitalMarketing),
            _ => Err(AppError::InvalidRole),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Fresher,
    Experienced,
}

impl ExperienceLevel {
    pub fn from_years(years: f64) -> Self {
        if years >= EXPERIENCED_THRESHOLD_YEARS {
            ExperienceLevel::Experienced
        } else {
            ExperienceLevel::Fresher
        }
    }
}

/// A role plus the CV text to evaluate. Only constructible with enough text.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub role: Role,
    pub cv_text: String,
}

impl EvaluationRequest {
    pub fn new(role: Role, cv_text: String, min_chars: usize) -> Result<Self, AppError> {
        if cv_text.chars().count() < min_chars {
            return Err(AppError::ContentTooShort);
        }
        Ok(Self { role, cv_text })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ParameterScore {
    pub name: String,
    /// Percentage, e.g. 40 for 40%.
    pub weight: f64,
    /// Raw 0–100 score before weighting.
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
    /// weight × score / 100
    pub weighted_score: f64,
    pub positive_indicators: Vec<String>,
    pub negative_indicators: Vec<String>,
    pub reasoning: String,
}

/// The validated model verdict returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_score: f64,
    pub function: Role,
    pub function_label: String,
    pub experience_level: ExperienceLevel,
    pub years_of_experience: f64,
    #[validate(nested)]
    pub parameters: Vec<ParameterScore>,
    pub validation_notes: Vec<String>,
    pub risk_penalty_applied: bool,
    // Present-but-null is valid, absent is not.
    #[serde(deserialize_with = "required_nullable")]
    pub risk_penalty_reason: Option<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Display band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    Moderate,
    Developing,
    Low,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 5] = [
        ScoreBand::Excellent,
        ScoreBand::Good,
        ScoreBand::Moderate,
        ScoreBand::Developing,
        ScoreBand::Low,
    ];

    pub fn from_score(score: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| score >= band.min_score())
            .unwrap_or(ScoreBand::Low)
    }

    pub fn min_score(&self) -> f64 {
        match self {
            ScoreBand::Excellent => 80.0,
            ScoreBand::Good => 70.0,
            ScoreBand::Moderate => 50.0,
            ScoreBand::Developing => 30.0,
            ScoreBand::Low => 0.0,
        }
    }
}
