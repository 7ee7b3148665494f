//! Structural validation of the model's JSON verdict.
//!
//! Every issue is collected (not just the first) with a path such as
//! `parameters[1].score`, so a failed reply can be debugged from the error body alone.
//! Keys outside the schema are ignored and do not survive into the result.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::evaluation::models::EvaluationResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{}", summarize(.issues))]
#[serde(rename_all = "camelCase")]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
    pub received_keys: Vec<String>,
}

fn summarize(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Shape of one schema key. Numeric ranges are declared on the model structs
/// with `validator` and checked once the shape is known to be right.
#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Number,
    Text,
    NullableText,
    Bool,
    TextList,
    OneOf(&'static [&'static str]),
    Parameters,
}

const RESULT_FIELDS: &[(&str, FieldKind)] = &[
    ("overallScore", FieldKind::Number),
    ("function", FieldKind::OneOf(&["data_science", "digital_marketing"])),
    ("functionLabel", FieldKind::Text),
    ("experienceLevel", FieldKind::OneOf(&["fresher", "experienced"])),
    ("yearsOfExperience", FieldKind::Number),
    ("parameters", FieldKind::Parameters),
    ("validationNotes", FieldKind::TextList),
    ("riskPenaltyApplied", FieldKind::Bool),
    ("riskPenaltyReason", FieldKind::NullableText),
    ("summary", FieldKind::Text),
    ("recommendations", FieldKind::TextList),
];

const PARAMETER_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::Text),
    ("weight", FieldKind::Number),
    ("score", FieldKind::Number),
    ("weightedScore", FieldKind::Number),
    ("positiveIndicators", FieldKind::TextList),
    ("negativeIndicators", FieldKind::TextList),
    ("reasoning", FieldKind::Text),
];

/// Validates a parsed model reply and converts it into an `EvaluationResult`.
///
/// Missing keys and wrong types are reported first, all at once. Range rules
/// (`#[validate]` on the model structs) run only on a reply with the right shape.
pub fn validate_evaluation(value: &Value) -> Result<EvaluationResult, SchemaError> {
    let mut issues = Vec::new();

    let Some(object) = value.as_object() else {
        issues.push(SchemaIssue {
            path: "(root)".to_string(),
            message: format!("Expected object, received {}", type_name(value)),
        });
        return Err(SchemaError {
            issues,
            received_keys: Vec::new(),
        });
    };

    check_object(object, RESULT_FIELDS, "", &mut issues);

    let received_keys: Vec<String> = object.keys().cloned().collect();
    if !issues.is_empty() {
        return Err(SchemaError {
            issues,
            received_keys,
        });
    }

    let result: EvaluationResult =
        match serde_json::from_value(Value::Object(project(object, RESULT_FIELDS))) {
            Ok(result) => result,
            Err(e) => {
                return Err(SchemaError {
                    issues: vec![SchemaIssue {
                        path: "(root)".to_string(),
                        message: e.to_string(),
                    }],
                    received_keys,
                })
            }
        };

    if let Err(errors) = result.validate() {
        let mut issues = Vec::new();
        collect_validation_issues(&errors, "", &mut issues);
        issues.sort_by(|a, b| a.path.cmp(&b.path));
        return Err(SchemaError {
            issues,
            received_keys,
        });
    }

    Ok(result)
}

fn check_object(
    object: &Map<String, Value>,
    fields: &[(&str, FieldKind)],
    prefix: &str,
    issues: &mut Vec<SchemaIssue>,
) {
    for (name, kind) in fields {
        let path = format!("{prefix}{name}");
        match object.get(*name) {
            None => issues.push(SchemaIssue {
                path,
                message: "Required".to_string(),
            }),
            Some(value) => check_value(value, *kind, &path, issues),
        }
    }
}

fn check_value(value: &Value, kind: FieldKind, path: &str, issues: &mut Vec<SchemaIssue>) {
    let message = match kind {
        FieldKind::Number => (!value.is_number()).then(|| expected("number", value)),
        FieldKind::Text => (!value.is_string()).then(|| expected("string", value)),
        FieldKind::NullableText => (!(value.is_string() || value.is_null()))
            .then(|| expected("string or null", value)),
        FieldKind::Bool => (!value.is_boolean()).then(|| expected("boolean", value)),
        FieldKind::OneOf(options) => match value.as_str() {
            Some(s) if options.iter().any(|o| *o == s) => None,
            _ => Some(format!(
                "Invalid enum value. Expected {}, received {}",
                options
                    .iter()
                    .map(|o| format!("'{o}'"))
                    .collect::<Vec<_>>()
                    .join(" | "),
                display_value(value)
            )),
        },
        FieldKind::TextList => match value.as_array() {
            None => Some(expected("array", value)),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_value(item, FieldKind::Text, &format!("{path}[{i}]"), issues);
                }
                None
            }
        },
        FieldKind::Parameters => match value.as_array() {
            None => Some(expected("array", value)),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    match item.as_object() {
                        Some(obj) => {
                            check_object(obj, PARAMETER_FIELDS, &format!("{item_path}."), issues)
                        }
                        None => issues.push(SchemaIssue {
                            path: item_path,
                            message: expected("object", item),
                        }),
                    }
                }
                None
            }
        },
    };

    if let Some(message) = message {
        issues.push(SchemaIssue {
            path: path.to_string(),
            message,
        });
    }
}

/// Flattens `validator` errors into wire-named paths (`parameters[1].score`).
fn collect_validation_issues(
    errors: &ValidationErrors,
    prefix: &str,
    issues: &mut Vec<SchemaIssue>,
) {
    for (field, kind) in errors.errors() {
        let path = format!("{prefix}{}", camel_case(field));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                issues.extend(field_errors.iter().map(|e| SchemaIssue {
                    path: path.clone(),
                    message: validation_message(e),
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validation_issues(nested, &format!("{path}."), issues);
            }
            ValidationErrorsKind::List(items) => {
                for (i, nested) in items {
                    collect_validation_issues(nested, &format!("{path}[{i}]."), issues);
                }
            }
        }
    }
}

fn validation_message(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    if error.code == "range" {
        let param = |name: &str| error.params.get(name).and_then(Value::as_f64);
        if let (Some(value), Some(min)) = (param("value"), param("min")) {
            if value < min {
                return format!("Number must be greater than or equal to {min}");
            }
        }
        if let Some(max) = param("max") {
            return format!("Number must be less than or equal to {max}");
        }
    }
    format!("Invalid value ({})", error.code)
}

/// `overall_score` → `overallScore`, matching the `rename_all` on the model structs.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Copies only the schema's keys, recursing into the parameter list.
fn project(object: &Map<String, Value>, fields: &[(&str, FieldKind)]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(name, kind)| {
            let value = object.get(*name)?;
            let value = match (kind, value) {
                (FieldKind::Parameters, Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|p| Value::Object(project(p, PARAMETER_FIELDS)))
                        .collect(),
                ),
                _ => value.clone(),
            };
            Some((name.to_string(), value))
        })
        .collect()
}

fn expected(what: &str, value: &Value) -> String {
    format!("Expected {what}, received {}", type_name(value))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => type_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::models::{ExperienceLevel, Role};
    use crate::test_support::sample_result_json;

    #[test]
    fn test_valid_reply_passes() {
        let result = validate_evaluation(&sample_result_json()).unwrap();
        assert_eq!(result.function, Role::DataScience);
        assert_eq!(result.experience_level, ExperienceLevel::Experienced);
        assert_eq!(result.parameters.len(), 2);
        assert_eq!(result.parameters[1].name, "Deployment & Application");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let first = validate_evaluation(&sample_result_json()).unwrap();
        let reserialized = serde_json::to_value(&first).unwrap();
        let second = validate_evaluation(&reserialized).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut value = sample_result_json();
        value.as_object_mut().unwrap().remove("summary");
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(
            err.issues,
            vec![SchemaIssue {
                path: "summary".to_string(),
                message: "Required".to_string()
            }]
        );
        assert!(err.to_string().contains("summary: Required"));
        assert!(!err.received_keys.contains(&"summary".to_string()));
    }

    #[test]
    fn test_missing_nullable_field_is_required() {
        let mut value = sample_result_json();
        value.as_object_mut().unwrap().remove("riskPenaltyReason");
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(err.issues[0].path, "riskPenaltyReason");
    }

    #[test]
    fn test_null_penalty_reason_accepted() {
        let mut value = sample_result_json();
        value["riskPenaltyReason"] = Value::Null;
        assert!(validate_evaluation(&value).unwrap().risk_penalty_reason.is_none());
    }

    #[test]
    fn test_nested_parameter_issue_has_index_path() {
        let mut value = sample_result_json();
        value["parameters"][0].as_object_mut().unwrap().remove("reasoning");
        value["parameters"][1]["weight"] = serde_json::json!("60%");
        let err = validate_evaluation(&value).unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["parameters[0].reasoning", "parameters[1].weight"]);
        assert_eq!(err.issues[1].message, "Expected number, received string");
    }

    #[test]
    fn test_parameter_score_above_range() {
        let mut value = sample_result_json();
        value["parameters"][1]["score"] = serde_json::json!(140);
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(
            err.issues,
            vec![SchemaIssue {
                path: "parameters[1].score".to_string(),
                message: "Number must be less than or equal to 100".to_string()
            }]
        );
    }

    #[test]
    fn test_range_issues_are_all_reported_in_path_order() {
        let mut value = sample_result_json();
        value["parameters"][1]["score"] = serde_json::json!(-1);
        value["parameters"][0]["score"] = serde_json::json!(101);
        value["overallScore"] = serde_json::json!(250);
        let err = validate_evaluation(&value).unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["overallScore", "parameters[0].score", "parameters[1].score"]
        );
        assert_eq!(
            err.issues[2].message,
            "Number must be greater than or equal to 0"
        );
        assert!(err.received_keys.contains(&"overallScore".to_string()));
    }

    #[test]
    fn test_range_checks_wait_for_a_well_shaped_reply() {
        let mut value = sample_result_json();
        value["overallScore"] = serde_json::json!(250);
        value.as_object_mut().unwrap().remove("summary");
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "summary");
    }

    #[test]
    fn test_camel_case_paths() {
        assert_eq!(camel_case("overall_score"), "overallScore");
        assert_eq!(camel_case("parameters"), "parameters");
        assert_eq!(camel_case("weighted_score"), "weightedScore");
    }

    #[test]
    fn test_out_of_range_overall_score() {
        let mut value = sample_result_json();
        value["overallScore"] = serde_json::json!(-5);
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(err.issues[0].path, "overallScore");
        assert!(err.issues[0].message.contains("greater than or equal to 0"));
    }

    #[test]
    fn test_invalid_enum_value() {
        let mut value = sample_result_json();
        value["experienceLevel"] = serde_json::json!("senior");
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(
            err.issues[0].message,
            "Invalid enum value. Expected 'fresher' | 'experienced', received 'senior'"
        );
    }

    #[test]
    fn test_wrong_types_reported() {
        let mut value = sample_result_json();
        value["overallScore"] = serde_json::json!("72");
        value["recommendations"] = serde_json::json!(["ok", 3]);
        let err = validate_evaluation(&value).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert_eq!(err.issues[0].message, "Expected number, received string");
        assert_eq!(err.issues[1].path, "recommendations[1]");
    }

    #[test]
    fn test_non_object_root() {
        let err = validate_evaluation(&serde_json::json!([1, 2])).unwrap_err();
        assert_eq!(err.issues[0].path, "(root)");
        assert!(err.received_keys.is_empty());
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let mut value = sample_result_json();
        value["confidence"] = serde_json::json!("high");
        value["parameters"][0]["extra"] = serde_json::json!(true);
        let result = validate_evaluation(&value).unwrap();
        let out = serde_json::to_value(&result).unwrap();
        assert!(out.get("confidence").is_none());
        assert!(out["parameters"][0].get("extra").is_none());
    }
}
