//! Language-model response validation
//!
//! The chat completion is an unvalidated text blob that should contain a
//! JSON object describing the task. This module turns it into a `TaskDraft`
//! or a typed error. Malformed payloads fail the request: a broken upstream
//! response must never be persisted as if it were valid.
//!
//! Priority and due date are deliberately NOT validated here; the resolver
//! and the date normalizer tolerate missing or malformed values and degrade
//! to defined defaults.

use serde_json::Value;
use thiserror::Error;

use taskagent_common::Category;

use crate::models::TaskDraft;

/// Fields the model must always return
const REQUIRED_FIELDS: [&str; 3] = ["name", "category", "confidence_score"];

/// Validation errors for language-model responses
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Payload empty, not JSON, or not a JSON object
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Required keys absent or null
    #[error("Model response missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// confidence_score not numeric or outside [0, 100]
    #[error("Invalid confidence score: {0}")]
    InvalidConfidence(String),
}

impl ParseError {
    /// Stable machine-readable code for API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            ParseError::MissingFields(_) => "MISSING_FIELDS",
            ParseError::InvalidConfidence(_) => "INVALID_CONFIDENCE",
        }
    }
}

/// Parse and validate a raw model payload into a task draft.
///
/// - `name`, `category`, `confidence_score` are required (null counts as
///   missing).
/// - `confidence_score` must be numeric in [0, 100]; in-range fractional
///   values truncate to integer.
/// - `category` parses lossily: unrecognized labels become `Other`.
/// - `priority` is carried as the literal string, defaulting to "Unknown"
///   when absent or not a string.
/// - `due_date` is carried raw; absent or null means no date.
pub fn validate_and_extract(raw: &str) -> Result<TaskDraft, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::MalformedResponse(
            "empty response content".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| ParseError::MalformedResponse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ParseError::MalformedResponse("expected a JSON object".to_string()))?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| object.get(**field).map_or(true, Value::is_null))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingFields(missing));
    }

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            ParseError::MalformedResponse("name must be a non-empty string".to_string())
        })?
        .to_string();

    let confidence_score = extract_confidence(&object["confidence_score"])?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .map(Category::parse_lossy)
        .unwrap_or(Category::Other);

    let priority = object
        .get("priority")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();

    let due_date = object
        .get("due_date")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(TaskDraft {
        name,
        due_date,
        priority,
        category,
        confidence_score,
    })
}

fn extract_confidence(value: &Value) -> Result<u8, ParseError> {
    let number = value
        .as_f64()
        .ok_or_else(|| ParseError::InvalidConfidence(format!("not numeric: {value}")))?;

    if !(0.0..=100.0).contains(&number) {
        return Err(ParseError::InvalidConfidence(format!(
            "out of range [0, 100]: {number}"
        )));
    }

    Ok(number.trunc() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskagent_common::Category;

    #[test]
    fn well_formed_response_extracts_all_fields() {
        let draft = validate_and_extract(
            r#"{
                "name": "Submit tax documents",
                "due_date": "2025-04-15",
                "priority": "High",
                "category": "Finance",
                "confidence_score": 95
            }"#,
        )
        .unwrap();

        assert_eq!(draft.name, "Submit tax documents");
        assert_eq!(draft.due_date.as_deref(), Some("2025-04-15"));
        assert_eq!(draft.priority, "High");
        assert_eq!(draft.category, Category::Finance);
        assert_eq!(draft.confidence_score, 95);
    }

    #[test]
    fn empty_payload_is_malformed() {
        assert!(matches!(
            validate_and_extract(""),
            Err(ParseError::MalformedResponse(_))
        ));
        assert!(matches!(
            validate_and_extract("   \n"),
            Err(ParseError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_json_payload_is_malformed() {
        assert!(matches!(
            validate_and_extract("I could not parse that task."),
            Err(ParseError::MalformedResponse(_))
        ));
        assert!(matches!(
            validate_and_extract(r#"["a", "b"]"#),
            Err(ParseError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_confidence_names_the_field() {
        let err = validate_and_extract(r#"{"name":"x","category":"Work"}"#).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingFields(vec!["confidence_score".to_string()])
        );
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let err = validate_and_extract(r#"{"name":null,"category":"Work","confidence_score":50}"#)
            .unwrap_err();
        assert_eq!(err, ParseError::MissingFields(vec!["name".to_string()]));
    }

    #[test]
    fn confidence_must_be_numeric_and_in_range() {
        let err = validate_and_extract(
            r#"{"name":"x","category":"Work","confidence_score":"very sure"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfidence(_)));

        let err =
            validate_and_extract(r#"{"name":"x","category":"Work","confidence_score":150}"#)
                .unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfidence(_)));

        let err =
            validate_and_extract(r#"{"name":"x","category":"Work","confidence_score":-5}"#)
                .unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfidence(_)));
    }

    #[test]
    fn fractional_confidence_truncates() {
        let draft =
            validate_and_extract(r#"{"name":"x","category":"Work","confidence_score":87.9}"#)
                .unwrap();
        assert_eq!(draft.confidence_score, 87);
    }

    #[test]
    fn unrecognized_category_degrades_to_other() {
        let draft =
            validate_and_extract(r#"{"name":"x","category":"Errands","confidence_score":50}"#)
                .unwrap();
        assert_eq!(draft.category, Category::Other);
    }

    #[test]
    fn absent_priority_and_due_date_have_defined_defaults() {
        let draft =
            validate_and_extract(r#"{"name":"x","category":"Work","confidence_score":50}"#)
                .unwrap();
        assert_eq!(draft.priority, "Unknown");
        assert_eq!(draft.due_date, None);

        // Non-string priority is treated as absent, not an error
        let draft = validate_and_extract(
            r#"{"name":"x","category":"Work","confidence_score":50,"priority":3,"due_date":null}"#,
        )
        .unwrap();
        assert_eq!(draft.priority, "Unknown");
        assert_eq!(draft.due_date, None);
    }
}
