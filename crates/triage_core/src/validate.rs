//! Validation of model output
//!
//! Models wrap their answer in commentary or markdown fences often enough
//! that the reply is treated as untrusted text: the first JSON object is
//! pulled out, checked field by field, and the severity label is repaired
//! when it is not one of the canonical values.

use crate::types::{SeverityCategory, SymptomAnalysis};
use serde_json::{Map, Value};
use thiserror::Error;

/// Fields every analysis must carry
pub const REQUIRED_FIELDS: [&str; 5] = [
    "possibleCauses",
    "severityCategory",
    "recommendations",
    "whenToVisitVet",
    "disclaimer",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Could not parse AI response as JSON: no object found")]
    NoJson,

    #[error("Could not parse AI response as JSON: {0}")]
    Parse(String),

    #[error("Invalid AI response structure: missing {0}")]
    MissingField(&'static str),

    #[error("Invalid AI response structure: {field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Extract the first brace-delimited JSON object from raw model text
///
/// Parsing starts at the first `{` and consumes exactly one JSON value, so
/// trailing commentary or a closing code fence is ignored.
pub fn extract_json_object(raw: &str) -> Result<Map<String, Value>, ValidationError> {
    let start = raw.find('{').ok_or(ValidationError::NoJson)?;

    let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(Value::Object(map))) => Ok(map),
        Some(Ok(_)) => Err(ValidationError::Parse("expected an object".to_string())),
        Some(Err(e)) => Err(ValidationError::Parse(e.to_string())),
        None => Err(ValidationError::NoJson),
    }
}

/// Parse and validate a raw model reply into a [`SymptomAnalysis`]
pub fn validate_analysis(raw: &str) -> Result<SymptomAnalysis, ValidationError> {
    let object = extract_json_object(raw)?;

    for field in REQUIRED_FIELDS {
        if is_absent(object.get(field)) {
            return Err(ValidationError::MissingField(field));
        }
    }

    // Non-string labels are as unrecognized as unknown strings
    let severity_category = object
        .get("severityCategory")
        .and_then(Value::as_str)
        .map(SeverityCategory::normalize)
        .unwrap_or_default();

    Ok(SymptomAnalysis {
        possible_causes: string_list(&object, "possibleCauses")?,
        severity_category,
        recommendations: string_list(&object, "recommendations")?,
        when_to_visit_vet: string_field(&object, "whenToVisitVet")?,
        disclaimer: string_field(&object, "disclaimer")?,
    })
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn string_list(object: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, ValidationError> {
    let wrong_type = ValidationError::WrongType {
        field,
        expected: "an array of strings",
    };

    let Some(Value::Array(items)) = object.get(field) else {
        return Err(wrong_type);
    };

    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(|| wrong_type.clone()))
        .collect()
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ValidationError::WrongType {
            field,
            expected: "a string",
        })
}
