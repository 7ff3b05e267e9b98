use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{FieldSpec, FieldType, FormSchema, ValueConstraints};
use crate::visibility::{ValueMap, is_filled, is_required, resolve_visibility};

/// One rejected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome of checking a value map against a canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<String>,
}

/// Check live form data against a schema. Hidden fields are skipped
/// entirely: a required field only counts as missing while it is shown.
pub fn validate(schema: &FormSchema, values: &ValueMap) -> ValidationResult {
    let visibility = resolve_visibility(schema, values);

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for field in schema.fields.values() {
        if !visibility.get(&field.name).copied().unwrap_or(true) {
            continue;
        }

        match values.get(&field.name) {
            Some(value) if is_filled(Some(value)) => {
                if let Some(error) = check_value(field, value) {
                    errors.push(error);
                }
            }
            _ => {
                if is_required(field) {
                    missing_required.push(field.name.clone());
                }
            }
        }
    }

    let unknown_fields: Vec<String> = values
        .keys()
        .filter(|key| !schema.fields.contains_key(*key))
        .cloned()
        .collect();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

fn check_value(field: &FieldSpec, value: &Value) -> Option<ValidationError> {
    if !matches_type(field, value) {
        return Some(base_error(field, "type mismatch", "type_mismatch"));
    }

    if field.kind.has_options()
        && let Some(options) = &field.options
        && let Some(text) = value.as_str()
        && !options.iter().any(|option| option.value == text)
    {
        return Some(base_error(
            field,
            "value is not one of the options",
            "enum_mismatch",
        ));
    }

    if field.kind == FieldType::Number
        && let Some(constraints) = &field.value_constraints
        && let Some(error) = enforce_constraints(field, value, constraints)
    {
        return Some(error);
    }

    if field.kind == FieldType::Text
        && let Some(rules) = &field.rules
        && let Some(error) = enforce_text_rules(field, value, rules)
    {
        return Some(error);
    }

    None
}

fn matches_type(field: &FieldSpec, value: &Value) -> bool {
    match field.kind {
        FieldType::Text | FieldType::Radio | FieldType::Select => value.is_string(),
        FieldType::Number => value.is_number(),
    }
}

fn enforce_constraints(
    field: &FieldSpec,
    value: &Value,
    constraints: &ValueConstraints,
) -> Option<ValidationError> {
    let number = value.as_f64()?;

    if let Some(min) = constraints.minimum
        && number < min
    {
        return Some(base_error(field, "value below minimum", "min"));
    }

    if let Some(max) = constraints.maximum
        && number > max
    {
        return Some(base_error(field, "value above maximum", "max"));
    }

    if constraints.allow_negative == Some(false) && number < 0.0 {
        return Some(base_error(
            field,
            "negative values are not allowed",
            "negative_not_allowed",
        ));
    }

    if let Some(places) = constraints.allow_decimal
        && !fits_decimal_places(number, places)
    {
        return Some(base_error(field, "too many decimal places", "decimal_places"));
    }

    None
}

/// Scaled-integer check, good to the precision an editor input produces.
fn fits_decimal_places(number: f64, places: u32) -> bool {
    let scale = 10f64.powi(places.min(12) as i32);
    let scaled = number * scale;
    (scaled - scaled.round()).abs() < 1e-9
}

/// Honor the well-known text directives from the opaque rules map.
/// Malformed directives are ignored, matching the evaluator's stance on
/// unknown rule keywords.
fn enforce_text_rules(
    field: &FieldSpec,
    value: &Value,
    rules: &Map<String, Value>,
) -> Option<ValidationError> {
    let text = value.as_str()?;

    if let Some(max_len) = rules.get("maxlength").and_then(Value::as_u64)
        && text.chars().count() as u64 > max_len
    {
        return Some(base_error(
            field,
            "string longer than max length",
            "max_length",
        ));
    }

    if let Some(pattern) = rules.get("pattern").and_then(Value::as_str)
        && let Ok(regex) = Regex::new(pattern)
        && !regex.is_match(text)
    {
        return Some(base_error(
            field,
            "value does not match pattern",
            "pattern_mismatch",
        ));
    }

    None
}

fn base_error(field: &FieldSpec, message: &str, code: &str) -> ValidationError {
    ValidationError {
        field: Some(field.name.clone()),
        path: Some(format!("/{}", field.name)),
        message: message.into(),
        code: Some(code.into()),
    }
}
