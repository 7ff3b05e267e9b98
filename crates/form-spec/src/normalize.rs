use std::collections::BTreeMap;

use serde_json::Value;

use crate::schema::{FieldSpec, FieldType, FormSchema, Prefill, SavedField, SavedSchema, SchemaInput};
use crate::visibility::VisibilityRule;

/// Convert editor output into the canonical runtime schema.
///
/// Already-canonical input passes through unchanged, which makes the
/// operation idempotent. Saved input is rebuilt field by field; the only
/// reason a field is dropped is a blank name. Malformed per-field data
/// degrades to a documented default instead of failing the conversion.
pub fn normalize(input: SchemaInput) -> FormSchema {
    match input {
        SchemaInput::Canonical(schema) => schema,
        SchemaInput::Saved(saved) => normalize_saved(saved),
    }
}

fn normalize_saved(saved: SavedSchema) -> FormSchema {
    let mut fields = BTreeMap::new();
    for entry in saved.fields {
        let name = entry.name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let field = canonical_field(name.clone(), entry);
        fields.insert(name, field);
    }
    FormSchema {
        name: saved.name,
        label: saved.label,
        endpoint: saved.endpoint,
        fields,
    }
}

fn canonical_field(name: String, entry: SavedField) -> FieldSpec {
    let visible = resolve_visible(&entry);
    let prefill = resolve_prefill(&entry);
    let SavedField {
        kind,
        display,
        required,
        rules,
        options,
        value_constraints,
        ..
    } = entry;

    let options = kind.has_options().then(|| {
        options
            .unwrap_or_default()
            .into_iter()
            .filter(|option| !option.is_blank())
            .collect::<Vec<_>>()
    });

    FieldSpec {
        name,
        kind,
        display: display.unwrap_or_default(),
        required,
        rules,
        options,
        value_constraints: (kind == FieldType::Number)
            .then(|| value_constraints.unwrap_or_default()),
        visible,
        prefill,
    }
}

/// Pick the raw rule text (author buffer first, structured value second)
/// and parse it. Malformed JSON stays an opaque expression string rather
/// than failing the field.
fn resolve_visible(entry: &SavedField) -> Option<VisibilityRule> {
    let mut text = entry
        .visible_raw
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();
    if text.is_empty()
        && let Some(value) = &entry.visible
    {
        text = stringify_rule(value);
    }
    if text.is_empty() {
        return None;
    }
    if text.starts_with('{') {
        return Some(serde_json::from_str(&text).unwrap_or(VisibilityRule::Expr(text)));
    }
    Some(VisibilityRule::Expr(text))
}

fn stringify_rule(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => other.to_string(),
    }
}

/// Wrap a usable editor prefill. An absent or empty-string input means no
/// prefill at all.
fn resolve_prefill(entry: &SavedField) -> Option<Prefill> {
    let raw = entry.prefill_value.as_ref()?;
    if raw.as_str() == Some("") {
        return None;
    }
    let value = if entry.kind == FieldType::Number {
        coerce_number(raw).unwrap_or_else(|| raw.clone())
    } else {
        raw.clone()
    };
    Some(Prefill { value })
}

/// Parse numeric editor text. Integral input stays integral; text that
/// does not parse to a finite number is left for the caller to keep raw.
fn coerce_number(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(_) => Some(raw.clone()),
        Value::String(text) => {
            let text = text.trim();
            if let Ok(int) = text.parse::<i64>() {
                return Some(Value::from(int));
            }
            let float = text.parse::<f64>().ok()?;
            serde_json::Number::from_f64(float).map(Value::Number)
        }
        _ => None,
    }
}
