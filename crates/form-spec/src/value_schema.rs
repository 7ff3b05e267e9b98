use serde_json::{Map, Value, json};

use crate::schema::{FieldSpec, FieldType, FormSchema};
use crate::visibility::VisibilityMap;

/// Build a JSON Schema describing acceptable form data for the fields
/// that are currently visible.
pub fn generate(schema: &FormSchema, visibility: &VisibilityMap) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in schema.fields.values() {
        if !visibility.get(&field.name).copied().unwrap_or(true) {
            continue;
        }
        properties.insert(field.name.clone(), property_schema(field));
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": schema.label.clone().unwrap_or_else(|| schema.name.clone()),
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn property_schema(field: &FieldSpec) -> Value {
    let mut map = Map::new();
    if let Some(label) = &field.display.label {
        map.insert("description".into(), Value::String(label.clone()));
    }

    match field.kind {
        FieldType::Text => {
            map.insert("type".into(), Value::String("string".into()));
            if let Some(rules) = &field.rules
                && let Some(max_len) = rules.get("maxlength").and_then(Value::as_u64)
            {
                map.insert("maxLength".into(), Value::from(max_len));
            }
        }
        FieldType::Number => {
            map.insert("type".into(), Value::String("number".into()));
            if let Some(constraints) = &field.value_constraints {
                if let Some(min) = constraints.minimum {
                    map.insert("minimum".into(), json!(min));
                }
                if let Some(max) = constraints.maximum {
                    map.insert("maximum".into(), json!(max));
                }
                if constraints.allow_decimal == Some(0) {
                    map.insert("multipleOf".into(), json!(1));
                }
                if constraints.allow_negative == Some(false) && constraints.minimum.is_none() {
                    map.insert("minimum".into(), json!(0));
                }
            }
        }
        FieldType::Radio | FieldType::Select => {
            map.insert("type".into(), Value::String("string".into()));
            let choices = field
                .options
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|option| Value::String(option.value.clone()))
                .collect::<Vec<_>>();
            map.insert("enum".into(), Value::Array(choices));
        }
    }

    Value::Object(map)
}
