use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::field::{DisplayMeta, EnumOption, FieldSpec, FieldType, ValueConstraints};

/// Canonical schema consumed by a form runtime: fields keyed by name,
/// editor scratch state stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(alias = "items")]
    pub fields: BTreeMap<String, FieldSpec>,
}

/// Editor-facing field entry. Extends the canonical attributes with the
/// scratch buffers the builder UI works in; none of them survive
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SavedField {
    /// Stable key the editor uses for drag/drop reordering.
    #[serde(rename = "__key", default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayMeta>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Map<String, Value>>,
    /// Text-area buffer for editing `rules` as JSON.
    #[serde(rename = "rulesJson", default, skip_serializing_if = "String::is_empty")]
    pub rules_json: String,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,
    /// Visibility rule text as typed by the author.
    #[serde(rename = "visibleRaw", default, skip_serializing_if = "Option::is_none")]
    pub visible_raw: Option<String>,
    /// Possibly already-structured visibility rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Value>,
    /// Editor input before normalization into `prefill.value`.
    #[serde(rename = "prefillValue", default, skip_serializing_if = "Option::is_none")]
    pub prefill_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_constraints: Option<ValueConstraints>,
}

/// Schema as produced by the builder UI: field order is meaningful there,
/// so fields form a sequence rather than a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SavedSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(alias = "items")]
    pub fields: Vec<SavedField>,
}

/// Either representation accepted by [`crate::normalize`], discriminated
/// by whether `fields` is a map (canonical) or a sequence (saved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SchemaInput {
    Canonical(FormSchema),
    Saved(SavedSchema),
}
