use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::visibility::VisibilityRule;

/// Widget family a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FieldType {
    Text,
    Number,
    Radio,
    Select,
}

impl FieldType {
    /// Whether the type carries an option list.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Radio | FieldType::Select)
    }
}

/// Presentation hints for a field. Keys beyond the known three are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One selectable choice for Radio and Select fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnumOption {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl EnumOption {
    /// Entries with neither a label nor a value are editor noise.
    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.value.is_empty()
    }
}

/// Numeric bounds and format directives for Number fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValueConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Decimal places permitted; zero means integers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_decimal: Option<u32>,
    /// Whether a minus sign is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_negative: Option<bool>,
}

/// Default applied to a field before user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Prefill {
    pub value: Value,
}

/// Canonical descriptor for a single form field.
///
/// `options` is populated exactly for Radio and Select fields, and
/// `value_constraints` exactly for Number fields; the normalizer enforces
/// both when it builds the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub display: DisplayMeta,
    #[serde(default)]
    pub required: bool,
    /// Validation directives (e.g. `{"maxlength": 280}`), copied through
    /// from the editor verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Map<String, Value>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_constraints: Option<ValueConstraints>,
    /// Absent means the field is always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<VisibilityRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefill: Option<Prefill>,
}
