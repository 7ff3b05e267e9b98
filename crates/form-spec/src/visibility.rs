use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::schema::{FieldSpec, FormSchema};

/// Live form data, keyed by field name. Read-only to the evaluator.
pub type ValueMap = serde_json::Map<String, Value>;

/// Per-field visibility verdicts for a whole schema.
pub type VisibilityMap = BTreeMap<String, bool>;

/// Single-condition rule: the named field must hold an exact value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldEquals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Expected value under strict equality. An explicit JSON `null` here
    /// matches a stored null; an absent `equals` matches an absent entry.
    #[serde(
        default,
        deserialize_with = "some_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub equals: Option<Value>,
}

fn some_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A field's conditional-visibility rule in one of its three surface
/// forms, discriminated by structural shape at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum VisibilityRule {
    /// `{"field": "duration", "equals": "full"}`
    Condition(FieldEquals),
    /// `"duration:is:full|days:required"`
    Expr(String),
    /// `{"duration": "is:full", "days": "required"}` -- every entry must
    /// hold. Non-string rule values are vacuously satisfied.
    FieldRules(BTreeMap<String, Value>),
}

impl VisibilityRule {
    /// Evaluate the rule against the current value map.
    pub fn holds(&self, values: &ValueMap) -> bool {
        match self {
            VisibilityRule::Condition(condition) => condition.holds(values),
            VisibilityRule::Expr(expr) => {
                expr.split('|').all(|segment| segment_holds(values, segment))
            }
            VisibilityRule::FieldRules(entries) => entries.iter().all(|(field, rules)| {
                rules
                    .as_str()
                    .map_or(true, |rules| field_rules_hold(values, field, rules))
            }),
        }
    }
}

impl FieldEquals {
    fn holds(&self, values: &ValueMap) -> bool {
        let field = self.field.as_deref().unwrap_or_default().trim();
        if field.is_empty() {
            return true;
        }
        values.get(field) == self.equals.as_ref()
    }
}

/// True when the field must be answered.
pub fn is_required(field: &FieldSpec) -> bool {
    field.required
}

/// True when a value counts as answered: present, non-null, and not the
/// empty string. Zero and `false` count as answered.
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

/// Decide whether a field is currently shown given live form data.
///
/// A field with no rule is always visible. Unknown rule keywords never
/// hide a field, so forward-compatible schemas degrade to visible.
pub fn is_visible(field: &FieldSpec, values: &ValueMap) -> bool {
    match &field.visible {
        None => true,
        Some(rule) => rule.holds(values),
    }
}

/// Evaluate every field of a schema in one pass.
pub fn resolve_visibility(schema: &FormSchema, values: &ValueMap) -> VisibilityMap {
    schema
        .fields
        .values()
        .map(|field| (field.name.clone(), is_visible(field, values)))
        .collect()
}

/// One `field:condition[:extra]` segment of the string form. The extra
/// part keeps any further colons. Segments missing a field or a condition
/// are vacuously satisfied.
fn segment_holds(values: &ValueMap, segment: &str) -> bool {
    let mut parts = segment.splitn(3, ':');
    let field = parts.next().unwrap_or_default();
    let condition = parts.next().unwrap_or_default();
    let extra = parts.next();
    if field.is_empty() || condition.is_empty() {
        return true;
    }
    match condition {
        "required" => field_rule_holds(values, field, "required"),
        "is" => field_rule_holds(values, field, &format!("is:{}", extra.unwrap_or_default())),
        _ if condition.starts_with("is") => {
            let rule = match extra {
                Some(extra) if !extra.is_empty() => format!("{}:{}", condition, extra),
                _ => condition.to_string(),
            };
            field_rule_holds(values, field, &rule)
        }
        _ => true,
    }
}

/// `|`-separated rules applying to a single field (field-map entries).
fn field_rules_hold(values: &ValueMap, field: &str, rules: &str) -> bool {
    rules.split('|').all(|rule| field_rule_holds(values, field, rule))
}

/// The single place defining what `required` and `is:` mean. Anything
/// else is an unknown rule and is ignored.
fn field_rule_holds(values: &ValueMap, field: &str, rule: &str) -> bool {
    let rule = rule.trim();
    if rule.is_empty() {
        return true;
    }
    if rule == "required" {
        return is_filled(values.get(field));
    }
    if let Some(expected) = rule.strip_prefix("is:") {
        return values.get(field).and_then(Value::as_str) == Some(expected);
    }
    true
}
