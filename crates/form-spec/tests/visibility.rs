use serde_json::{Value, json};

use form_spec::{
    FieldEquals, FieldSpec, FieldType, FormSchema, ValueMap, VisibilityRule, is_filled,
    is_required, is_visible, resolve_visibility,
};

fn field(visible: Option<VisibilityRule>) -> FieldSpec {
    FieldSpec {
        name: "subject".into(),
        kind: FieldType::Text,
        display: Default::default(),
        required: false,
        rules: None,
        options: None,
        value_constraints: None,
        visible,
        prefill: None,
    }
}

fn expr(text: &str) -> Option<VisibilityRule> {
    Some(VisibilityRule::Expr(text.into()))
}

fn rule(value: Value) -> Option<VisibilityRule> {
    Some(serde_json::from_value(value).expect("deserialize rule"))
}

fn values(value: Value) -> ValueMap {
    value.as_object().cloned().expect("object value map")
}

#[test]
fn required_flag_is_strict() {
    assert!(is_required(&FieldSpec {
        required: true,
        ..field(None)
    }));
    assert!(!is_required(&field(None)));
}

#[test]
fn filled_means_present_non_null_non_empty() {
    assert!(is_filled(Some(&json!("x"))));
    assert!(is_filled(Some(&json!(0))));
    assert!(is_filled(Some(&json!(false))));
    assert!(!is_filled(Some(&json!(""))));
    assert!(!is_filled(Some(&Value::Null)));
    assert!(!is_filled(None));
}

#[test]
fn no_rule_means_always_visible() {
    let subject = field(None);
    assert!(is_visible(&subject, &ValueMap::new()));
    assert!(is_visible(&subject, &values(json!({ "anything": "at all" }))));
}

#[test]
fn string_required_rule_tracks_filledness() {
    let subject = field(expr("foo:required"));
    assert!(!is_visible(&subject, &values(json!({ "foo": "" }))));
    assert!(!is_visible(&subject, &ValueMap::new()));
    assert!(is_visible(&subject, &values(json!({ "foo": "x" }))));
    assert!(is_visible(&subject, &values(json!({ "foo": 0 }))));
}

#[test]
fn string_equality_rule_compares_exactly() {
    let subject = field(expr("foo:is:bar"));
    assert!(is_visible(&subject, &values(json!({ "foo": "bar" }))));
    assert!(!is_visible(&subject, &values(json!({ "foo": "baz" }))));
    assert!(!is_visible(&subject, &ValueMap::new()));
}

#[test]
fn string_equality_never_matches_non_string_values() {
    let subject = field(expr("foo:is:0"));
    assert!(!is_visible(&subject, &values(json!({ "foo": 0 }))));
    assert!(is_visible(&field(expr("foo:is:0")), &values(json!({ "foo": "0" }))));
}

#[test]
fn expected_value_keeps_embedded_colons() {
    let subject = field(expr("foo:is:a:b"));
    assert!(is_visible(&subject, &values(json!({ "foo": "a:b" }))));
    assert!(!is_visible(&subject, &values(json!({ "foo": "a" }))));
}

#[test]
fn all_segments_must_hold() {
    let subject = field(expr("a:required|b:is:yes"));
    assert!(is_visible(&subject, &values(json!({ "a": "x", "b": "yes" }))));
    assert!(!is_visible(&subject, &values(json!({ "a": "", "b": "yes" }))));
    assert!(!is_visible(&subject, &values(json!({ "a": "x", "b": "no" }))));
}

#[test]
fn unknown_conditions_never_hide() {
    assert!(is_visible(&field(expr("foo:whatever")), &ValueMap::new()));
    assert!(is_visible(&field(expr("foo:isActive")), &ValueMap::new()));
    assert!(is_visible(
        &field(expr("foo:isActive:x")),
        &values(json!({ "foo": "y" }))
    ));
}

#[test]
fn incomplete_segments_are_vacuous() {
    assert!(is_visible(&field(expr("foo")), &ValueMap::new()));
    assert!(is_visible(&field(expr(":required")), &ValueMap::new()));
    assert!(is_visible(&field(expr("")), &ValueMap::new()));
    assert!(is_visible(&field(expr("||")), &ValueMap::new()));
}

#[test]
fn object_rule_compares_strictly() {
    let subject = field(rule(json!({ "field": "kind", "equals": "full" })));
    assert!(is_visible(&subject, &values(json!({ "kind": "full" }))));
    assert!(!is_visible(&subject, &values(json!({ "kind": "half" }))));
    assert!(!is_visible(&subject, &values(json!({ "kind": 0 }))));
}

#[test]
fn object_rule_with_blank_field_is_vacuous() {
    let subject = field(rule(json!({ "field": "  ", "equals": "full" })));
    assert!(is_visible(&subject, &ValueMap::new()));
}

#[test]
fn object_rule_distinguishes_null_from_absent() {
    let with_null = field(rule(json!({ "field": "kind", "equals": null })));
    assert!(is_visible(&with_null, &values(json!({ "kind": null }))));
    assert!(!is_visible(&with_null, &ValueMap::new()));

    let without_equals = field(Some(VisibilityRule::Condition(FieldEquals {
        field: Some("kind".into()),
        equals: None,
    })));
    assert!(is_visible(&without_equals, &ValueMap::new()));
    assert!(!is_visible(&without_equals, &values(json!({ "kind": null }))));
}

#[test]
fn field_map_rule_requires_every_entry() {
    let subject = field(rule(json!({ "a": "required", "b": "is:yes" })));
    assert!(is_visible(&subject, &values(json!({ "a": "x", "b": "yes" }))));
    assert!(!is_visible(&subject, &values(json!({ "a": "", "b": "yes" }))));
    assert!(!is_visible(&subject, &values(json!({ "a": "x", "b": "no" }))));
}

#[test]
fn field_map_entry_combines_pipe_separated_rules() {
    let subject = field(rule(json!({ "a": "required|is:go" })));
    assert!(is_visible(&subject, &values(json!({ "a": "go" }))));
    assert!(!is_visible(&subject, &values(json!({ "a": "stop" }))));
}

#[test]
fn field_map_ignores_non_string_rules() {
    let subject = field(rule(json!({ "a": 5, "b": true })));
    assert!(is_visible(&subject, &ValueMap::new()));
}

#[test]
fn object_shape_wins_over_field_map_shape() {
    assert!(matches!(
        serde_json::from_value::<VisibilityRule>(json!({ "field": "kind", "equals": "full" }))
            .expect("deserialize"),
        VisibilityRule::Condition(_)
    ));
    assert!(matches!(
        serde_json::from_value::<VisibilityRule>(json!({ "a": "required" }))
            .expect("deserialize"),
        VisibilityRule::FieldRules(_)
    ));
    assert!(matches!(
        serde_json::from_value::<VisibilityRule>(json!("a:required")).expect("deserialize"),
        VisibilityRule::Expr(_)
    ));
}

#[test]
fn resolves_visibility_for_a_whole_schema() {
    let mut schema = FormSchema {
        name: "step".into(),
        label: None,
        endpoint: None,
        fields: Default::default(),
    };
    schema.fields.insert(
        "always".into(),
        FieldSpec {
            name: "always".into(),
            ..field(None)
        },
    );
    schema.fields.insert(
        "gated".into(),
        FieldSpec {
            name: "gated".into(),
            ..field(expr("kind:is:full"))
        },
    );

    let map = resolve_visibility(&schema, &values(json!({ "kind": "half" })));
    assert_eq!(map.get("always"), Some(&true));
    assert_eq!(map.get("gated"), Some(&false));

    let map = resolve_visibility(&schema, &values(json!({ "kind": "full" })));
    assert_eq!(map.get("gated"), Some(&true));
}
