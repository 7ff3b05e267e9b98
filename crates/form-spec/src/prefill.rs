use crate::schema::FormSchema;
use crate::visibility::ValueMap;

/// Build the value map a session starts with: every prefilled field
/// contributes its default, everything else stays unanswered.
pub fn seed_values(schema: &FormSchema) -> ValueMap {
    let mut values = ValueMap::new();
    for field in schema.fields.values() {
        if let Some(prefill) = &field.prefill {
            values.insert(field.name.clone(), prefill.value.clone());
        }
    }
    values
}
