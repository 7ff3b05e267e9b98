#![allow(missing_docs)]

pub mod normalize;
pub mod prefill;
pub mod schema;
pub mod validate;
pub mod value_schema;
pub mod visibility;

pub use normalize::normalize;
pub use prefill::seed_values;
pub use schema::{
    DisplayMeta, EnumOption, FieldSpec, FieldType, FormSchema, Prefill, SavedField, SavedSchema,
    SchemaInput, ValueConstraints,
};
pub use validate::{ValidationError, ValidationResult, validate};
pub use value_schema::generate as value_schema;
pub use visibility::{
    FieldEquals, ValueMap, VisibilityMap, VisibilityRule, is_filled, is_required, is_visible,
    resolve_visibility,
};
