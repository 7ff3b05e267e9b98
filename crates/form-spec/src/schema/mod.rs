pub mod field;
pub mod form;

pub use field::{DisplayMeta, EnumOption, FieldSpec, FieldType, Prefill, ValueConstraints};
pub use form::{FormSchema, SavedField, SavedSchema, SchemaInput};
