//! Form field definitions and the embedded field-list codec

pub mod codec;
mod schema;

pub use schema::{Field, FieldId, FieldOption, FieldType};
