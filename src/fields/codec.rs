//! Codec and structural edits for the field list embedded in a form step's
//! content.
//!
//! The field list is stored as a JSON array inside the step's `content`
//! string. All edits here operate on the decoded list; callers re-encode and
//! write the result back through the document store.

use serde_json::Value;

use crate::error::ModelError;
use crate::fields::schema::{Field, FieldId, FieldOption, FieldType};

/// Parse a form step's content into its field list.
///
/// Empty or blank content decodes to an empty list (a form step that has no
/// fields yet). Anything else that fails to parse is a hard decode error;
/// silently defaulting would discard user-authored field definitions.
pub fn decode(content: &str) -> Result<Vec<Field>, ModelError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(content)?)
}

/// Serialize a field list back into step content.
///
/// `decode(encode(decode(x)))` is semantically equal to `decode(x)`; the
/// textual form may differ from the original in whitespace and key order.
pub fn encode(fields: &[Field]) -> Result<String, ModelError> {
    Ok(serde_json::to_string(fields)?)
}

/// Append a new field of the given type and return its generated id
pub fn add_field(fields: &mut Vec<Field>, field_type: FieldType) -> FieldId {
    let field = Field::new(field_type);
    let id = field.id;
    fields.push(field);
    id
}

/// Set one attribute of a field by key.
///
/// Keys mirror the wire format: `name`, `label`, `placeholder`,
/// `defaultValue`, `directory`. No type-checking is performed between key
/// and value beyond coercion; string and boolean values are both accepted
/// for any key and never panic. Unknown keys are rejected instead of
/// silently growing the schema.
pub fn update_field(
    fields: &mut [Field],
    id: FieldId,
    key: &str,
    value: Value,
) -> Result<(), ModelError> {
    let field = fields
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or(ModelError::FieldNotFound(id))?;

    match key {
        "name" => field.name = coerce_string(&value),
        "label" => field.label = coerce_string(&value),
        "placeholder" => field.placeholder = Some(coerce_string(&value)),
        "defaultValue" => field.default_value = Some(value),
        "directory" => field.directory = Some(coerce_bool(&value)),
        other => return Err(ModelError::UnknownAttribute(other.to_string())),
    }
    Ok(())
}

/// Remove a field and return it
pub fn delete_field(fields: &mut Vec<Field>, id: FieldId) -> Result<Field, ModelError> {
    let index = fields
        .iter()
        .position(|f| f.id == id)
        .ok_or(ModelError::FieldNotFound(id))?;
    Ok(fields.remove(index))
}

/// Append an empty `{value:"", label:""}` option to a select field
pub fn add_option(fields: &mut [Field], field_id: FieldId) -> Result<(), ModelError> {
    select_options_mut(fields, field_id)?.push(FieldOption::default());
    Ok(())
}

/// Set the `value` or `label` of one option of a select field
pub fn edit_option(
    fields: &mut [Field],
    field_id: FieldId,
    index: usize,
    key: &str,
    value: &str,
) -> Result<(), ModelError> {
    let options = select_options_mut(fields, field_id)?;
    let option = options
        .get_mut(index)
        .ok_or(ModelError::OptionOutOfRange {
            field: field_id,
            index,
        })?;

    match key {
        "value" => option.value = value.to_string(),
        "label" => option.label = value.to_string(),
        other => return Err(ModelError::UnknownAttribute(other.to_string())),
    }
    Ok(())
}

/// Remove one option of a select field by index
pub fn delete_option(
    fields: &mut [Field],
    field_id: FieldId,
    index: usize,
) -> Result<(), ModelError> {
    let options = select_options_mut(fields, field_id)?;
    if index >= options.len() {
        return Err(ModelError::OptionOutOfRange {
            field: field_id,
            index,
        });
    }
    options.remove(index);
    Ok(())
}

/// Toggle a field name in a script step's argument list: remove the first
/// occurrence when present, else append at the end.
pub fn toggle_script_arg(args: &mut Vec<String>, field_name: &str) {
    if let Some(position) = args.iter().position(|a| a == field_name) {
        args.remove(position);
    } else {
        args.push(field_name.to_string());
    }
}

fn select_options_mut(
    fields: &mut [Field],
    field_id: FieldId,
) -> Result<&mut Vec<FieldOption>, ModelError> {
    let field = fields
        .iter_mut()
        .find(|f| f.id == field_id)
        .ok_or(ModelError::FieldNotFound(field_id))?;

    if field.field_type != FieldType::Select {
        return Err(ModelError::NotASelectField(field_id));
    }
    field
        .options
        .as_mut()
        .ok_or(ModelError::NotASelectField(field_id))
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}
