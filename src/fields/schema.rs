//! Wire types for the field definitions embedded in form steps

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a field within a form step's field list
pub type FieldId = Uuid;

/// Kinds of inputs a form step can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text input
    Text,
    /// Numeric input
    Number,
    /// Filesystem path input
    File,
    /// True/false toggle
    Check,
    /// Selection from predefined options
    Select,
}

/// One `{value, label}` choice of a select field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// One input definition inside a form step.
///
/// Serialized with the historical camelCase keys so existing documents
/// decode unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Identifier scripts use to reference this field; empty until the user
    /// names it. Duplicates are tolerated but make script lookup ambiguous
    /// (first match wins).
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Type-dependent default: string for text/number/file, bool for check,
    /// an option value for select
    #[serde(
        default,
        rename = "defaultValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<serde_json::Value>,
    /// Whether a file field points at a directory instead of a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<bool>,
    /// Present iff `field_type == Select`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl Field {
    /// Fresh field of the given type with empty name and label.
    /// Select fields start with an empty options container; every other
    /// type has none.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: Uuid::new_v4(),
            field_type,
            name: String::new(),
            label: String::new(),
            placeholder: None,
            default_value: None,
            directory: None,
            options: (field_type == FieldType::Select).then(Vec::new),
        }
    }

    pub fn is_select(&self) -> bool {
        self.field_type == FieldType::Select
    }

    /// Label shown to users, falling back to the script-facing name
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_select_field_gets_options_container() {
        let field = Field::new(FieldType::Select);
        assert_eq!(field.options, Some(Vec::new()));
        assert!(field.is_select());
    }

    #[test]
    fn test_new_non_select_field_has_no_options() {
        for field_type in [
            FieldType::Text,
            FieldType::Number,
            FieldType::File,
            FieldType::Check,
        ] {
            let field = Field::new(field_type);
            assert!(field.options.is_none());
            assert!(field.name.is_empty());
            assert!(field.label.is_empty());
        }
    }

    #[test]
    fn test_wire_format_uses_historical_keys() {
        let mut field = Field::new(FieldType::Check);
        field.default_value = Some(serde_json::json!(true));
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains(r#""type":"check""#));
        assert!(json.contains(r#""defaultValue":true"#));
        assert!(!json.contains("placeholder"));
    }

    #[test]
    fn test_display_label_falls_back_to_name() {
        let mut field = Field::new(FieldType::Text);
        field.name = "host".to_string();
        assert_eq!(field.display_label(), "host");
        field.label = "Hostname".to_string();
        assert_eq!(field.display_label(), "Hostname");
    }
}
