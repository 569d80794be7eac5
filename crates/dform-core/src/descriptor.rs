//! # Field Descriptors
//!
//! One [`FieldDescriptor`] describes one form field: its key, label, input
//! type, whether it is required, and the optional constraints the schema
//! builder turns into a validation rule.
//!
//! The wire format is the JSON object served by the descriptor endpoint,
//! with camelCase keys (`dependsOn`) and the input type under `"type"`.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::value::{FieldValue, FormValues};

/// Input type of a form field.
///
/// Unknown type strings are kept verbatim in [`FieldType::Other`] rather
/// than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Select,
    Checkbox,
    Textarea,
    /// Any type string outside the known set.
    Other(String),
}

impl FieldType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Textarea => "textarea",
            Self::Other(s) => s,
        }
    }

    /// Whether this type is outside the known set.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "number" => Self::Number,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            "textarea" => Self::Textarea,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional constraints attached to a field.
///
/// `min`/`max` are string lengths for text types and a numeric range for
/// `number`. `pattern` is a regular expression applied to text types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One choice of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    #[serde(default)]
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Visibility condition: show the field only while `field` holds `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DependsOn {
    /// Name of the controlling field.
    pub field: String,
    /// Literal the controlling field must equal.
    pub value: FieldValue,
}

impl DependsOn {
    pub fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the condition holds for the current values.
    ///
    /// Comparison is strict: the string `"1"` does not equal the number `1`,
    /// and an absent controlling value never matches.
    pub fn is_met(&self, values: &FormValues) -> bool {
        values.get(&self.field) == Some(&self.value)
    }
}

/// Static metadata describing one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key within one descriptor list.
    pub name: String,
    /// Display text. Has no validation role.
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    #[schema(value_type = String, example = "text")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
}

impl FieldDescriptor {
    /// Create a descriptor with no constraints, options, or condition.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            options: None,
            validation: None,
            placeholder: None,
            description: None,
            depends_on: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.validation.get_or_insert_with(Default::default).min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.validation.get_or_insert_with(Default::default).max = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation.get_or_insert_with(Default::default).pattern = Some(pattern.into());
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn depends_on(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.depends_on = Some(DependsOn::new(field, value));
        self
    }

    /// Whether the field should currently be shown.
    ///
    /// Fields without a `dependsOn` condition are always visible.
    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.depends_on.as_ref().map_or(true, |d| d.is_met(values))
    }
}
