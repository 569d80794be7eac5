//! # Form Validation
//!
//! [`ValidationSchema`] is derived from a descriptor set and never mutated;
//! rebuild it when the descriptors change. Validation is a pure function of
//! (schema, values): it returns data, never panics, and reports at most one
//! violation per field.
//!
//! ## Hidden Fields
//!
//! A field whose `dependsOn` condition is unmet is hidden from the user.
//! By default ([`HiddenFieldPolicy::Validate`]) hidden fields are validated
//! like any other, so a hidden required field blocks submission. With
//! [`HiddenFieldPolicy::Skip`] hidden fields are neither validated nor
//! included in the output.

use std::collections::BTreeMap;
use std::fmt;

use dform_core::{DescriptorSet, FormValues};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::rule::FieldRule;

/// Why a single field failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViolationKind {
    #[error("This field is required")]
    Required,

    #[error("Expected {expected}, received {found}")]
    ExpectedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Must contain at least {min} character(s)")]
    TooShort { min: f64 },

    #[error("Must contain at most {max} character(s)")]
    TooLong { max: f64 },

    #[error("Does not match the required format")]
    PatternMismatch { pattern: String },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Must be greater than or equal to {min}")]
    TooSmall { min: f64 },

    #[error("Must be less than or equal to {max}")]
    TooBig { max: f64 },

    #[error("Invalid option: expected one of {}", quote_all(.allowed))]
    InvalidOption { allowed: Vec<String> },
}

impl ViolationKind {
    /// Machine-readable code for this kind of violation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::ExpectedType { .. } => "invalid_type",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::PatternMismatch { .. } => "invalid_pattern",
            Self::InvalidEmail => "invalid_email",
            Self::TooSmall { .. } => "too_small",
            Self::TooBig { .. } => "too_big",
            Self::InvalidOption { .. } => "invalid_option",
        }
    }
}

fn quote_all(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// A field-scoped validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(kind: ViolationKind) -> Self {
        Self { kind }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable message shown next to the field.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Serialize for FieldViolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FieldViolation", 2)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", &self.message())?;
        s.end()
    }
}

/// Per-field violations from one validation run, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, FieldViolation>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&FieldViolation> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldViolation)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names with violations, sorted.
    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// The `field → message` mapping shown to the user.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0.iter().map(|(k, v)| (k.clone(), v.message())).collect()
    }

    fn insert(&mut self, field: String, violation: FieldViolation) {
        self.0.insert(field, violation);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.0.len())?;
        for (field, violation) in &self.0 {
            write!(f, "\n  {field}: {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// How fields hidden by an unmet `dependsOn` condition are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenFieldPolicy {
    /// Validate hidden fields like visible ones.
    #[default]
    Validate,
    /// Skip hidden fields and drop their values from the output.
    Skip,
}

/// Options applied when building a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    pub hidden_fields: HiddenFieldPolicy,
}

impl SchemaOptions {
    pub fn skip_hidden() -> Self {
        Self {
            hidden_fields: HiddenFieldPolicy::Skip,
        }
    }
}

/// Validator derived from a descriptor set.
#[derive(Debug, Clone)]
pub struct ValidationSchema {
    rules: Vec<FieldRule>,
    options: SchemaOptions,
}

/// Build a schema with default options.
pub fn build_schema(descriptors: &DescriptorSet) -> ValidationSchema {
    build_schema_with(descriptors, SchemaOptions::default())
}

/// Build a schema with explicit options.
pub fn build_schema_with(descriptors: &DescriptorSet, options: SchemaOptions) -> ValidationSchema {
    let rules: Vec<FieldRule> = descriptors.iter().map(FieldRule::derive).collect();
    tracing::debug!(
        fields = rules.len(),
        hidden_fields = ?options.hidden_fields,
        "validation schema built"
    );
    ValidationSchema { rules, options }
}

impl ValidationSchema {
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    fn applies(&self, rule: &FieldRule, values: &FormValues) -> bool {
        match self.options.hidden_fields {
            HiddenFieldPolicy::Validate => true,
            HiddenFieldPolicy::Skip => rule.is_visible(values),
        }
    }

    /// Validate a full set of values.
    ///
    /// On success the result holds the declared fields that were present,
    /// normalized (numeric text becomes a number); undeclared keys are
    /// dropped.
    pub fn validate(&self, values: &FormValues) -> Result<FormValues, ValidationErrors> {
        let mut data = FormValues::new();
        let mut errors = ValidationErrors::default();

        for rule in &self.rules {
            if !self.applies(rule, values) {
                continue;
            }
            match rule.evaluate(values) {
                Ok(Some(value)) => data.insert(rule.name.clone(), value),
                Ok(None) => {}
                Err(violation) => errors.insert(rule.name.clone(), violation),
            }
        }

        if errors.is_empty() {
            Ok(data)
        } else {
            tracing::debug!(failed = errors.len(), "form values rejected");
            Err(errors)
        }
    }

    /// Validate a single field, e.g. while the user is typing.
    ///
    /// Returns `None` when the field passes, is unknown, or is skipped as
    /// hidden.
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<FieldViolation> {
        let rule = self.rule(name)?;
        if !self.applies(rule, values) {
            return None;
        }
        rule.evaluate(values).err()
    }
}
