//! # Field Rules
//!
//! [`Rule`] is the tagged representation of one field's value constraint.
//! [`FieldRule`] adds the per-field context (name, requiredness, visibility
//! condition) and implements the evaluation order:
//!
//! 1. blank value (missing or `""`): required error, or accepted when optional;
//! 2. otherwise the base rule and its modifiers, first failure wins.

use std::sync::OnceLock;

use dform_core::{DependsOn, FieldDescriptor, FieldType, FieldValue, FormValues};
use regex::Regex;

use crate::validate::{FieldViolation, ViolationKind};

/// Value constraint derived from a field's type and bounds.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Free text with optional length bounds and pattern.
    Text {
        min_len: Option<f64>,
        max_len: Option<f64>,
        pattern: Option<Regex>,
    },
    /// Text in email-address format.
    Email,
    /// Number, or a string that parses as a finite number.
    Number { min: Option<f64>, max: Option<f64> },
    /// Boolean.
    Boolean,
    /// String equal to one of the listed values.
    OneOf(Vec<String>),
    /// Any string.
    AnyString,
}

impl Rule {
    /// Derive the rule for a descriptor.
    ///
    /// Bounds that do not apply to the type are ignored. A pattern that
    /// does not compile is dropped with a warning.
    pub fn derive(descriptor: &FieldDescriptor) -> Self {
        let bounds = descriptor.validation.clone().unwrap_or_default();
        match &descriptor.field_type {
            FieldType::Text | FieldType::Textarea => Self::Text {
                min_len: bounds.min,
                max_len: bounds.max,
                pattern: bounds.pattern.and_then(|p| compile_pattern(&descriptor.name, &p)),
            },
            FieldType::Email => Self::Email,
            FieldType::Number => Self::Number {
                min: bounds.min,
                max: bounds.max,
            },
            FieldType::Checkbox => Self::Boolean,
            FieldType::Select => match &descriptor.options {
                Some(options) if !options.is_empty() => {
                    Self::OneOf(options.iter().map(|o| o.value.clone()).collect())
                }
                _ => {
                    tracing::debug!(field = %descriptor.name, "select without options accepts any string");
                    Self::AnyString
                }
            },
            FieldType::Other(kind) => {
                tracing::debug!(field = %descriptor.name, kind = %kind, "unknown field type treated as string");
                Self::AnyString
            }
        }
    }

    /// Check a non-blank value, returning the normalized value on success.
    pub fn check(&self, value: &FieldValue) -> Result<FieldValue, ViolationKind> {
        match self {
            Self::Text {
                min_len,
                max_len,
                pattern,
            } => {
                let s = expect_str(value)?;
                let len = s.chars().count() as f64;
                if let Some(min) = *min_len {
                    if len < min {
                        return Err(ViolationKind::TooShort { min });
                    }
                }
                if let Some(max) = *max_len {
                    if len > max {
                        return Err(ViolationKind::TooLong { max });
                    }
                }
                if let Some(re) = pattern {
                    if !re.is_match(s) {
                        return Err(ViolationKind::PatternMismatch {
                            pattern: re.as_str().to_string(),
                        });
                    }
                }
                Ok(value.clone())
            }
            Self::Email => {
                let s = expect_str(value)?;
                if is_email(s) {
                    Ok(value.clone())
                } else {
                    Err(ViolationKind::InvalidEmail)
                }
            }
            Self::Number { min, max } => {
                let n = coerce_number(value)?;
                if let Some(min) = *min {
                    if n < min {
                        return Err(ViolationKind::TooSmall { min });
                    }
                }
                if let Some(max) = *max {
                    if n > max {
                        return Err(ViolationKind::TooBig { max });
                    }
                }
                Ok(FieldValue::Number(n))
            }
            Self::Boolean => match value {
                FieldValue::Bool(_) => Ok(value.clone()),
                other => Err(ViolationKind::ExpectedType {
                    expected: "boolean",
                    found: other.kind(),
                }),
            },
            Self::OneOf(allowed) => {
                let s = expect_str(value)?;
                if allowed.iter().any(|a| a == s) {
                    Ok(value.clone())
                } else {
                    Err(ViolationKind::InvalidOption {
                        allowed: allowed.clone(),
                    })
                }
            }
            Self::AnyString => expect_str(value).map(|_| value.clone()),
        }
    }
}

/// A [`Rule`] bound to one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub required: bool,
    pub rule: Rule,
    pub depends_on: Option<DependsOn>,
}

impl FieldRule {
    pub fn derive(descriptor: &FieldDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            required: descriptor.required,
            rule: Rule::derive(descriptor),
            depends_on: descriptor.depends_on.clone(),
        }
    }

    /// Whether the field's visibility condition holds.
    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.depends_on.as_ref().map_or(true, |d| d.is_met(values))
    }

    /// Evaluate this field against the submitted values.
    ///
    /// `Ok(None)` means the field was absent and optional.
    pub fn evaluate(&self, values: &FormValues) -> Result<Option<FieldValue>, FieldViolation> {
        match values.get(&self.name) {
            None => self.blank(None),
            Some(v) if v.is_empty() => self.blank(Some(v)),
            Some(v) => self
                .rule
                .check(v)
                .map(Some)
                .map_err(FieldViolation::new),
        }
    }

    fn blank(&self, value: Option<&FieldValue>) -> Result<Option<FieldValue>, FieldViolation> {
        if self.required {
            Err(FieldViolation::new(ViolationKind::Required))
        } else {
            Ok(value.cloned())
        }
    }
}

fn expect_str(value: &FieldValue) -> Result<&str, ViolationKind> {
    value.as_str().ok_or(ViolationKind::ExpectedType {
        expected: "string",
        found: value.kind(),
    })
}

fn coerce_number(value: &FieldValue) -> Result<f64, ViolationKind> {
    let mismatch = || ViolationKind::ExpectedType {
        expected: "number",
        found: value.kind(),
    };
    match value {
        FieldValue::Number(n) => Ok(*n),
        FieldValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(mismatch),
        FieldValue::Bool(_) => Err(mismatch()),
    }
}

fn compile_pattern(field: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(field = %field, pattern = %pattern, error = %e, "ignoring invalid pattern");
            None
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Email format check: a dotted domain with an alphabetic TLD, and a local
/// part that neither starts with a dot nor contains consecutive dots.
pub(crate) fn is_email(s: &str) -> bool {
    if s.starts_with('.') || s.contains("..") {
        return false;
    }
    email_regex().is_match(s)
}
