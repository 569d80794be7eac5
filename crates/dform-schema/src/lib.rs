//! # dform-schema — Validation Schema Builder
//!
//! Turns a [`DescriptorSet`](dform_core::DescriptorSet) into a
//! [`ValidationSchema`]: one [`FieldRule`] per descriptor, each carrying a
//! tagged [`Rule`] variant for the field's type. A single evaluator walks
//! the rules against a [`FormValues`](dform_core::FormValues) map.
//!
//! ## Rule Derivation (`rule`)
//!
//! | type | rule |
//! |---|---|
//! | text, textarea | string, optional min/max length and pattern |
//! | email | string in email format |
//! | number | number, optional min/max |
//! | checkbox | boolean |
//! | select | one of the option values (any string when there are none) |
//! | anything else | any string |
//!
//! ## Validation (`validate`)
//!
//! [`ValidationSchema::validate`] returns the cleaned values or a
//! [`ValidationErrors`] map with at most one [`FieldViolation`] per field.
//! Validation never panics and never short-circuits across fields.
//!
//! ## Export (`export`)
//!
//! [`ValidationSchema::to_json_schema`] renders the derived rules as a
//! Draft 2020-12 JSON Schema document.

pub mod export;
pub mod rule;
pub mod validate;

pub use rule::{FieldRule, Rule};
pub use validate::{
    build_schema, build_schema_with, FieldViolation, HiddenFieldPolicy, SchemaOptions,
    ValidationErrors, ValidationSchema, ViolationKind,
};
