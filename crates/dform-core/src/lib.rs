//! # dform-core — Foundational Types for Dynamic Forms
//!
//! Defines the data model shared by every other crate in the workspace:
//! the field descriptors served by the descriptor endpoint, the flat value
//! map a renderer collects from the user, and the [`DescriptorSet`] that
//! enforces descriptor-list invariants on load.
//!
//! ## Key Design Principles
//!
//! 1. **Descriptors are trusted configuration.** A malformed descriptor list
//!    is repaired, never rejected: duplicate names, dangling or cyclic
//!    `dependsOn` references and undecodable entries are dropped and
//!    reported as [`DescriptorIssue`]s.
//!
//! 2. **Closed field types with an open escape hatch.** [`FieldType`] has one
//!    variant per known type plus `Other(String)`, so unknown types survive
//!    a round trip and the schema builder can apply its fallback rule.
//!
//! 3. **Values are scalars.** [`FieldValue`] is a string, number, or boolean.
//!    JSON `null` in a value map means "absent".
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dform-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod set;
pub mod value;

pub use descriptor::{DependsOn, FieldDescriptor, FieldType, SelectOption, ValidationBounds};
pub use error::DescriptorError;
pub use set::{DescriptorIssue, DescriptorSet};
pub use value::{FieldValue, FormValues};
