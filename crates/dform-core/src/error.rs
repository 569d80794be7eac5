//! # Error Types
//!
//! Hard failures when loading a descriptor document. Individual malformed
//! descriptors are not errors; they surface as
//! [`DescriptorIssue`](crate::DescriptorIssue)s instead.

use thiserror::Error;

/// The descriptor document as a whole could not be loaded.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// The document is not valid JSON.
    #[error("invalid descriptor JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("invalid descriptor YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed, but its top level is not an array.
    #[error("descriptor document must be an array of fields, found {found}")]
    NotAList {
        /// JSON type of the top-level value.
        found: &'static str,
    },

    /// The descriptor file could not be read.
    #[error("cannot read descriptor file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
