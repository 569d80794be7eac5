//! # dform-cli — CLI Tool for Dynamic Form Descriptors
//!
//! Provides the `dform` command-line interface.
//!
//! ## Subcommands
//!
//! - `dform check`: load a descriptor file and report repairs.
//! - `dform validate`: validate a values file against a descriptor file.
//! - `dform fetch`: fetch descriptors from a running service.
//! - `dform json-schema`: print the JSON Schema derived from descriptors.
//!
//! ```bash
//! dform check form.yaml --strict
//! dform validate --descriptors form.yaml --values answers.json
//! dform fetch --url http://localhost:3000
//! dform json-schema form.json --skip-hidden
//! ```

pub mod check;
pub mod export;
pub mod fetch;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use dform_core::{DescriptorSet, FormValues};
use dform_schema::SchemaOptions;

/// Load a descriptor file, JSON or YAML by extension.
pub fn load_descriptors(path: &Path) -> Result<DescriptorSet> {
    DescriptorSet::load(path)
        .with_context(|| format!("failed to load descriptors from {}", path.display()))
}

/// Load a values file: a JSON or YAML mapping of field name to scalar.
pub fn load_values(path: &Path) -> Result<FormValues> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read values file: {}", path.display()))?;
    let values = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid values YAML: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid values JSON: {}", path.display()))?
    };
    Ok(values)
}

/// Schema options for the `--skip-hidden` flag.
pub fn schema_options(skip_hidden: bool) -> SchemaOptions {
    if skip_hidden {
        SchemaOptions::skip_hidden()
    } else {
        SchemaOptions::default()
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}
