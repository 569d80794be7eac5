//! # Application State
//!
//! Configuration and the shared, read-only state handed to every handler:
//! the loaded descriptor set and the schema derived from it. Both are built
//! once at startup and never mutated, so handlers share them through `Arc`
//! without locking.

use std::path::PathBuf;
use std::sync::Arc;

use dform_core::{DescriptorError, DescriptorSet};
use dform_schema::{build_schema_with, HiddenFieldPolicy, SchemaOptions, ValidationSchema};
use thiserror::Error;

use crate::sample::sample_form;

/// Invalid configuration value.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be true or false, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Server configuration, read from the environment.
///
/// | Variable | Default | Meaning |
/// |---|---|---|
/// | `DFORM_PORT` | `3000` | listen port |
/// | `DFORM_DESCRIPTORS` | unset | JSON/YAML descriptor file; the sample form when unset |
/// | `DFORM_SKIP_HIDDEN_FIELDS` | `false` | skip validation of fields hidden by `dependsOn` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub descriptors_path: Option<PathBuf>,
    pub skip_hidden_fields: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            descriptors_path: None,
            skip_hidden_fields: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("DFORM_PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "DFORM_PORT",
                value,
            })?;
        }

        config.descriptors_path = lookup("DFORM_DESCRIPTORS")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        if let Some(value) = lookup("DFORM_SKIP_HIDDEN_FIELDS") {
            config.skip_hidden_fields = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        var: "DFORM_SKIP_HIDDEN_FIELDS",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            hidden_fields: if self.skip_hidden_fields {
                HiddenFieldPolicy::Skip
            } else {
                HiddenFieldPolicy::Validate
            },
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub descriptors: Arc<DescriptorSet>,
    pub schema: Arc<ValidationSchema>,
}

impl AppState {
    /// State serving the built-in sample form with default configuration.
    pub fn new() -> Self {
        Self::with_descriptors(AppConfig::default(), sample_form())
    }

    /// Load descriptors as configured: from `descriptors_path` when set,
    /// the sample form otherwise.
    pub fn with_config(config: AppConfig) -> Result<Self, DescriptorError> {
        let descriptors = match &config.descriptors_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading descriptors");
                DescriptorSet::load(path)?
            }
            None => sample_form(),
        };
        Ok(Self::with_descriptors(config, descriptors))
    }

    pub fn with_descriptors(config: AppConfig, descriptors: DescriptorSet) -> Self {
        let schema = build_schema_with(&descriptors, config.schema_options());
        Self {
            config,
            descriptors: Arc::new(descriptors),
            schema: Arc::new(schema),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.schema_options().hidden_fields, HiddenFieldPolicy::Validate);
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DFORM_PORT", "8081"),
            ("DFORM_DESCRIPTORS", "/etc/dform/form.yaml"),
            ("DFORM_SKIP_HIDDEN_FIELDS", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.descriptors_path, Some(PathBuf::from("/etc/dform/form.yaml")));
        assert_eq!(config.schema_options().hidden_fields, HiddenFieldPolicy::Skip);
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup(&[("DFORM_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    fn rejects_bad_bool() {
        let err = AppConfig::from_lookup(lookup(&[("DFORM_SKIP_HIDDEN_FIELDS", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn missing_descriptor_file_is_an_error() {
        let config = AppConfig {
            descriptors_path: Some(PathBuf::from("/nonexistent/form.json")),
            ..AppConfig::default()
        };
        assert!(matches!(AppState::with_config(config), Err(DescriptorError::Io { .. })));
    }

    #[test]
    fn default_state_serves_sample_form() {
        let state = AppState::new();
        assert_eq!(state.descriptors.len(), state.schema.rules().len());
        assert!(state.descriptors.get("email").is_some());
    }
}
