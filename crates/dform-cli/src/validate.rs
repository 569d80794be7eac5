//! # Validate CLI — check a values file offline.
//!
//! Builds the schema from a descriptor file and validates a values file
//! against it, printing the same `{success, data}` / `{success, errors}`
//! shape the submission endpoint returns.
//!
//! ```bash
//! dform validate --descriptors form.yaml --values answers.json
//! dform validate --descriptors form.yaml --values answers.yaml --skip-hidden
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};

use dform_core::{DescriptorSet, FormValues};
use dform_schema::{build_schema_with, SchemaOptions};

/// Arguments for `dform validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Descriptor file (JSON or YAML).
    #[arg(long)]
    pub descriptors: PathBuf,

    /// Values file: a JSON or YAML mapping of field name to value.
    #[arg(long)]
    pub values: PathBuf,

    /// Do not validate fields hidden by `dependsOn`.
    #[arg(long)]
    pub skip_hidden: bool,
}

/// Validate `values` and render the outcome with its exit code
/// (0 accepted, 1 rejected).
pub fn outcome(descriptors: &DescriptorSet, values: &FormValues, options: SchemaOptions) -> (Value, u8) {
    let schema = build_schema_with(descriptors, options);
    match schema.validate(values) {
        Ok(data) => (json!({ "success": true, "data": data }), 0),
        Err(errors) => (
            json!({ "success": false, "errors": errors.messages() }),
            1,
        ),
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let descriptors = crate::load_descriptors(&args.descriptors)?;
    let values = crate::load_values(&args.values)?;
    tracing::info!(
        fields = descriptors.len(),
        values = values.len(),
        "validating form values"
    );

    let (rendered, code) = outcome(&descriptors, &values, crate::schema_options(args.skip_hidden));
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"[
        {"name": "tipo", "label": "Tipo", "type": "select", "required": true,
         "options": [{"label": "Admin", "value": "admin"}, {"label": "User", "value": "user"}]},
        {"name": "motivo", "label": "Motivo", "type": "text", "required": true,
         "dependsOn": {"field": "tipo", "value": "admin"}},
        {"name": "idade", "label": "Idade", "type": "number", "validation": {"min": 0, "max": 120}}
    ]"#;

    fn files(values: &str) -> (tempfile::TempDir, ValidateArgs) {
        let dir = tempfile::tempdir().unwrap();
        let descriptors = dir.path().join("form.json");
        let values_path = dir.path().join("values.json");
        std::fs::write(&descriptors, FORM).unwrap();
        std::fs::write(&values_path, values).unwrap();
        let args = ValidateArgs {
            descriptors,
            values: values_path,
            skip_hidden: false,
        };
        (dir, args)
    }

    #[test]
    fn accepted_values_exit_zero() {
        let (_dir, args) = files(r#"{"tipo": "admin", "motivo": "audit", "idade": "30"}"#);
        assert_eq!(run_validate(&args).unwrap(), 0);
    }

    #[test]
    fn rejected_values_exit_one() {
        let (_dir, args) = files(r#"{"tipo": "admin", "idade": 150}"#);
        assert_eq!(run_validate(&args).unwrap(), 1);
    }

    #[test]
    fn outcome_renders_endpoint_shape() {
        let descriptors = DescriptorSet::from_json_str(FORM).unwrap();
        let values: FormValues = serde_json::from_str(r#"{"tipo": "user", "idade": 150}"#).unwrap();

        let (rendered, code) = outcome(&descriptors, &values, SchemaOptions::default());
        assert_eq!(code, 1);
        assert_eq!(rendered["success"], false);
        assert!(rendered["errors"]["idade"].is_string());
        assert_eq!(rendered["errors"]["motivo"], "This field is required");
    }

    #[test]
    fn skip_hidden_exempts_conditional_field() {
        let descriptors = DescriptorSet::from_json_str(FORM).unwrap();
        let values: FormValues = serde_json::from_str(r#"{"tipo": "user", "extra": 1}"#).unwrap();

        let (rendered, code) = outcome(&descriptors, &values, SchemaOptions::skip_hidden());
        assert_eq!(code, 0);
        assert_eq!(rendered["data"], json!({"tipo": "user"}));
    }

    #[test]
    fn unreadable_values_file_is_an_error() {
        let (_dir, mut args) = files("{}");
        args.values = PathBuf::from("/nonexistent/values.json");
        assert!(run_validate(&args).is_err());
    }
}
