//! # JSON Schema CLI — export the derived schema.
//!
//! ```bash
//! dform json-schema form.yaml > form.schema.json
//! dform json-schema form.yaml --skip-hidden
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dform_schema::build_schema_with;

/// Arguments for `dform json-schema`.
#[derive(Args, Debug)]
pub struct JsonSchemaArgs {
    /// Descriptor file (JSON or YAML).
    pub descriptors: PathBuf,

    /// Make fields hidden by `dependsOn` conditional in the exported schema.
    #[arg(long)]
    pub skip_hidden: bool,

    /// Write to this file instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the json-schema subcommand.
pub fn run_json_schema(args: &JsonSchemaArgs) -> Result<u8> {
    let descriptors = crate::load_descriptors(&args.descriptors)?;
    let schema = build_schema_with(&descriptors, crate::schema_options(args.skip_hidden));
    let rendered = serde_json::to_string_pretty(&schema.to_json_schema())?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write schema: {}", path.display()))?;
            tracing::info!(path = %path.display(), "JSON Schema written");
        }
        None => println!("{rendered}"),
    }
    Ok(0)
}
