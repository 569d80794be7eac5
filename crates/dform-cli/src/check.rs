//! # Check CLI — inspect a descriptor file.
//!
//! Loads a descriptor file, prints one line per field, and lists the
//! repairs applied on load (duplicate names, broken `dependsOn` links,
//! undecodable entries).
//!
//! ```bash
//! dform check form.yaml
//! dform check form.json --strict   # exit 1 if anything was repaired
//! dform check form.json --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dform_core::DescriptorSet;

/// Arguments for `dform check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Descriptor file (JSON, or YAML by `.yaml`/`.yml` extension).
    pub descriptors: PathBuf,

    /// Exit non-zero if the list needed any repair.
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Summary of a loaded descriptor list.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub fields: Vec<FieldSummary>,
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
}

impl CheckReport {
    pub fn from_set(set: &DescriptorSet) -> Self {
        let fields = set
            .iter()
            .map(|f| FieldSummary {
                name: f.name.clone(),
                field_type: f.field_type.to_string(),
                required: f.required,
                depends_on: f
                    .depends_on
                    .as_ref()
                    .map(|d| format!("{} = {}", d.field, d.value)),
            })
            .collect();
        let issues = set.issues().iter().map(ToString::to_string).collect();
        Self { fields, issues }
    }

    /// Exit code: 1 under `strict` when anything was repaired.
    pub fn exit_code(&self, strict: bool) -> u8 {
        if strict && !self.issues.is_empty() {
            1
        } else {
            0
        }
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let set = crate::load_descriptors(&args.descriptors)?;
    let report = CheckReport::from_set(&set);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report.exit_code(args.strict))
}

fn print_report(report: &CheckReport) {
    for field in &report.fields {
        let required = if field.required { "required" } else { "optional" };
        match &field.depends_on {
            Some(condition) => println!(
                "  {:<20} {:<10} {:<9} when {condition}",
                field.name, field.field_type, required
            ),
            None => println!("  {:<20} {:<10} {required}", field.name, field.field_type),
        }
    }
    println!();
    if report.issues.is_empty() {
        println!("OK: {} fields, no repairs", report.fields.len());
    } else {
        println!("Repaired {} issue(s):", report.issues.len());
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
}
