//! # Fetch CLI — pull descriptors from a running service.
//!
//! ```bash
//! dform fetch --url http://localhost:3000
//! dform fetch --url https://forms.example.com/signup --out form.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dform_client::{ClientConfig, DescriptorClient};

/// Arguments for `dform fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Base URL of the service.
    #[arg(long)]
    pub url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Write the descriptor list to this file instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the fetch subcommand.
pub fn run_fetch(args: &FetchArgs) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let client = DescriptorClient::new(ClientConfig {
        base_url: args.url.clone(),
        timeout_secs: args.timeout_secs,
    })?;
    let descriptors = runtime.block_on(client.fetch_descriptors())?;

    for issue in descriptors.issues() {
        tracing::warn!(%issue, "fetched descriptor list was repaired");
    }

    let rendered = serde_json::to_string_pretty(&descriptors)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write descriptors: {}", path.display()))?;
            println!("Fetched {} fields into {}", descriptors.len(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(0)
}
