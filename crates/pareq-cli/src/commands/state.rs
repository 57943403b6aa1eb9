//! State file writer.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use super::common::{build_store, parse_key_val};

#[derive(Args)]
pub struct StateArgs {
    /// Equalizer parameters (e.g., "peak_freq=2500")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Existing state file to start from
    #[arg(long)]
    from: Option<PathBuf>,

    /// Where to write the state blob
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: StateArgs) -> anyhow::Result<()> {
    let store = build_store(&args.param, args.from.as_deref())?;
    let blob = store.save_state()?;
    std::fs::write(&args.output, &blob)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(path = %args.output.display(), bytes = blob.len(), "state written");
    println!("Wrote {}", args.output.display());
    Ok(())
}
