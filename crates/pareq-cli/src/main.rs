//! Pareq CLI - offline rendering and inspection for the pareq equalizer.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pareq")]
#[command(author, version, about = "Pareq parametric equalizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file through the equalizer
    Process(commands::process::ProcessArgs),

    /// Print the combined magnitude response
    Response(commands::response::ResponseArgs),

    /// List parameters and their ranges
    Params(commands::params::ParamsArgs),

    /// Write a parameter state file
    State(commands::state::StateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Response(args) => commands::response::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::State(args) => commands::state::run(args),
    }
}
