use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed thesis tracker CLI.
/// Storage defaults to ~/.thesis/thesis_data.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "thesis", version, about = "Thesis task, report and progress tracker")]
pub struct Cli {
    /// Path to the JSON data file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
