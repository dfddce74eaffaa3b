//! Command-line definition for the `specfold` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "specfold",
    version,
    about = "Merge published OpenAPI fragments into one normalized document"
)]
pub struct Cli {
    /// Log debug output when RUST_LOG is unset (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge fragments and write the artifacts
    Merge {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory (overrides `output_dir`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Merged document title (overrides `title`)
        #[arg(long)]
        title: Option<String>,

        /// Also write the raw fragment dump
        #[arg(long)]
        save_raw: bool,
    },

    /// Merge fragments without writing, and print a summary
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
pub struct InputArgs {
    /// Raw dump file or directory of spec JSON files
    #[arg(short, long, default_value = "data/SaaS_raw_data.json")]
    pub input: PathBuf,

    /// Config file (default: ./specfold.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
