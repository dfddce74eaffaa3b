//! specfold CLI: the `specfold` command.

mod cli;

use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Commands, InputArgs};
use specfold::{Config, PipelineOutput, pipeline, source};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            input,
            output,
            title,
            save_raw,
        } => merge(&input, output, title, save_raw),
        Commands::Check { input } => check(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Filter used when `RUST_LOG` is unset.
fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "specfold=info,specfold_openapi=info",
        1 => "specfold=debug,specfold_openapi=debug",
        _ => "specfold=trace,specfold_openapi=trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn load(input: &InputArgs, config: &Config) -> specfold::Result<PipelineOutput> {
    let source = source::open(&input.input)?;
    tracing::info!("loading fragments from {}", source.describe());
    pipeline::run(source.load()?, config)
}

fn merge(
    input: &InputArgs,
    output_dir: Option<PathBuf>,
    title: Option<String>,
    save_raw: bool,
) -> specfold::Result<()> {
    let mut config = Config::discover(input.config.as_deref())?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(title) = title {
        config.title = title;
    }
    config.save_raw_data |= save_raw;

    let output = load(input, &config)?;
    pipeline::write_outputs(&output, &config)?;
    Ok(())
}

fn check(input: &InputArgs) -> specfold::Result<()> {
    let config = Config::discover(input.config.as_deref())?;
    let output = load(input, &config)?;

    println!("fragments: {}", output.fragments.len());
    println!("paths: {}", output.merged.document.paths.len());
    println!("repaired operations: {}", output.repaired_operations);
    for (category, count) in output.component_counts() {
        println!("components.{category}: {count}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_default_level() {
        assert_eq!(default_directives(0), "specfold=info,specfold_openapi=info");
        assert_eq!(default_directives(1), "specfold=debug,specfold_openapi=debug");
        assert_eq!(default_directives(4), "specfold=trace,specfold_openapi=trace");
    }

    #[test]
    fn test_default_directives_parse() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }
}
