//! Assay CLI - posterior estimation for data cleaning.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Predict {
            file,
            attr,
            tid,
            values,
            estimator,
            json,
        } => commands::predict::run(file, attr, tid, values, estimator, json),

        Commands::Prune {
            file,
            attrs,
            threshold,
            max_domain,
            estimator,
            output,
        } => commands::prune::run(
            file,
            attrs,
            threshold,
            max_domain,
            estimator,
            output,
            cli.verbose,
        ),

        Commands::Label {
            file,
            attrs,
            threshold,
            estimator,
            output,
        } => commands::label::run(file, attrs, threshold, estimator, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
