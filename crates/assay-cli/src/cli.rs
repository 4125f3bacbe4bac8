//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use assay::EstimatorKind;

/// Assay: posterior estimation for candidate cell values
#[derive(Parser)]
#[command(name = "assay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command that trains an estimator.
#[derive(clap::Args, Clone, Debug)]
pub struct EstimatorArgs {
    /// Estimator configuration file (JSON, tagged by "estimator")
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Estimator strategy (naive-bayes, frequency)
    #[arg(short, long)]
    pub estimator: Option<EstimatorKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score candidate values for one cell
    Predict {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Attribute of the cell to score
        #[arg(short, long)]
        attr: String,

        /// Row identifier of the cell (0-based)
        #[arg(short, long)]
        tid: usize,

        /// Candidate values, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<String>,

        #[command(flatten)]
        estimator: EstimatorArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate and prune candidate domains for every cell
    Prune {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Attributes to prune, comma-separated (default: all)
        #[arg(long, value_delimiter = ',')]
        attrs: Vec<String>,

        /// Minimum posterior for a value to stay in a domain
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        /// Largest domain generated per cell
        #[arg(long, default_value = "50")]
        max_domain: usize,

        #[command(flatten)]
        estimator: EstimatorArgs,

        /// Output path for the pruning report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Label cells whose most probable value is near certain
    Label {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Attributes to label, comma-separated (default: all)
        #[arg(long, value_delimiter = ',')]
        attrs: Vec<String>,

        /// Minimum top posterior for a weak label
        #[arg(long, default_value = "0.99")]
        threshold: f64,

        #[command(flatten)]
        estimator: EstimatorArgs,

        /// Output path for the labels (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
