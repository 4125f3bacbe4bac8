//! CLI command implementations.

pub mod label;
pub mod predict;
pub mod prune;

use std::path::Path;
use std::sync::Arc;

use assay::{AnyEstimator, Estimator, EstimatorConfig, Parser, TableDataset};
use colored::Colorize;
use tracing::debug;

use crate::cli::EstimatorArgs;

/// Load a data file and train the estimator the arguments select.
///
/// A config file decides the strategy; `--estimator` must agree with it when both are given.
pub(crate) fn load_and_train(
    file: &Path,
    args: &EstimatorArgs,
) -> Result<(Arc<TableDataset>, AnyEstimator), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = match (&args.config, args.estimator) {
        (Some(path), kind) => {
            let config = EstimatorConfig::load(path)?;
            if let Some(kind) = kind {
                if kind != config.kind() {
                    return Err(format!(
                        "--estimator {} conflicts with {} configuration in {}",
                        kind,
                        config.kind(),
                        path.display()
                    )
                    .into());
                }
            }
            config
        }
        (None, kind) => EstimatorConfig::default_for(kind.unwrap_or_default()),
    };

    let (table, source) = Parser::new().parse_file(file)?;
    debug!(
        file = %source.file,
        rows = source.row_count,
        columns = source.column_count,
        hash = %source.hash,
        "loaded data file"
    );
    let dataset = Arc::new(TableDataset::new(table)?);

    let mut estimator = AnyEstimator::new(config.kind(), dataset.clone())?;
    estimator.train(&config)?;

    eprintln!(
        "{} {} estimator on {} rows",
        "Trained".cyan().bold(),
        config.kind().to_string().white(),
        source.row_count.to_string().white().bold()
    );

    Ok((dataset, estimator))
}

/// The requested attributes, or every attribute the estimator was trained on.
pub(crate) fn attributes_or_trained(
    requested: Vec<String>,
    estimator: &AnyEstimator,
) -> Vec<String> {
    if requested.is_empty() {
        estimator
            .trained_attributes()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        requested
    }
}

/// Color a probability by how confident it is.
pub(crate) fn format_probability(p: f64) -> colored::ColoredString {
    let text = format!("{:.4}", p);
    if p >= 0.9 {
        text.green()
    } else if p >= 0.5 {
        text.yellow()
    } else {
        text.normal()
    }
}
