//! Label command - emit weak labels for near-certain cells.

use std::fs;
use std::path::PathBuf;

use assay::{Dataset, DomainPruner, PruningConfig};
use colored::Colorize;

use super::{attributes_or_trained, format_probability, load_and_train};
use crate::cli::EstimatorArgs;

pub fn run(
    file: PathBuf,
    attrs: Vec<String>,
    threshold: f64,
    estimator_args: EstimatorArgs,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, estimator) = load_and_train(&file, &estimator_args)?;
    let attrs = attributes_or_trained(attrs, &estimator);

    let config = PruningConfig {
        weak_label_threshold: threshold,
        ..PruningConfig::default()
    };
    let pruner = DomainPruner::new(&estimator, config)?;
    let descriptors = pruner.cell_domains(&*dataset, &attrs)?;
    let labels = pruner.weak_labels(&dataset.records(), &descriptors)?;

    if let Some(path) = output {
        fs::write(&path, serde_json::to_string_pretty(&labels)?)?;
        println!(
            "{} {} labels to {}",
            "Wrote".green(),
            labels.len().to_string().white().bold(),
            path.display().to_string().white()
        );
        return Ok(());
    }

    println!(
        "{} of {} cells labeled at threshold {}",
        labels.len().to_string().white().bold(),
        descriptors.len(),
        threshold
    );

    let changed: Vec<_> = labels.iter().filter(|l| l.changed).collect();
    if !changed.is_empty() {
        println!();
        println!("{}", "Suggested corrections:".yellow().bold());
        for label in changed {
            println!(
                "  {}[{}] {} -> {} ({})",
                label.attribute,
                label.tid,
                label.initial_value.as_deref().unwrap_or("-").red(),
                label.value.green(),
                format_probability(label.probability)
            );
        }
    }

    Ok(())
}
