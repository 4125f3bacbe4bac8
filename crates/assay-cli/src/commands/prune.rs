//! Prune command - shrink candidate domains using posteriors.

use std::fs;
use std::path::PathBuf;

use assay::{DomainPruner, PruningConfig};
use colored::Colorize;

use super::{attributes_or_trained, format_probability, load_and_train};
use crate::cli::EstimatorArgs;

pub fn run(
    file: PathBuf,
    attrs: Vec<String>,
    threshold: f64,
    max_domain: usize,
    estimator_args: EstimatorArgs,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, estimator) = load_and_train(&file, &estimator_args)?;
    let attrs = attributes_or_trained(attrs, &estimator);

    let config = PruningConfig {
        prune_threshold: threshold,
        max_domain,
        ..PruningConfig::default()
    };
    let pruner = DomainPruner::new(&estimator, config)?;
    let report = pruner.run(&*dataset, &attrs)?;

    let reduction = if report.candidates_before > 0 {
        100.0 * (1.0 - report.candidates_after as f64 / report.candidates_before as f64)
    } else {
        0.0
    };
    println!(
        "Pruned {} cells: {} candidates down to {} ({:.1}% fewer)",
        report.cells.to_string().white().bold(),
        report.candidates_before,
        report.candidates_after.to_string().green(),
        reduction
    );
    println!(
        "Weak labels: {} ({} differ from current value)",
        report.weak_labels.len().to_string().white().bold(),
        report
            .weak_labels
            .iter()
            .filter(|l| l.changed)
            .count()
            .to_string()
            .yellow()
    );

    if verbose {
        println!();
        println!("{}", "Ambiguous cells:".yellow().bold());
        for domain in report.domains.iter().filter(|d| d.values.len() > 1) {
            let values: Vec<String> = domain
                .values
                .iter()
                .map(|(v, p)| format!("{}={}", v, format_probability(*p)))
                .collect();
            println!(
                "  {}[{}] {:>12}  {}",
                domain.attribute,
                domain.tid,
                domain.initial_value.as_deref().unwrap_or("-"),
                values.join(", ")
            );
        }
    }

    if let Some(path) = output {
        fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        println!(
            "{} {}",
            "Report written to".green(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
