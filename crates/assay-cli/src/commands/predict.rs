//! Predict command - score candidate values for a single cell.

use std::path::PathBuf;

use assay::{Dataset, Estimator};
use colored::Colorize;

use super::{format_probability, load_and_train};
use crate::cli::EstimatorArgs;

pub fn run(
    file: PathBuf,
    attr: String,
    tid: usize,
    values: Vec<String>,
    estimator_args: EstimatorArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, estimator) = load_and_train(&file, &estimator_args)?;

    let row = dataset.row(tid).ok_or_else(|| {
        format!(
            "Row {} out of range ({} rows in {})",
            tid,
            dataset.row_count(),
            file.display()
        )
    })?;

    let posterior = estimator.predict_pp(&row, &attr, &values)?;

    if json_output {
        let output = serde_json::json!({
            "tid": tid,
            "attribute": attr,
            "current": row.get(&attr),
            "posterior": posterior,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}[{}] = {}",
        "Cell".cyan().bold(),
        attr.white(),
        tid,
        row.get(&attr).unwrap_or("").white().bold()
    );
    println!();

    let best = posterior.argmax().map(|(v, _)| v.to_string());
    for (value, p) in posterior.iter() {
        let marker = if best.as_deref() == Some(value) { "*" } else { " " };
        println!("  {} {:20} {}", marker.green().bold(), value, format_probability(p));
    }

    Ok(())
}
