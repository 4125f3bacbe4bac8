//! Schema checks and value counting shared by the count-based estimators.

use std::collections::{HashMap, HashSet};

use crate::dataset::Dataset;
use crate::error::{AssayError, Result};
use crate::input::DataTable;

/// Reject datasets whose schema cannot identify cells.
pub(crate) fn check_schema(dataset: &dyn Dataset) -> Result<()> {
    let attrs = dataset.attributes();
    if attrs.is_empty() {
        return Err(AssayError::Configuration(
            "dataset exposes no attributes".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(attrs.len());
    for attr in attrs {
        if !seen.insert(attr.as_str()) {
            return Err(AssayError::Configuration(format!(
                "duplicate attribute '{}'",
                attr
            )));
        }
    }
    Ok(())
}

/// Attributes to fit: the dataset's active set, optionally narrowed.
///
/// Names outside the schema or the active set are configuration errors; an
/// empty result is a training error.
pub(crate) fn resolve_active(
    dataset: &dyn Dataset,
    requested: Option<&[String]>,
) -> Result<Vec<String>> {
    let available: Vec<String> = dataset
        .active_attributes()
        .into_iter()
        .filter(|a| dataset.attribute_index(a).is_some())
        .collect();

    let active = match requested {
        None => available,
        Some(requested) => {
            let mut active: Vec<String> = Vec::with_capacity(requested.len());
            for attr in requested {
                if dataset.attribute_index(attr).is_none() {
                    return Err(AssayError::Configuration(format!(
                        "unknown attribute '{}' in active_attributes",
                        attr
                    )));
                }
                if !available.contains(attr) {
                    return Err(AssayError::Configuration(format!(
                        "attribute '{}' carries no training signal in this dataset",
                        attr
                    )));
                }
                if !active.contains(attr) {
                    active.push(attr.clone());
                }
            }
            active
        }
    };

    if active.is_empty() {
        return Err(AssayError::Training(
            "dataset has no active attributes".to_string(),
        ));
    }
    Ok(active)
}

/// Attributes usable as conditioning context, in schema order.
pub(crate) fn resolve_context(
    dataset: &dyn Dataset,
    requested: Option<&[String]>,
) -> Result<Vec<String>> {
    match requested {
        None => Ok(dataset.attributes().to_vec()),
        Some(requested) => {
            if let Some(unknown) = requested.iter().find(|a| dataset.attribute_index(a).is_none()) {
                return Err(AssayError::Configuration(format!(
                    "unknown attribute '{}' in context_attributes",
                    unknown
                )));
            }
            Ok(dataset
                .attributes()
                .iter()
                .filter(|a| requested.contains(a))
                .cloned()
                .collect())
        }
    }
}

/// Fail when there are no rows to learn from.
pub(crate) fn require_rows(dataset: &dyn Dataset) -> Result<usize> {
    match dataset.row_count() {
        0 => Err(AssayError::Training("dataset has no rows".to_string())),
        n => Ok(n),
    }
}

/// Non-null value of a cell.
pub(crate) fn observed(dataset: &dyn Dataset, tid: usize, attr_index: usize) -> Option<&str> {
    dataset
        .value(tid, attr_index)
        .filter(|v| !DataTable::is_null_value(v))
}

/// Count non-null values of one attribute.
pub(crate) fn value_counts(dataset: &dyn Dataset, attr_index: usize) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for tid in dataset.tids() {
        if let Some(value) = observed(dataset, tid, attr_index) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// `ln(numerator / denominator)`, or `-inf` when either side has no mass.
pub(crate) fn ln_ratio(numerator: f64, denominator: f64) -> f64 {
    if numerator <= 0.0 || denominator <= 0.0 {
        f64::NEG_INFINITY
    } else {
        numerator.ln() - denominator.ln()
    }
}
