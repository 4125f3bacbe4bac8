//! Validation and execution shared by every estimator's batch path.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::dataset::{Row, Tid};
use crate::error::{AssayError, Result};
use crate::posterior::{BatchDescriptor, PosteriorResult, validate_domain};

/// Default batch size from which descriptors are scored on the rayon pool.
pub(crate) const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Resolve the row of every descriptor, checking each one up front.
///
/// `check_attr` applies the estimator's own attribute rules. The error names
/// the first offending descriptor.
pub(crate) fn resolve_rows<'r>(
    records: &'r HashMap<Tid, Row>,
    descriptors: &[BatchDescriptor],
    check_attr: impl Fn(&str) -> Result<()>,
) -> Result<Vec<&'r Row>> {
    descriptors
        .iter()
        .enumerate()
        .map(|(idx, d)| {
            let row = records.get(&d.tid).ok_or_else(|| {
                AssayError::invalid_query(format!(
                    "descriptor {}: tid {} missing from supplied records",
                    idx, d.tid
                ))
            })?;
            check_attr(&d.attribute)
                .and_then(|_| validate_domain(&d.domain))
                .map_err(|e| match e {
                    AssayError::InvalidQuery(msg) => {
                        AssayError::invalid_query(format!("descriptor {}: {}", idx, msg))
                    }
                    other => other,
                })?;
            Ok(row)
        })
        .collect()
}

/// Score validated descriptors, in parallel for large batches.
///
/// Output order always equals descriptor order.
pub(crate) fn score_all<F>(
    rows: &[&Row],
    descriptors: &[BatchDescriptor],
    parallel_threshold: usize,
    score: F,
) -> Vec<PosteriorResult>
where
    F: Fn(&Row, &str, &[String]) -> PosteriorResult + Sync,
{
    let parallel = descriptors.len() >= parallel_threshold;
    debug!(cells = descriptors.len(), parallel, "scoring batch");

    if parallel {
        descriptors
            .par_iter()
            .zip(rows.par_iter())
            .map(|(d, row)| score(*row, &d.attribute, &d.domain))
            .collect()
    } else {
        descriptors
            .iter()
            .zip(rows)
            .map(|(d, row)| score(*row, &d.attribute, &d.domain))
            .collect()
    }
}
