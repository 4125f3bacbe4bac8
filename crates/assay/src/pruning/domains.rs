//! Candidate domains built from observed column values.

use indexmap::IndexMap;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{AssayError, Result};
use crate::input::DataTable;
use crate::posterior::BatchDescriptor;

/// One descriptor per `(tid, attribute)` whose column has observed values.
///
/// The domain holds the `max_domain` most frequent non-null values of the
/// column (ties in first-seen order). A cell's own non-null value is always
/// part of its domain, taking the last slot when the domain is full.
pub fn cell_domains<S: AsRef<str>>(
    dataset: &dyn Dataset,
    attributes: &[S],
    max_domain: usize,
) -> Result<Vec<BatchDescriptor>> {
    if max_domain == 0 {
        return Err(AssayError::Configuration(
            "max_domain must be at least 1".to_string(),
        ));
    }

    let tids = dataset.tids();
    let mut descriptors = Vec::with_capacity(tids.len() * attributes.len());

    for attr in attributes {
        let attr = attr.as_ref();
        let idx = dataset
            .attribute_index(attr)
            .ok_or_else(|| AssayError::invalid_query(format!("unknown attribute '{}'", attr)))?;

        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for &tid in &tids {
            if let Some(value) = dataset.value(tid, idx).filter(|v| !DataTable::is_null_value(v)) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            debug!(attribute = attr, "no observed values, skipping column");
            continue;
        }

        // Stable sort keeps first-seen order among equal counts
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top: Vec<&str> = ranked.iter().take(max_domain).map(|(v, _)| *v).collect();

        for &tid in &tids {
            let mut domain: Vec<String> = top.iter().map(|v| v.to_string()).collect();
            let current = dataset.value(tid, idx).filter(|v| !DataTable::is_null_value(v));
            if let Some(current) = current {
                if !top.contains(&current) {
                    if domain.len() >= max_domain {
                        domain.pop();
                    }
                    domain.push(current.to_string());
                }
            }
            descriptors.push(BatchDescriptor {
                tid,
                attribute: attr.to_string(),
                domain,
            });
        }
    }

    Ok(descriptors)
}
