//! Query and result types shared by every estimator.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Tid;
use crate::error::{AssayError, Result};

/// A single cell: one attribute of one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub tid: Tid,
    pub attribute: String,
}

impl Cell {
    pub fn new(tid: Tid, attribute: impl Into<String>) -> Self {
        Self {
            tid,
            attribute: attribute.into(),
        }
    }
}

/// One cell of a batched query together with its candidate domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDescriptor {
    pub tid: Tid,
    pub attribute: String,
    pub domain: Vec<String>,
}

impl BatchDescriptor {
    pub fn new<S: Into<String>>(
        tid: Tid,
        attribute: impl Into<String>,
        domain: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            tid,
            attribute: attribute.into(),
            domain: domain.into_iter().map(Into::into).collect(),
        }
    }

    /// The cell this descriptor queries.
    pub fn cell(&self) -> Cell {
        Cell::new(self.tid, self.attribute.clone())
    }
}

/// Check that a candidate domain is non-empty and duplicate-free.
pub fn validate_domain(values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(AssayError::invalid_query("candidate domain is empty"));
    }

    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        if !seen.insert(value.as_str()) {
            return Err(AssayError::invalid_query(format!(
                "candidate domain repeats value '{}'",
                value
            )));
        }
    }

    Ok(())
}

/// Posterior probabilities over a domain, aligned with the queried values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorResult {
    entries: Vec<(String, f64)>,
}

impl PosteriorResult {
    /// Build a result for a custom estimator.
    ///
    /// `probabilities[i]` belongs to `values[i]`; both must have the same
    /// length and no probability may be NaN. Probabilities are clamped into
    /// [0, 1].
    pub fn new(values: &[String], probabilities: Vec<f64>) -> Result<Self> {
        if values.len() != probabilities.len() {
            return Err(AssayError::invalid_query(format!(
                "{} values but {} probabilities",
                values.len(),
                probabilities.len()
            )));
        }
        if let Some(idx) = probabilities.iter().position(|p| p.is_nan()) {
            return Err(AssayError::invalid_query(format!(
                "probability for '{}' is NaN",
                values[idx]
            )));
        }
        Ok(Self::from_parts(values, probabilities))
    }

    /// Pair each value with its probability, in the given order.
    ///
    /// Probabilities are clamped into [0, 1].
    pub(crate) fn from_parts(values: &[String], probabilities: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), probabilities.len());
        let entries = values
            .iter()
            .cloned()
            .zip(probabilities.into_iter().map(|p| p.clamp(0.0, 1.0)))
            .collect();
        Self { entries }
    }

    /// `(value, probability)` pairs in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(v, p)| (v.as_str(), *p))
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(v, _)| v.as_str())
    }

    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, p)| *p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probability of a value, if it was part of the queried domain.
    pub fn probability(&self, value: &str) -> Option<f64> {
        self.entries.iter().find(|(v, _)| v == value).map(|(_, p)| *p)
    }

    /// Most probable value. Ties go to the value queried first.
    pub fn argmax(&self) -> Option<(&str, f64)> {
        self.iter()
            .fold(None, |best: Option<(&str, f64)>, (v, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((v, p)),
            })
    }

    /// Same values in the same order with probabilities within `tolerance`.
    pub fn approx_eq(&self, other: &PosteriorResult, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((va, pa), (vb, pb))| va == vb && (pa - pb).abs() <= tolerance)
    }

    pub fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }
}
