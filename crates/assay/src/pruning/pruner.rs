//! Pruning candidate domains and emitting weak labels from posteriors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domains::cell_domains;
use crate::dataset::{Dataset, Row, Tid};
use crate::error::{AssayError, Result};
use crate::estimator::Estimator;
use crate::posterior::{BatchDescriptor, PosteriorResult};

/// Thresholds for pruning and labeling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PruningConfig {
    /// Minimum posterior for a value to stay in a cell's domain.
    pub prune_threshold: f64,
    /// Minimum top posterior for a cell to receive a weak label.
    pub weak_label_threshold: f64,
    /// Largest domain generated or kept per cell.
    pub max_domain: usize,
    /// Keep a cell's current value in its pruned domain regardless of its posterior.
    pub keep_initial_value: bool,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            prune_threshold: 0.1,
            weak_label_threshold: 0.99,
            max_domain: 50,
            keep_initial_value: true,
        }
    }
}

impl PruningConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("prune_threshold", self.prune_threshold),
            ("weak_label_threshold", self.weak_label_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AssayError::Configuration(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.max_domain == 0 {
            return Err(AssayError::Configuration(
                "max_domain must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The surviving candidates of one cell, most probable first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrunedDomain {
    pub tid: Tid,
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    pub values: Vec<(String, f64)>,
}

impl PrunedDomain {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|(v, _)| v == value)
    }
}

/// A confident value assignment for a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakLabel {
    pub tid: Tid,
    pub attribute: String,
    pub value: String,
    pub probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    /// Whether the label differs from the cell's current value.
    pub changed: bool,
}

/// Everything one pruning pass over a dataset produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruningReport {
    pub cells: usize,
    pub candidates_before: usize,
    pub candidates_after: usize,
    pub domains: Vec<PrunedDomain>,
    pub weak_labels: Vec<WeakLabel>,
}

/// Consumer of a trained estimator that prunes domains and labels cells.
pub struct DomainPruner<'a, E: Estimator + ?Sized> {
    estimator: &'a E,
    config: PruningConfig,
}

impl<'a, E: Estimator + ?Sized> DomainPruner<'a, E> {
    pub fn new(estimator: &'a E, config: PruningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { estimator, config })
    }

    pub fn config(&self) -> &PruningConfig {
        &self.config
    }

    /// Candidate domains for every cell of `attributes`, capped at `max_domain`.
    pub fn cell_domains<S: AsRef<str>>(
        &self,
        dataset: &dyn Dataset,
        attributes: &[S],
    ) -> Result<Vec<BatchDescriptor>> {
        cell_domains(dataset, attributes, self.config.max_domain)
    }

    /// Keep the plausible values of each descriptor's domain.
    pub fn prune(
        &self,
        records: &HashMap<Tid, Row>,
        descriptors: &[BatchDescriptor],
    ) -> Result<Vec<PrunedDomain>> {
        let posteriors = self.estimator.predict_pp_batch(records, descriptors)?;
        Ok(descriptors
            .iter()
            .zip(&posteriors)
            .map(|(d, posterior)| self.prune_one(records, d, posterior))
            .collect())
    }

    /// Label the cells whose most probable value clears `weak_label_threshold`.
    pub fn weak_labels(
        &self,
        records: &HashMap<Tid, Row>,
        descriptors: &[BatchDescriptor],
    ) -> Result<Vec<WeakLabel>> {
        let posteriors = self.estimator.predict_pp_batch(records, descriptors)?;
        Ok(descriptors
            .iter()
            .zip(&posteriors)
            .filter_map(|(d, posterior)| self.label_one(records, d, posterior))
            .collect())
    }

    /// Build domains for `attributes`, then prune and label them in one batch.
    pub fn run<S: AsRef<str>>(&self, dataset: &dyn Dataset, attributes: &[S]) -> Result<PruningReport> {
        let records = dataset.records();
        let descriptors = self.cell_domains(dataset, attributes)?;
        let posteriors = self.estimator.predict_pp_batch(&records, &descriptors)?;

        let mut report = PruningReport {
            cells: descriptors.len(),
            ..PruningReport::default()
        };
        for (d, posterior) in descriptors.iter().zip(&posteriors) {
            let pruned = self.prune_one(&records, d, posterior);
            report.candidates_before += d.domain.len();
            report.candidates_after += pruned.values.len();
            report.domains.push(pruned);

            if let Some(label) = self.label_one(&records, d, posterior) {
                report.weak_labels.push(label);
            }
        }

        info!(
            cells = report.cells,
            before = report.candidates_before,
            after = report.candidates_after,
            labels = report.weak_labels.len(),
            "pruned cell domains"
        );
        Ok(report)
    }

    fn prune_one(
        &self,
        records: &HashMap<Tid, Row>,
        descriptor: &BatchDescriptor,
        posterior: &PosteriorResult,
    ) -> PrunedDomain {
        let initial = initial_value(records, descriptor);

        let mut ranked: Vec<(String, f64)> = posterior.entries().to_vec();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut values: Vec<(String, f64)> = ranked
            .iter()
            .filter(|(_, p)| *p >= self.config.prune_threshold)
            .take(self.config.max_domain)
            .cloned()
            .collect();

        if values.is_empty() {
            values.extend(ranked.first().cloned());
        }

        if self.config.keep_initial_value {
            if let Some(init) = initial.as_deref() {
                let kept = values.iter().any(|(v, _)| v == init);
                if !kept {
                    if let Some(p) = posterior.probability(init) {
                        // The initial value takes the last slot so the domain stays within max_domain
                        if values.len() >= self.config.max_domain {
                            values.pop();
                        }
                        values.push((init.to_string(), p));
                    }
                }
            }
        }

        debug!(
            tid = descriptor.tid,
            attribute = %descriptor.attribute,
            before = descriptor.domain.len(),
            after = values.len(),
            "pruned domain"
        );

        PrunedDomain {
            tid: descriptor.tid,
            attribute: descriptor.attribute.clone(),
            initial_value: initial,
            values,
        }
    }

    fn label_one(
        &self,
        records: &HashMap<Tid, Row>,
        descriptor: &BatchDescriptor,
        posterior: &PosteriorResult,
    ) -> Option<WeakLabel> {
        let (value, probability) = posterior.argmax()?;
        if probability < self.config.weak_label_threshold {
            return None;
        }

        let initial = initial_value(records, descriptor);
        Some(WeakLabel {
            tid: descriptor.tid,
            attribute: descriptor.attribute.clone(),
            value: value.to_string(),
            probability,
            changed: initial.as_deref() != Some(value),
            initial_value: initial,
        })
    }
}

fn initial_value(records: &HashMap<Tid, Row>, descriptor: &BatchDescriptor) -> Option<String> {
    records
        .get(&descriptor.tid)
        .and_then(|row| row.observed(&descriptor.attribute))
        .map(str::to_string)
}
