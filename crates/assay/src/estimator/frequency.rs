//! Context-free estimator: the smoothed empirical distribution of each attribute.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use super::Estimator;
use super::batch::{resolve_rows, score_all};
use super::config::{FrequencyConfig, validate_smoothing};
use super::counts::{check_schema, require_rows, resolve_active, value_counts};
use crate::dataset::{Dataset, Row, Tid};
use crate::error::{AssayError, Result};
use crate::posterior::{BatchDescriptor, PosteriorResult, validate_domain};

#[derive(Debug, Clone)]
struct FrequencyModel {
    n_rows: usize,
    smoothing: f64,
    freq: IndexMap<String, HashMap<String, usize>>,
    parallel_threshold: usize,
}

impl FrequencyModel {
    fn fit(dataset: &dyn Dataset, config: &FrequencyConfig) -> Result<Self> {
        validate_smoothing(config.smoothing)?;
        let active = resolve_active(dataset, config.active_attributes.as_deref())?;
        let n_rows = require_rows(dataset)?;

        let freq = active
            .into_iter()
            .map(|attr| {
                let idx = dataset.attribute_index(&attr).unwrap_or(usize::MAX);
                let counts = value_counts(dataset, idx);
                (attr, counts)
            })
            .collect();

        Ok(Self {
            n_rows,
            smoothing: config.smoothing,
            freq,
            parallel_threshold: config.parallel_threshold,
        })
    }

    fn posterior(&self, attr: &str, values: &[String]) -> PosteriorResult {
        let counts = self.freq.get(attr);
        let weights: Vec<f64> = values
            .iter()
            .map(|v| {
                let count = counts.and_then(|c| c.get(v)).copied().unwrap_or(0);
                count as f64 + self.smoothing
            })
            .collect();

        let total: f64 = weights.iter().sum();
        let probabilities = if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            vec![1.0 / values.len() as f64; values.len()]
        };
        PosteriorResult::from_parts(values, probabilities)
    }
}

/// Estimator that ignores the row and scores values by how common they are.
///
/// Useful as a baseline and as a prior when no attribute correlates with the target.
pub struct FrequencyEstimator {
    dataset: Arc<dyn Dataset>,
    model: Option<FrequencyModel>,
}

impl FrequencyEstimator {
    pub fn new(dataset: Arc<dyn Dataset>) -> Result<Self> {
        check_schema(dataset.as_ref())?;
        Ok(Self {
            dataset,
            model: None,
        })
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn dataset(&self) -> &Arc<dyn Dataset> {
        &self.dataset
    }

    /// Attributes the current model can answer for, empty before training.
    pub fn trained_attributes(&self) -> Vec<&str> {
        self.model
            .as_ref()
            .map(|m| m.freq.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn model(&self) -> Result<&FrequencyModel> {
        self.model.as_ref().ok_or(AssayError::NotTrained)
    }

    fn check_attribute(&self, model: &FrequencyModel, attr: &str) -> Result<()> {
        if self.dataset.attribute_index(attr).is_none() {
            return Err(AssayError::invalid_query(format!(
                "unknown attribute '{}'",
                attr
            )));
        }
        if !model.freq.contains_key(attr) {
            return Err(AssayError::invalid_query(format!(
                "attribute '{}' was not trained",
                attr
            )));
        }
        Ok(())
    }
}

impl Estimator for FrequencyEstimator {
    type Config = FrequencyConfig;

    fn train(&mut self, config: &FrequencyConfig) -> Result<()> {
        let model = FrequencyModel::fit(self.dataset.as_ref(), config)?;
        info!(
            rows = model.n_rows,
            attributes = model.freq.len(),
            "frequency estimator trained"
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict_pp(&self, _row: &Row, attr: &str, values: &[String]) -> Result<PosteriorResult> {
        let model = self.model()?;
        self.check_attribute(model, attr)?;
        validate_domain(values)?;
        Ok(model.posterior(attr, values))
    }

    fn predict_pp_batch(
        &self,
        records: &HashMap<Tid, Row>,
        descriptors: &[BatchDescriptor],
    ) -> Result<Vec<PosteriorResult>> {
        let model = self.model()?;
        let rows = resolve_rows(records, descriptors, |attr| self.check_attribute(model, attr))?;
        Ok(score_all(
            &rows,
            descriptors,
            model.parallel_threshold,
            |_, attr, values| model.posterior(attr, values),
        ))
    }
}
