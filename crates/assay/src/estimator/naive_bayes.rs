//! Naive Bayes over value co-occurrence counts.
//!
//! For a cell `(row, a)` and candidate `v` the score is
//!
//! ```text
//! ln P(v) + sum over context attributes b with a non-null value w in the row:
//!           ln P(b = w | a = v)
//! ```
//!
//! with additive smoothing on every count, normalized over the queried domain.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::batch::{resolve_rows, score_all};
use super::config::{NaiveBayesConfig, validate_smoothing};
use super::counts::{
    check_schema, ln_ratio, observed, require_rows, resolve_active, resolve_context, value_counts,
};
use super::Estimator;
use crate::dataset::{Dataset, Row, Tid};
use crate::error::{AssayError, Result};
use crate::posterior::{BatchDescriptor, PosteriorResult, normalize_log_scores, validate_domain};

/// Counts learned for one target attribute.
#[derive(Debug, Clone, Default)]
struct TargetCounts {
    /// Rows holding each value of the target.
    freq: HashMap<String, usize>,
    /// `cooccur[b][v][w]`: rows where the target is `v` and `b` is `w`.
    cooccur: HashMap<String, HashMap<String, HashMap<String, usize>>>,
}

impl TargetCounts {
    fn freq(&self, value: &str) -> usize {
        self.freq.get(value).copied().unwrap_or(0)
    }

    fn cooccur(&self, context: &str, value: &str, other: &str) -> usize {
        self.cooccur
            .get(context)
            .and_then(|by_value| by_value.get(value))
            .and_then(|by_other| by_other.get(other))
            .copied()
            .unwrap_or(0)
    }
}

/// Trained state. Replaced wholesale on every successful `train`.
#[derive(Debug, Clone)]
struct NaiveBayesModel {
    n_rows: usize,
    smoothing: f64,
    /// Distinct non-null values per attribute, over targets and context.
    cardinality: HashMap<String, usize>,
    /// Conditioning attributes in schema order.
    context: Vec<String>,
    targets: IndexMap<String, TargetCounts>,
    parallel_threshold: usize,
}

impl NaiveBayesModel {
    fn fit(dataset: &dyn Dataset, config: &NaiveBayesConfig) -> Result<Self> {
        validate_smoothing(config.smoothing)?;
        let active = resolve_active(dataset, config.active_attributes.as_deref())?;
        let context = resolve_context(dataset, config.context_attributes.as_deref())?;
        let n_rows = require_rows(dataset)?;

        // Every index lookup below is for an attribute resolved from the schema
        let index_of = |attr: &String| dataset.attribute_index(attr).unwrap_or(usize::MAX);

        let mut cardinality = HashMap::new();
        for attr in active.iter().chain(&context) {
            if !cardinality.contains_key(attr) {
                cardinality.insert(attr.clone(), value_counts(dataset, index_of(attr)).len());
            }
        }

        let context_idx: Vec<(&String, usize)> =
            context.iter().map(|c| (c, index_of(c))).collect();
        let tids = dataset.tids();

        let mut targets = IndexMap::with_capacity(active.len());
        for attr in &active {
            let attr_idx = index_of(attr);
            let mut counts = TargetCounts::default();

            for &tid in &tids {
                let Some(value) = observed(dataset, tid, attr_idx) else {
                    continue;
                };
                *counts.freq.entry(value.to_string()).or_insert(0) += 1;

                for &(other_attr, other_idx) in &context_idx {
                    if other_idx == attr_idx {
                        continue;
                    }
                    let Some(other) = observed(dataset, tid, other_idx) else {
                        continue;
                    };
                    *counts
                        .cooccur
                        .entry(other_attr.clone())
                        .or_default()
                        .entry(value.to_string())
                        .or_default()
                        .entry(other.to_string())
                        .or_insert(0) += 1;
                }
            }

            debug!(
                attribute = %attr,
                distinct = counts.freq.len(),
                context = counts.cooccur.len(),
                "fit attribute counts"
            );
            targets.insert(attr.clone(), counts);
        }

        Ok(Self {
            n_rows,
            smoothing: config.smoothing,
            cardinality,
            context,
            targets,
            parallel_threshold: config.parallel_threshold,
        })
    }

    fn cardinality(&self, attr: &str) -> f64 {
        // An all-null column still spreads smoothing mass over one slot
        self.cardinality.get(attr).copied().unwrap_or(0).max(1) as f64
    }

    /// Unnormalized log score of one candidate.
    fn log_score(&self, counts: &TargetCounts, row: &Row, attr: &str, value: &str) -> f64 {
        let alpha = self.smoothing;
        let value_count = counts.freq(value) as f64;

        let mut score = ln_ratio(
            value_count + alpha,
            self.n_rows as f64 + alpha * self.cardinality(attr),
        );

        for other_attr in &self.context {
            if other_attr == attr {
                continue;
            }
            let Some(other) = row.observed(other_attr) else {
                continue;
            };
            let joint = counts.cooccur(other_attr, value, other) as f64;
            score += ln_ratio(
                joint + alpha,
                value_count + alpha * self.cardinality(other_attr),
            );
        }

        score
    }

    /// Posterior for a query whose attribute and domain were already checked.
    fn posterior(&self, row: &Row, attr: &str, values: &[String]) -> PosteriorResult {
        let scores: Vec<f64> = match self.targets.get(attr) {
            Some(counts) => values
                .iter()
                .map(|v| self.log_score(counts, row, attr, v))
                .collect(),
            None => vec![0.0; values.len()],
        };
        PosteriorResult::from_parts(values, normalize_log_scores(&scores))
    }
}

/// Estimator scoring candidates by how often they co-occur with the rest of the row.
pub struct NaiveBayesEstimator {
    dataset: Arc<dyn Dataset>,
    model: Option<NaiveBayesModel>,
}

impl NaiveBayesEstimator {
    /// Bind an untrained estimator to a dataset.
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

    /// The dataset this estimator was built for.
    pub fn dataset(&self) -> &Arc<dyn Dataset> {
        &self.dataset
    }

    /// Attributes the trained model can predict.
    pub fn trained_attributes(&self) -> Vec<&str> {
        self.model
            .as_ref()
            .map(|m| m.targets.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn model(&self) -> Result<&NaiveBayesModel> {
        self.model.as_ref().ok_or(AssayError::NotTrained)
    }

    fn check_attribute(&self, model: &NaiveBayesModel, attr: &str) -> Result<()> {
        if self.dataset.attribute_index(attr).is_none() {
            return Err(AssayError::invalid_query(format!(
                "unknown attribute '{}'",
                attr
            )));
        }
        if !model.targets.contains_key(attr) {
            return Err(AssayError::invalid_query(format!(
                "attribute '{}' was not trained",
                attr
            )));
        }
        Ok(())
    }
}

impl Estimator for NaiveBayesEstimator {
    type Config = NaiveBayesConfig;

    fn train(&mut self, config: &NaiveBayesConfig) -> Result<()> {
        let model = NaiveBayesModel::fit(self.dataset.as_ref(), config)?;
        info!(
            rows = model.n_rows,
            attributes = model.targets.len(),
            smoothing = model.smoothing,
            "naive bayes estimator trained"
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict_pp(&self, row: &Row, attr: &str, values: &[String]) -> Result<PosteriorResult> {
        let model = self.model()?;
        self.check_attribute(model, attr)?;
        validate_domain(values)?;
        Ok(model.posterior(row, attr, values))
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
            |row, attr, values| model.posterior(row, attr, values),
        ))
    }
}
