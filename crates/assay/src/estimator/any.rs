//! Runtime selection between estimator strategies.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::config::EstimatorConfig;
use super::frequency::FrequencyEstimator;
use super::naive_bayes::NaiveBayesEstimator;
use super::Estimator;
use crate::dataset::{Dataset, Row, Tid};
use crate::error::{AssayError, Result};
use crate::posterior::{BatchDescriptor, PosteriorResult};

/// Available inference strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Co-occurrence statistics conditioned on the rest of the row.
    #[default]
    NaiveBayes,
    /// Empirical value frequencies, ignoring the row.
    Frequency,
}

impl FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "naive_bayes" | "nb" => Ok(EstimatorKind::NaiveBayes),
            "frequency" | "freq" => Ok(EstimatorKind::Frequency),
            _ => Err(format!(
                "Unknown estimator: {}. Use naive-bayes or frequency.",
                s
            )),
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorKind::NaiveBayes => write!(f, "naive-bayes"),
            EstimatorKind::Frequency => write!(f, "frequency"),
        }
    }
}

/// An estimator of any strategy, chosen when it is built.
pub enum AnyEstimator {
    NaiveBayes(NaiveBayesEstimator),
    Frequency(FrequencyEstimator),
}

impl AnyEstimator {
    /// Bind an untrained estimator of the given strategy to a dataset.
    pub fn new(kind: EstimatorKind, dataset: Arc<dyn Dataset>) -> Result<Self> {
        Ok(match kind {
            EstimatorKind::NaiveBayes => AnyEstimator::NaiveBayes(NaiveBayesEstimator::new(dataset)?),
            EstimatorKind::Frequency => AnyEstimator::Frequency(FrequencyEstimator::new(dataset)?),
        })
    }

    pub fn kind(&self) -> EstimatorKind {
        match self {
            AnyEstimator::NaiveBayes(_) => EstimatorKind::NaiveBayes,
            AnyEstimator::Frequency(_) => EstimatorKind::Frequency,
        }
    }

    pub fn is_trained(&self) -> bool {
        match self {
            AnyEstimator::NaiveBayes(e) => e.is_trained(),
            AnyEstimator::Frequency(e) => e.is_trained(),
        }
    }

    pub fn dataset(&self) -> &Arc<dyn Dataset> {
        match self {
            AnyEstimator::NaiveBayes(e) => e.dataset(),
            AnyEstimator::Frequency(e) => e.dataset(),
        }
    }

    /// Attributes the current model can answer for, in training order.
    pub fn trained_attributes(&self) -> Vec<&str> {
        match self {
            AnyEstimator::NaiveBayes(e) => e.trained_attributes(),
            AnyEstimator::Frequency(e) => e.trained_attributes(),
        }
    }
}

impl Estimator for AnyEstimator {
    type Config = EstimatorConfig;

    fn train(&mut self, config: &EstimatorConfig) -> Result<()> {
        match (self, config) {
            (AnyEstimator::NaiveBayes(e), EstimatorConfig::NaiveBayes(c)) => e.train(c),
            (AnyEstimator::Frequency(e), EstimatorConfig::Frequency(c)) => e.train(c),
            (estimator, config) => Err(AssayError::Configuration(format!(
                "{} configuration given to a {} estimator",
                config.kind(),
                estimator.kind()
            ))),
        }
    }

    fn predict_pp(&self, row: &Row, attr: &str, values: &[String]) -> Result<PosteriorResult> {
        match self {
            AnyEstimator::NaiveBayes(e) => e.predict_pp(row, attr, values),
            AnyEstimator::Frequency(e) => e.predict_pp(row, attr, values),
        }
    }

    fn predict_pp_batch(
        &self,
        records: &HashMap<Tid, Row>,
        descriptors: &[BatchDescriptor],
    ) -> Result<Vec<PosteriorResult>> {
        match self {
            AnyEstimator::NaiveBayes(e) => e.predict_pp_batch(records, descriptors),
            AnyEstimator::Frequency(e) => e.predict_pp_batch(records, descriptors),
        }
    }
}
