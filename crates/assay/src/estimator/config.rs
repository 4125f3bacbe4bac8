//! Training options for each estimator.
//!
//! Options are explicit structs rather than open keyword maps. Unknown
//! option names are rejected when a configuration is parsed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::any::EstimatorKind;
use super::batch::DEFAULT_PARALLEL_THRESHOLD;
use crate::error::{AssayError, Result};

/// Options for [`NaiveBayesEstimator`](super::NaiveBayesEstimator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NaiveBayesConfig {
    /// Additive (Laplace) smoothing applied to every count.
    pub smoothing: f64,
    /// Attributes to fit. Must be active in the dataset; `None` keeps all of them.
    pub active_attributes: Option<Vec<String>>,
    /// Attributes used as conditioning context. `None` uses every attribute.
    pub context_attributes: Option<Vec<String>>,
    /// Batches with at least this many descriptors are scored in parallel.
    pub parallel_threshold: usize,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self {
            smoothing: 1.0,
            active_attributes: None,
            context_attributes: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Options for [`FrequencyEstimator`](super::FrequencyEstimator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencyConfig {
    /// Additive smoothing applied to every value count.
    pub smoothing: f64,
    /// Attributes to fit. Must be active in the dataset; `None` keeps all of them.
    pub active_attributes: Option<Vec<String>>,
    /// Batches with at least this many descriptors are scored in parallel.
    pub parallel_threshold: usize,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            smoothing: 1.0,
            active_attributes: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Configuration for any estimator, tagged by strategy.
///
/// ```
/// use assay::EstimatorConfig;
///
/// let config = EstimatorConfig::from_json(r#"{"estimator": "naive_bayes", "smoothing": 0.5}"#).unwrap();
/// assert!(matches!(config, EstimatorConfig::NaiveBayes(ref c) if c.smoothing == 0.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "estimator", rename_all = "snake_case")]
pub enum EstimatorConfig {
    NaiveBayes(NaiveBayesConfig),
    Frequency(FrequencyConfig),
}

impl EstimatorConfig {
    /// Default options for a strategy.
    pub fn default_for(kind: EstimatorKind) -> Self {
        match kind {
            EstimatorKind::NaiveBayes => EstimatorConfig::NaiveBayes(NaiveBayesConfig::default()),
            EstimatorKind::Frequency => EstimatorConfig::Frequency(FrequencyConfig::default()),
        }
    }

    /// Build a configuration from loose `name -> value` options.
    ///
    /// Missing options take their defaults; unknown names or mistyped values
    /// fail with a configuration error.
    pub fn from_options(kind: EstimatorKind, options: &Map<String, Value>) -> Result<Self> {
        let value = Value::Object(options.clone());
        let config = match kind {
            EstimatorKind::NaiveBayes => {
                EstimatorConfig::NaiveBayes(serde_json::from_value(value).map_err(config_error)?)
            }
            EstimatorKind::Frequency => {
                EstimatorConfig::Frequency(serde_json::from_value(value).map_err(config_error)?)
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a tagged JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EstimatorConfig = serde_json::from_str(text).map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a tagged JSON configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AssayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&text)
    }

    /// The strategy this configuration is for.
    pub fn kind(&self) -> EstimatorKind {
        match self {
            EstimatorConfig::NaiveBayes(_) => EstimatorKind::NaiveBayes,
            EstimatorConfig::Frequency(_) => EstimatorKind::Frequency,
        }
    }

    /// Check option values.
    pub fn validate(&self) -> Result<()> {
        match self {
            EstimatorConfig::NaiveBayes(c) => validate_smoothing(c.smoothing),
            EstimatorConfig::Frequency(c) => validate_smoothing(c.smoothing),
        }
    }
}

impl From<NaiveBayesConfig> for EstimatorConfig {
    fn from(config: NaiveBayesConfig) -> Self {
        EstimatorConfig::NaiveBayes(config)
    }
}

impl From<FrequencyConfig> for EstimatorConfig {
    fn from(config: FrequencyConfig) -> Self {
        EstimatorConfig::Frequency(config)
    }
}

pub(crate) fn validate_smoothing(smoothing: f64) -> Result<()> {
    if smoothing.is_finite() && smoothing >= 0.0 {
        Ok(())
    } else {
        Err(AssayError::Configuration(format!(
            "smoothing must be a finite non-negative number, got {}",
            smoothing
        )))
    }
}

fn config_error(e: serde_json::Error) -> AssayError {
    AssayError::Configuration(e.to_string())
}
