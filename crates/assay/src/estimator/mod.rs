//! The posterior estimator contract and its implementations.
//!
//! Every inference strategy implements [`Estimator`]: it is bound to one
//! [`Dataset`](crate::Dataset) at construction, fit once with `train`, and
//! then queried read-only. `predict_pp_batch` must return, for each
//! descriptor, what `predict_pp` returns for that descriptor alone.

mod any;
mod batch;
mod config;
mod counts;
mod frequency;
mod naive_bayes;

use std::collections::HashMap;

use crate::dataset::{Row, Tid};
use crate::error::Result;
use crate::posterior::{BatchDescriptor, PosteriorResult};

pub use any::{AnyEstimator, EstimatorKind};
pub use config::{EstimatorConfig, FrequencyConfig, NaiveBayesConfig};
pub use frequency::FrequencyEstimator;
pub use naive_bayes::NaiveBayesEstimator;

/// Estimates `p(value | rest of row)` for candidate values of a cell.
///
/// An estimator starts untrained. `train` moves it to the trained state and
/// may be repeated to refit; a failed `train` leaves the previous state in
/// place. Prediction takes `&self` and never changes the model, so a trained
/// estimator can be shared across threads.
pub trait Estimator: Send + Sync {
    /// Options recognised by this strategy.
    type Config;

    /// Fit the model from the bound dataset.
    ///
    /// Fails with [`AssayError::Configuration`](crate::AssayError::Configuration)
    /// for invalid options and [`AssayError::Training`](crate::AssayError::Training)
    /// when the dataset offers nothing to learn from.
    fn train(&mut self, config: &Self::Config) -> Result<()>;

    /// Posterior over `values` for attribute `attr`, conditioned on `row`.
    ///
    /// The result has one entry per value, in the same order, each with a
    /// probability in [0, 1]. `values` must be non-empty and duplicate-free.
    fn predict_pp(&self, row: &Row, attr: &str, values: &[String]) -> Result<PosteriorResult>;

    /// [`Estimator::predict_pp`] over many cells at once.
    ///
    /// `records` must contain the row of every descriptor's tid. Results come
    /// back in descriptor order. All descriptors are validated before any is
    /// scored: one bad descriptor fails the whole call.
    fn predict_pp_batch(
        &self,
        records: &HashMap<Tid, Row>,
        descriptors: &[BatchDescriptor],
    ) -> Result<Vec<PosteriorResult>>;
}
