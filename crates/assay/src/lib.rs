//! Assay: posterior value estimation for cleaning tabular datasets.
//!
//! Given a dataset whose cells may hold erroneous or missing values, an
//! [`Estimator`] estimates a probability distribution over candidate values
//! for a cell, conditioned on the rest of its row. The posteriors drive
//! domain pruning and weak labeling (see [`pruning`]).
//!
//! # Lifecycle
//!
//! - Construct an estimator bound to a [`Dataset`]
//! - `train` it once (or again to refit)
//! - Query it with `predict_pp` per cell or `predict_pp_batch` for many cells
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use assay::{Dataset, Estimator, NaiveBayesConfig, NaiveBayesEstimator, Parser, TableDataset};
//!
//! let (table, _source) = Parser::new().parse_file("hospital.csv").unwrap();
//! let dataset = Arc::new(TableDataset::new(table).unwrap());
//!
//! let mut estimator = NaiveBayesEstimator::new(dataset.clone()).unwrap();
//! estimator.train(&NaiveBayesConfig::default()).unwrap();
//!
//! let row = dataset.row(0).unwrap();
//! let values = vec!["CA".to_string(), "NY".to_string()];
//! let posterior = estimator.predict_pp(&row, "state", &values).unwrap();
//!
//! for (value, proba) in posterior.iter() {
//!     println!("{value}: {proba:.3}");
//! }
//! ```

pub mod dataset;
pub mod error;
pub mod estimator;
pub mod input;
pub mod posterior;
pub mod pruning;

pub use dataset::{Dataset, Row, TableDataset, Tid};
pub use error::{AssayError, Result};
pub use estimator::{
    AnyEstimator, Estimator, EstimatorConfig, EstimatorKind, FrequencyConfig, FrequencyEstimator,
    NaiveBayesConfig, NaiveBayesEstimator,
};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use posterior::{BatchDescriptor, Cell, PosteriorResult};
pub use pruning::{DomainPruner, PrunedDomain, PruningConfig, PruningReport, WeakLabel};
