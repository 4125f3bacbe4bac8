//! Domain pruning and weak labeling driven by estimator posteriors.
//!
//! The pruner builds a candidate domain for every cell from the values
//! observed in its column, scores all cells through
//! [`Estimator::predict_pp_batch`](crate::Estimator::predict_pp_batch), then
//! keeps the plausible values and labels the confident cells.

mod domains;
mod pruner;

pub use domains::cell_domains;
pub use pruner::{DomainPruner, PrunedDomain, PruningConfig, PruningReport, WeakLabel};
