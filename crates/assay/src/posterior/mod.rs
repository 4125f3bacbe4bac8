//! Cells, candidate domains and the posteriors computed over them.

mod normalize;
mod types;

pub use normalize::{log_sum_exp, normalize_log_scores};
pub use types::{BatchDescriptor, Cell, PosteriorResult, validate_domain};
