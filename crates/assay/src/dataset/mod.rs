//! Dataset abstraction consumed by estimators.
//!
//! Estimators only need the ordered attribute list, per-cell reads for
//! training, and row snapshots for conditioning. Anything that can provide
//! those implements [`Dataset`].

use std::collections::HashMap;

mod row;
mod table;

pub use row::Row;
pub use table::TableDataset;

/// Row (tuple) identifier.
pub type Tid = usize;

/// Read access to a table of string-valued cells.
pub trait Dataset: Send + Sync {
    /// Ordered, duplicate-free attribute names.
    fn attributes(&self) -> &[String];

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// All row identifiers, in dataset order.
    fn tids(&self) -> Vec<Tid>;

    /// Current value of one cell, by attribute position.
    fn value(&self, tid: Tid, attr_index: usize) -> Option<&str>;

    /// Attributes that carry training signal. Defaults to every attribute.
    fn active_attributes(&self) -> Vec<String> {
        self.attributes().to_vec()
    }

    /// Position of an attribute in [`Dataset::attributes`].
    fn attribute_index(&self, attr: &str) -> Option<usize> {
        self.attributes().iter().position(|a| a == attr)
    }

    /// Snapshot of one row, or `None` for a tid not listed by [`Dataset::tids`].
    ///
    /// The default scans `tids()`; implementations with positional tids can
    /// override it with a bounds check.
    fn row(&self, tid: Tid) -> Option<Row> {
        if !self.tids().contains(&tid) {
            return None;
        }
        Some(snapshot(self, tid))
    }

    /// Snapshots of every row keyed by tid, as batch queries expect them.
    fn records(&self) -> HashMap<Tid, Row> {
        self.tids()
            .into_iter()
            .map(|tid| (tid, snapshot(self, tid)))
            .collect()
    }
}

/// Materialize one row of `dataset`; missing cells read as empty strings.
pub(crate) fn snapshot<D: Dataset + ?Sized>(dataset: &D, tid: Tid) -> Row {
    let values = dataset
        .attributes()
        .iter()
        .enumerate()
        .map(|(idx, attr)| {
            let value = dataset.value(tid, idx).unwrap_or_default();
            (attr.clone(), value.to_string())
        })
        .collect();
    Row::new(tid, values)
}
