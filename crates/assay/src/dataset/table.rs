//! [`Dataset`] implementation over a parsed [`DataTable`].

use std::collections::HashSet;

use super::{Dataset, Row, Tid, snapshot};
use crate::error::{AssayError, Result};
use crate::input::DataTable;

/// In-memory dataset whose tids are row positions and attributes are headers.
#[derive(Debug, Clone)]
pub struct TableDataset {
    table: DataTable,
    active: Vec<String>,
}

impl TableDataset {
    /// Wrap a parsed table. Every attribute starts active.
    ///
    /// Fails when the table has no headers or repeats one.
    pub fn new(table: DataTable) -> Result<Self> {
        if table.headers.is_empty() {
            return Err(AssayError::Configuration(
                "dataset exposes no attributes".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for header in &table.headers {
            if header.is_empty() {
                return Err(AssayError::Configuration(
                    "dataset has an unnamed attribute".to_string(),
                ));
            }
            if !seen.insert(header.as_str()) {
                return Err(AssayError::Configuration(format!(
                    "duplicate attribute '{}'",
                    header
                )));
            }
        }

        let active = table.headers.clone();
        Ok(Self { table, active })
    }

    /// Restrict the attributes that carry training signal.
    pub fn with_active_attributes<S: AsRef<str>>(mut self, attrs: &[S]) -> Result<Self> {
        let mut active = Vec::with_capacity(attrs.len());
        for attr in attrs {
            let attr = attr.as_ref();
            if self.table.column_index(attr).is_none() {
                return Err(AssayError::Configuration(format!(
                    "unknown active attribute '{}'",
                    attr
                )));
            }
            if !active.iter().any(|a: &String| a == attr) {
                active.push(attr.to_string());
            }
        }
        self.active = active;
        Ok(self)
    }

    /// The underlying table.
    pub fn table(&self) -> &DataTable {
        &self.table
    }
}

impl Dataset for TableDataset {
    fn attributes(&self) -> &[String] {
        &self.table.headers
    }

    fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn tids(&self) -> Vec<Tid> {
        (0..self.table.row_count()).collect()
    }

    fn value(&self, tid: Tid, attr_index: usize) -> Option<&str> {
        self.table.get(tid, attr_index)
    }

    fn active_attributes(&self) -> Vec<String> {
        self.active.clone()
    }

    fn row(&self, tid: Tid) -> Option<Row> {
        (tid < self.table.row_count()).then(|| snapshot(self, tid))
    }
}
