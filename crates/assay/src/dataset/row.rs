//! Read-only row snapshots used as conditioning context.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Tid;
use crate::input::DataTable;

/// Current values of one row, keyed by attribute in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    tid: Tid,
    values: IndexMap<String, String>,
}

impl Row {
    /// Create a row snapshot.
    pub fn new(tid: Tid, values: IndexMap<String, String>) -> Self {
        Self { tid, values }
    }

    /// Build a row from `(attribute, value)` pairs.
    pub fn from_pairs<A, V>(tid: Tid, pairs: impl IntoIterator<Item = (A, V)>) -> Self
    where
        A: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(a, v)| (a.into(), v.into()))
            .collect();
        Self { tid, values }
    }

    /// Row identifier.
    pub fn tid(&self) -> Tid {
        self.tid
    }

    /// Raw value of an attribute, including null tokens.
    pub fn get(&self, attr: &str) -> Option<&str> {
        self.values.get(attr).map(String::as_str)
    }

    /// Value of an attribute, or `None` when absent or null.
    pub fn observed(&self, attr: &str) -> Option<&str> {
        self.get(attr).filter(|v| !DataTable::is_null_value(v))
    }

    /// Attributes present in this row, in order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(attribute, value)` pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(a, v)| (a.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
