//! Parsed tables and the metadata of the file they came from.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cell contents treated as missing, compared case-insensitively after trimming.
const NULL_TOKENS: &[&str] = &["na", "n/a", "null", "none", "nil", "_null_", ".", "-"];

/// Where a table was loaded from, and a fingerprint of its bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Base name of the loaded file.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:`-prefixed digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// "csv", "tsv" or another delimiter name.
    pub format: String,
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            file: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Parsed tabular data, one string per cell.
///
/// Headers become attribute names; row index `i` becomes tid `i`.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub headers: Vec<String>,
    /// Row-major cells, every row padded or cut to `headers.len()`.
    pub rows: Vec<Vec<String>>,
    pub delimiter: u8,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Data rows, header excluded.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, col)`, or `None` outside the table.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
    }

    /// Whether a cell value stands for a missing observation.
    ///
    /// Nulls never count toward statistics and never act as context.
    pub fn is_null_value(value: &str) -> bool {
        let value = value.trim();
        value.is_empty()
            || NULL_TOKENS
                .iter()
                .any(|token| value.eq_ignore_ascii_case(token))
    }
}
