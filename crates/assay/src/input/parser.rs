//! CSV/TSV parser with delimiter detection.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{AssayError, Result};

/// Delimiters to try when auto-detecting, in order of preference on ties.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled for delimiter detection.
const DETECTION_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited text into a [`DataTable`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| AssayError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let hash = format!("sha256:{:x}", Sha256::digest(&contents));
        let table = self.parse_bytes(&contents)?;

        let format = match table.delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            %format,
            "parsed data file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse in-memory text.
    pub fn parse_str(&self, text: &str) -> Result<DataTable> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse raw bytes, detecting the delimiter unless one is configured.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let delimiter = match self.config.delimiter {
            Some(d) if d.is_ascii() && d != self.config.quote => d,
            Some(d) => {
                return Err(AssayError::InvalidDelimiter(format!(
                    "{:?} cannot be used as a delimiter",
                    d as char
                )));
            }
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record?,
            None => return Err(AssayError::EmptyData("No data rows found".to_string())),
        };

        let (headers, mut rows): (Vec<String>, Vec<Vec<String>>) = if self.config.has_header {
            let headers = first.iter().map(|s| s.trim().to_string()).collect();
            (headers, Vec::new())
        } else {
            let headers = (1..=first.len()).map(|i| format!("column_{}", i)).collect();
            (headers, vec![first.iter().map(str::to_string).collect()])
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AssayError::EmptyData("No columns found".to_string()));
        }

        let width = headers.len();
        for record in records {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }

            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            // Ragged rows are padded or cut to the header width
            row.resize(width, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(AssayError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the delimiter that splits the sampled lines most consistently.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(DETECTION_LINES)
        .collect();

    if lines.is_empty() {
        return Err(AssayError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best = (b',', 0usize);
    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delim))
            .collect();

        let first = counts[0];
        if first == 0 {
            continue;
        }

        let min = counts.iter().copied().min().unwrap_or(0);
        let max = counts.iter().copied().max().unwrap_or(0);

        // Consistent counts dominate; a spread of one still beats a ragged split
        let score = match max - min {
            0 => first * 1000 + if delim == b'\t' { 100 } else { 0 },
            1 => first * 100,
            _ => first,
        };

        if score > best.1 {
            best = (delim, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences outside double quotes.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let delimiter = delimiter as char;
    line.chars()
        .scan(false, |in_quotes, ch| {
            if ch == '"' {
                *in_quotes = !*in_quotes;
            }
            Some(ch == delimiter && !*in_quotes)
        })
        .filter(|&hit| hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted() {
        let data = b"name;note\n\"Smith, J\";ok\n\"Doe, A\";ok";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let table = Parser::new()
            .parse_str("city,state\nLA,CA\nNYC,NY")
            .unwrap();

        assert_eq!(table.headers, vec!["city", "state"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("LA"));
        assert_eq!(table.get(1, 1), Some("NY"));
    }

    #[test]
    fn test_parse_pads_ragged_rows() {
        let table = Parser::new().parse_str("a,b,c\n1,2\n3,4,5,6").unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
        assert_eq!(table.rows[1], vec!["3", "4", "5"]);
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("LA,CA\nNYC,NY").unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_parse_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_str("a,b\n1,2\n3,4\n5,6").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let err = Parser::new().parse_str("a,b\n").unwrap_err();
        assert!(matches!(err, AssayError::EmptyData(_)));
    }

    #[test]
    fn test_parse_rejects_quote_as_delimiter() {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b'"'),
            ..ParserConfig::default()
        });
        let err = parser.parse_str("a,b\n1,2").unwrap_err();
        assert!(matches!(err, AssayError::InvalidDelimiter(_)));
    }
}
