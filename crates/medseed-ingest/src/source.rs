//! CSV source ingestion
//!
//! Reads the medicine export into [`RawRecord`]s keyed by header. Cells that
//! hold a null marker (empty, `NA`, `NaN`, `null`, ...) are dropped while
//! reading, so [`RawRecord::get`] returns `None` for them exactly as it does
//! for a column the file does not have.
//!
//! Rows that cannot be decoded are kept as [`MalformedRow`]s rather than
//! failing the whole read. I/O failures are fatal.

use medseed_common::{Result, SeedError};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Cell values read as "no value". Matches the default NA markers of the
/// spreadsheet tooling the export comes from.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// One data row, keyed by column header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    line: u64,
    values: HashMap<String, String>,
}

impl RawRecord {
    /// Build a record from `(column, cell)` pairs, dropping null cells.
    ///
    /// When a header repeats, the first column wins.
    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = HashMap::new();
        for (column, cell) in pairs {
            let cell = cell.as_ref();
            if is_null_token(cell) {
                continue;
            }
            values
                .entry(column.as_ref().to_string())
                .or_insert_with(|| cell.to_string());
        }
        Self { line, values }
    }

    /// 1-based line in the source file (the header is line 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw cell for `column`, or `None` when the column is missing or null
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// A row the CSV reader could not decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    pub line: u64,
    pub reason: String,
}

pub type SourceRow = std::result::Result<RawRecord, MalformedRow>;

/// Everything read from one CSV file, in file order
#[derive(Debug, Default)]
pub struct SourceRows {
    pub headers: Vec<String>,
    pub rows: Vec<SourceRow>,
}

impl SourceRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read the CSV at `path`.
///
/// Returns [`SeedError::InputNotFound`] when the file does not exist, so
/// callers can stop before doing anything destructive.
pub fn read_csv_file(path: &Path, limit: Option<usize>) -> Result<SourceRows> {
    if !path.exists() {
        return Err(SeedError::InputNotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|e| SeedError::input_read(path, e))?;
    read_csv(file, path, limit)
}

/// Read CSV data from any reader. `origin` is only used in error messages.
pub fn read_csv<R: io::Read>(reader: R, origin: &Path, limit: Option<usize>) -> Result<SourceRows> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SeedError::input_read(origin, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SeedError::input_read(origin, "missing header row"));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        if limit.is_some_and(|max| rows.len() >= max) {
            debug!(limit = ?limit, "Reached row limit");
            break;
        }

        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                rows.push(Ok(RawRecord::from_pairs(
                    line,
                    headers.iter().zip(record.iter()),
                )));
            },
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(SeedError::input_read(origin, e));
            },
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                rows.push(Err(MalformedRow {
                    line,
                    reason: e.to_string(),
                }));
            },
        }
    }

    Ok(SourceRows { headers, rows })
}
