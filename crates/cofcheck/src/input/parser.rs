//! CSV reader for the database tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::table::DataTable;
use crate::error::{CofCheckError, Result};

/// Reads the comma-separated tables the database is stored in.
///
/// Every cell is stripped of surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableReader;

impl TableReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a table from disk.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<DataTable> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CofCheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CofCheckError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let table = self.read_bytes(&name, &contents)?;
        debug!(
            table = %name,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }

    /// Parse bytes directly.
    pub fn read_bytes(&self, name: &str, bytes: &[u8]) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(CofCheckError::EmptyData(format!("No header row in '{}'", name)));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Skip blank lines that the csv crate reports as a single empty field
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }

            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        Ok(DataTable::new(name, headers, rows))
    }
}
