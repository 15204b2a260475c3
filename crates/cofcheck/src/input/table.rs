//! In-memory tabular data.

use crate::error::{CofCheckError, Result};

/// Represents a parsed CSV table.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Table name used in diagnostics (usually the file name).
    pub name: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a column by name, failing when the table does not have it.
    pub fn require_column(&self, name: &str) -> Result<Vec<&str>> {
        self.column_by_name(name)
            .ok_or_else(|| CofCheckError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::new(
            "papers.csv",
            vec!["DOI".to_string(), "CURATED-COFs paper ID".to_string()],
            vec![
                vec!["10.1/a".to_string(), "p100".to_string()],
                vec!["10.1/b".to_string()],
            ],
        )
    }

    #[test]
    fn test_column_by_name_pads_short_rows() {
        let t = table();
        assert_eq!(
            t.column_by_name("CURATED-COFs paper ID"),
            Some(vec!["p100", ""])
        );
        assert_eq!(t.get(0, 0), Some("10.1/a"));
    }

    #[test]
    fn test_require_column_reports_table_and_column() {
        let err = table().require_column("Name").unwrap_err();
        assert_eq!(err.to_string(), "Table 'papers.csv' has no column 'Name'");
    }
}
