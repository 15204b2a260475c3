//! Error types for the cofcheck library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cofcheck operations.
#[derive(Debug, Error)]
pub enum CofCheckError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A table is missing a column every check relies on.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Empty file or no header to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A structure file could not be turned into an atomic configuration.
    #[error("Failed to parse structure file '{path}'")]
    StructureParse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Structure content that the backend rejects (bad CIF, too much occupancy, ...).
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl CofCheckError {
    /// Wrap a backend error as a parse failure for `path`, keeping the original as source.
    pub fn structure_parse(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CofCheckError::StructureParse {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for cofcheck operations.
pub type Result<T> = std::result::Result<T, CofCheckError>;
