//! Paper rows.

use serde::{Deserialize, Serialize};

/// Header of the DOI column.
pub const DOI_COLUMN: &str = "DOI";
/// Header of the paper id column.
pub const PAPER_ID_COLUMN: &str = "CURATED-COFs paper ID";

/// One literature reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// DOI as entered; compared case-insensitively.
    pub doi: String,
    /// Paper id, `p` + the first four characters of its framework ids.
    pub paper_id: String,
}

impl PaperRecord {
    pub fn new(doi: impl Into<String>, paper_id: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            paper_id: paper_id.into(),
        }
    }
}
