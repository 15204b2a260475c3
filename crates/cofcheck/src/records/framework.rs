//! Framework rows.

use serde::{Deserialize, Serialize};

/// Header of the framework id column.
pub const FRAMEWORK_ID_COLUMN: &str = "CURATED-COFs ID";
/// Header of the framework name column.
pub const NAME_COLUMN: &str = "Name";
/// Header of the "duplicate of" column.
pub const DUPLICATE_COLUMN: &str = "Duplicate found";

/// Literal used in the duplicate column for records without a duplicate.
pub const NO_DUPLICATE: &str = "none";

/// Number of leading id characters shared by all frameworks of one paper.
pub const PAPER_PREFIX_LEN: usize = 4;

/// One curated framework (a row of the frameworks or discarded table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkRecord {
    /// Stable identifier, e.g. `16242C2`.
    pub id: String,
    /// Framework name as entered by the curator.
    pub name: String,
    /// Id of the record this one duplicates, `None` for the literal `none`.
    pub duplicate_of: Option<String>,
}

impl FrameworkRecord {
    /// Create a record; `duplicate_found` is the raw cell of the duplicate column.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duplicate_found: &str,
    ) -> Self {
        let duplicate_of = if duplicate_found == NO_DUPLICATE {
            None
        } else {
            Some(duplicate_found.to_string())
        };

        Self {
            id: id.into(),
            name: name.into(),
            duplicate_of,
        }
    }

    /// The raw duplicate cell, as it appears in the table.
    pub fn duplicate_mark(&self) -> &str {
        self.duplicate_of.as_deref().unwrap_or(NO_DUPLICATE)
    }

    /// Paper id implied by this framework id: `p` + its first four characters.
    pub fn paper_id(&self) -> String {
        derive_paper_id(&self.id)
    }

    /// Structure file name for this record.
    pub fn structure_file_name(&self) -> String {
        format!("{}.cif", self.id)
    }
}

/// `p` followed by the first four characters of a framework id.
///
/// Shorter ids are used whole.
pub fn derive_paper_id(framework_id: &str) -> String {
    let prefix: String = framework_id.chars().take(PAPER_PREFIX_LEN).collect();
    format!("p{}", prefix)
}
