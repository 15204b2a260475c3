//! Curated list of structure pairs that legitimately share a graph hash.
//!
//! Enantiomers, polymorphs and frameworks that differ only in counter-ions
//! produce the same bonding graph. Curators record them in a CSV file:
//!
//! ```text
//! ID 1,ID 2,Reason
//! 18081N2,18082N2,enantiomers
//! ```
//!
//! Pair order is irrelevant.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CofCheckError, Result};

/// An unordered pair of framework ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExceptionPair {
    first: String,
    second: String,
}

impl ExceptionPair {
    /// Create a pair; the two ids are stored in sorted order.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn ids(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

#[derive(Debug, Deserialize)]
struct ExceptionRow {
    #[serde(rename = "ID 1")]
    first: String,
    #[serde(rename = "ID 2")]
    second: String,
    #[serde(rename = "Reason", default)]
    reason: Option<String>,
}

/// Allow-list of known, legitimate hash collisions.
#[derive(Debug, Clone, Default)]
pub struct ExceptionList {
    pairs: HashMap<ExceptionPair, Option<String>>,
}

impl ExceptionList {
    /// Build a list from id pairs.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(a, b)| (ExceptionPair::new(a, b), None))
                .collect(),
        }
    }

    /// Load the list from its CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| CofCheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let list = Self::from_reader(file)?;
        debug!(path = %path.display(), pairs = list.len(), "loaded structure exceptions");
        Ok(list)
    }

    /// Read the list from any CSV source.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut pairs = HashMap::new();
        for row in csv_reader.deserialize() {
            let row: ExceptionRow = row?;
            if row.first == row.second {
                return Err(CofCheckError::Config(format!(
                    "structure exception pairs '{}' with itself",
                    row.first
                )));
            }
            let reason = row.reason.filter(|r| !r.is_empty());
            pairs.insert(ExceptionPair::new(row.first, row.second), reason);
        }

        Ok(Self { pairs })
    }

    /// Whether the unordered pair `{a, b}` is exempt.
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.contains_key(&ExceptionPair::new(a, b))
    }

    /// Curator's note for an exempt pair.
    pub fn reason(&self, a: &str, b: &str) -> Option<&str> {
        self.pairs
            .get(&ExceptionPair::new(a, b))
            .and_then(|r| r.as_deref())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_are_unordered() {
        let list = ExceptionList::from_pairs([("18081N2", "18082N2")]);
        assert!(list.contains("18081N2", "18082N2"));
        assert!(list.contains("18082N2", "18081N2"));
        assert!(!list.contains("18081N2", "18083N2"));
    }

    #[test]
    fn test_pair_ids_are_sorted() {
        let pair = ExceptionPair::new("18082N2", "18081N2");
        assert_eq!(pair.ids(), ("18081N2", "18082N2"));
        assert_eq!(pair, ExceptionPair::new("18081N2", "18082N2"));
    }

    #[test]
    fn test_from_reader() {
        let csv = "ID 1,ID 2,Reason\n\
                   # polymorph pairs\n\
                   18081N2, 18082N2 ,enantiomers\n\
                   19000C2,19001C2,\n";
        let list = ExceptionList::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.reason("18082N2", "18081N2"), Some("enantiomers"));
        assert_eq!(list.reason("19000C2", "19001C2"), None);
    }

    #[test]
    fn test_reason_column_is_optional() {
        let list = ExceptionList::from_reader("ID 1,ID 2\nA,B\n".as_bytes()).unwrap();
        assert!(list.contains("B", "A"));
    }

    #[test]
    fn test_self_pair_is_rejected() {
        let err = ExceptionList::from_reader("ID 1,ID 2\nA,A\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CofCheckError::Config(_)));
    }

    #[test]
    fn test_missing_column_is_error() {
        assert!(ExceptionList::from_reader("ID 1\nA\n".as_bytes()).is_err());
    }
}
