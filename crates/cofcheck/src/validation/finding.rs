//! Typed findings produced by the checks.

use serde::{Deserialize, Serialize};

/// What kind of inconsistency a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Two papers share a DOI (case-insensitive).
    DuplicateDoi,
    /// Two frameworks share an id (case-insensitive).
    DuplicateFrameworkId,
    /// Two frameworks share a normalized name.
    DuplicateFrameworkName,
    /// A duplicate mark points to an id with zero or several rows.
    MissingReciprocalMark,
    /// A duplicate mark is not returned by the referenced row.
    AsymmetricDuplicateMark,
    /// A papers-table id that no framework id implies.
    PaperWithoutStructure,
    /// A paper id implied by framework ids but absent from the papers table.
    PaperMissing,
    /// A framework id without a structure file.
    MissingStructureFile,
    /// A structure file without a framework id.
    UnreferencedStructureFile,
    /// Atoms closer than the overlap cutoff.
    OverlappingAtoms,
    /// A structure file the backend cannot parse.
    UnparsableStructure,
    /// Two non-exempt structures with the same bonding-graph hash.
    DuplicateStructure,
    /// A structure too large to hash.
    SkippedStructure,
}

impl FindingKind {
    /// Get a human-readable label for the finding kind.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::DuplicateDoi => "Duplicate DOI",
            FindingKind::DuplicateFrameworkId => "Duplicate framework ID",
            FindingKind::DuplicateFrameworkName => "Duplicate framework name",
            FindingKind::MissingReciprocalMark => "Missing reciprocal mark",
            FindingKind::AsymmetricDuplicateMark => "Asymmetric duplicate mark",
            FindingKind::PaperWithoutStructure => "Paper without structure",
            FindingKind::PaperMissing => "Missing paper",
            FindingKind::MissingStructureFile => "Missing structure file",
            FindingKind::UnreferencedStructureFile => "Unreferenced structure file",
            FindingKind::OverlappingAtoms => "Overlapping atoms",
            FindingKind::UnparsableStructure => "Unparsable structure",
            FindingKind::DuplicateStructure => "Duplicate structure",
            FindingKind::SkippedStructure => "Skipped structure",
        }
    }
}

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only; never fails a check.
    Info,
    /// Likely inconsistency that should be reviewed; fails the check.
    Warning,
    /// Definite inconsistency; fails the check.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }

    /// Whether findings of this severity fail the check.
    pub fn is_failure(&self) -> bool {
        *self >= Severity::Warning
    }
}

/// A single inconsistency found by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Type of issue.
    pub kind: FindingKind,
    /// Severity level.
    pub severity: Severity,
    /// Offending identifiers: DOIs, framework ids, paper ids or file names.
    pub subjects: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    /// Create an error finding.
    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    /// Create a warning finding.
    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    /// Create an informational finding.
    pub fn info(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, message)
    }

    pub fn new(kind: FindingKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            subjects: Vec::new(),
            message: message.into(),
        }
    }

    /// Set the offending identifiers.
    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_finding() {
        let finding = Finding::error(FindingKind::DuplicateDoi, "Duplicate DOI '10.1/a'")
            .with_subjects(["10.1/a"]);

        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(finding.subjects, vec!["10.1/a"]);
        assert_eq!(finding.kind.label(), "Duplicate DOI");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(!Severity::Info.is_failure());
        assert!(Severity::Warning.is_failure());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FindingKind::MissingReciprocalMark).unwrap();
        assert_eq!(json, "\"missing_reciprocal_mark\"");
    }
}
