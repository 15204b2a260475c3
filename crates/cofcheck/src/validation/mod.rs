//! Consistency checks over the curated database.

mod check;
mod crossref;
mod duplicates;
mod files;
mod finding;
mod geometry;
mod report;
mod uniqueness;

pub use check::{Check, CheckSuite};
pub use crossref::{ConsistentPaperIds, ReciprocalDuplicates};
pub use duplicates::UniqueStructures;
pub use files::{MatchStructureFiles, STRUCTURE_EXTENSION, list_structure_files};
pub use finding::{Finding, FindingKind, Severity};
pub use geometry::OverlappingAtoms;
pub use report::{CheckReport, FindingCounts};
pub use uniqueness::{
    DuplicateGroup, UniqueDois, UniqueFrameworkIds, UniqueFrameworkNames, find_duplicates,
    normalize_doi, normalize_framework_id, normalize_name,
};
