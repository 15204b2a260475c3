//! cofcheck: consistency checks for the CURATED-COFs database.
//!
//! The database is a set of CSV tables (active frameworks, discarded
//! frameworks, papers) plus one CIF structure file per framework. Each check
//! reads the loaded tables and reports every inconsistency it finds before
//! the database is published or merged.
//!
//! # Core Principles
//!
//! - **Read-only**: tables and structure files are never modified
//! - **Batch reporting**: a check collects all findings, then fails once
//! - **Pluggable chemistry**: structure parsing and graph hashing sit behind
//!   traits, with a small built-in CIF backend
//!
//! # Example
//!
//! ```no_run
//! use cofcheck::{Check, CheckConfig, Database, UniqueDois};
//!
//! let config = CheckConfig::with_root("CURATED-COFs");
//! let db = Database::load(&config).unwrap();
//! let report = UniqueDois.run(&db).unwrap();
//!
//! println!("{}", report.headline);
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod records;
pub mod structure;
pub mod validation;

pub use config::CheckConfig;
pub use error::{CofCheckError, Result};
pub use input::{DataTable, TableReader};
pub use records::{Database, ExceptionList, FrameworkRecord, PaperRecord};
pub use structure::{
    CifBackend, CrystalParser, GraphHasher, ParseOptions, Structure, StructureReader,
    WeisfeilerLehmanHasher,
};
pub use validation::{
    Check, CheckReport, CheckSuite, ConsistentPaperIds, Finding, FindingKind, MatchStructureFiles,
    OverlappingAtoms, ReciprocalDuplicates, Severity, UniqueDois, UniqueFrameworkIds,
    UniqueFrameworkNames, UniqueStructures,
};
