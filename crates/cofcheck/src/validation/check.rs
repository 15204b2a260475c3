//! The check interface and the table-level suite.

use super::crossref::{ConsistentPaperIds, ReciprocalDuplicates};
use super::files::MatchStructureFiles;
use super::report::CheckReport;
use super::uniqueness::{UniqueDois, UniqueFrameworkIds, UniqueFrameworkNames};
use crate::config::CheckConfig;
use crate::error::Result;
use crate::records::Database;

/// A consistency check over the loaded database.
pub trait Check {
    /// Command name, e.g. `unique-dois`.
    fn name(&self) -> &'static str;

    /// Run the check. Inconsistencies are findings in the report; `Err` is
    /// reserved for problems that stop the check from running at all.
    fn run(&self, db: &Database) -> Result<CheckReport>;
}

/// The checks that need only the tables and the structures directory.
pub struct CheckSuite {
    checks: Vec<Box<dyn Check>>,
}

impl CheckSuite {
    /// All table and file-set checks, in command order.
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            checks: vec![
                Box::new(UniqueDois),
                Box::new(UniqueFrameworkIds),
                Box::new(UniqueFrameworkNames),
                Box::new(ReciprocalDuplicates),
                Box::new(ConsistentPaperIds),
                Box::new(MatchStructureFiles::new(config.structures_path())),
            ],
        }
    }

    /// Run every check; all run even when earlier ones fail.
    pub fn run(&self, db: &Database) -> Result<Vec<CheckReport>> {
        self.checks.iter().map(|check| check.run(db)).collect()
    }
}
