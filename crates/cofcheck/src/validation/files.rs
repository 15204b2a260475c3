//! One structure file per framework id, and no others.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::check::Check;
use super::finding::{Finding, FindingKind};
use super::report::CheckReport;
use crate::error::{CofCheckError, Result};
use crate::records::Database;

/// Extension of structure files.
pub const STRUCTURE_EXTENSION: &str = "cif";

/// File names of the `*.cif` files directly inside `dir`, sorted.
pub fn list_structure_files(dir: &Path) -> Result<BTreeSet<String>> {
    let io_err = |source| CofCheckError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(STRUCTURE_EXTENSION)
        {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.insert(name.to_string());
        }
    }

    debug!(dir = %dir.display(), files = names.len(), "listed structure files");
    Ok(names)
}

/// `match-cifs`: framework ids and structure files correspond one to one.
pub struct MatchStructureFiles {
    dir: PathBuf,
}

impl MatchStructureFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Check for MatchStructureFiles {
    fn name(&self) -> &'static str {
        "match-cifs"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let mut pool = list_structure_files(&self.dir)?;
        let mut findings = Vec::new();

        // A file is consumed by the first id naming it; a repeated id has none left
        for id in db.all_framework_ids() {
            let file_name = format!("{}.{}", id, STRUCTURE_EXTENSION);
            if !pool.remove(&file_name) {
                findings.push(
                    Finding::error(
                        FindingKind::MissingStructureFile,
                        format!("Missing CIF file for ID {}", id),
                    )
                    .with_subjects([id]),
                );
            }
        }

        // BTreeSet iteration is already sorted by name
        for file_name in pool {
            findings.push(
                Finding::error(
                    FindingKind::UnreferencedStructureFile,
                    format!("CIF file {} does not match any framework ID", file_name),
                )
                .with_subjects([file_name]),
            );
        }

        Ok(CheckReport::new(
            self.name(),
            findings,
            "All CIF files match framework IDs.",
            "CIF files and framework IDs do not match.",
        ))
    }
}
