//! Structurally identical frameworks that are not flagged as duplicates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::check::Check;
use super::finding::{Finding, FindingKind};
use super::geometry::{display_name, unparsable};
use super::report::CheckReport;
use crate::config::{DEFAULT_MAX_ATOMS, DEFAULT_OCCUPANCY_TOLERANCE};
use crate::error::{CofCheckError, Result};
use crate::records::Database;
use crate::structure::{CrystalParser, GraphHasher, ParseOptions};

/// First file seen with a given graph hash.
struct FirstSeen {
    id: String,
    file: String,
}

enum Hashed {
    Hash(String),
    /// Atom count above the limit.
    TooLarge(usize),
}

/// `unique-structures <files...>`: no two non-discarded structures share a
/// bonding-graph hash unless the pair is on the exception list.
///
/// The framework id of a file is its stem. Structures larger than
/// `max_atoms` are skipped with an informational finding. Files that fail to
/// parse or hash are recorded as findings and the run continues.
pub struct UniqueStructures<P, H> {
    files: Vec<PathBuf>,
    parser: P,
    hasher: H,
    max_atoms: usize,
    occupancy_tolerance: f64,
}

impl<P: CrystalParser, H: GraphHasher> UniqueStructures<P, H> {
    pub fn new(files: Vec<PathBuf>, parser: P, hasher: H) -> Self {
        Self {
            files,
            parser,
            hasher,
            max_atoms: DEFAULT_MAX_ATOMS,
            occupancy_tolerance: DEFAULT_OCCUPANCY_TOLERANCE,
        }
    }

    pub fn with_max_atoms(mut self, max_atoms: usize) -> Self {
        self.max_atoms = max_atoms;
        self
    }

    pub fn with_occupancy_tolerance(mut self, tolerance: f64) -> Self {
        self.occupancy_tolerance = tolerance;
        self
    }

    fn options(&self) -> ParseOptions {
        ParseOptions {
            occupancy_tolerance: self.occupancy_tolerance,
            primitive: true,
        }
    }

    /// Hash of the first structure in `path`.
    fn structure_hash(&self, path: &Path) -> Result<Hashed> {
        let structures = self.parser.parse(path, &self.options())?;
        let structure = structures.first().ok_or_else(|| {
            CofCheckError::structure_parse(
                path,
                CofCheckError::InvalidStructure("parser returned no structure".to_string()),
            )
        })?;

        let atoms = structure.atom_count();
        if atoms > self.max_atoms {
            return Ok(Hashed::TooLarge(atoms));
        }
        Ok(Hashed::Hash(self.hasher.graph_hash(structure)?))
    }
}

impl<P: CrystalParser, H: GraphHasher> Check for UniqueStructures<P, H> {
    fn name(&self) -> &'static str {
        "unique-structures"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let discarded = db.discarded_ids();
        let mut seen: HashMap<String, FirstSeen> = HashMap::new();
        let mut findings = Vec::new();

        for path in &self.files {
            let file = display_name(path);
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();

            if discarded.contains(id.as_str()) {
                debug!(id = %id, "skipping discarded framework");
                continue;
            }

            let hash = match self.structure_hash(path) {
                Ok(Hashed::Hash(hash)) => hash,
                Ok(Hashed::TooLarge(atoms)) => {
                    info!(file = %file, atoms, max_atoms = self.max_atoms, "skipping large structure");
                    findings.push(
                        Finding::info(
                            FindingKind::SkippedStructure,
                            format!(
                                "Skipping {}: {} atoms exceed the limit of {}",
                                file, atoms, self.max_atoms
                            ),
                        )
                        .with_subjects([id]),
                    );
                    continue;
                }
                Err(err) => {
                    findings.push(unparsable(path, &err));
                    continue;
                }
            };

            match seen.get(&hash) {
                None => {
                    seen.insert(hash, FirstSeen { id, file });
                }
                Some(first) if db.exceptions.contains(&first.id, &id) => {
                    debug!(
                        first = %first.id,
                        second = %id,
                        reason = db.exceptions.reason(&first.id, &id).unwrap_or(""),
                        "accepted known duplicate"
                    );
                }
                Some(first) => {
                    findings.push(
                        Finding::warning(
                            FindingKind::DuplicateStructure,
                            format!(
                                "{} and {} have the same structure graph (hash {})",
                                first.file, file, hash
                            ),
                        )
                        .with_subjects([first.id.clone(), id]),
                    );
                }
            }
        }

        Ok(CheckReport::new(
            self.name(),
            findings,
            "No duplicate structures found.",
            "Duplicate structures found.",
        ))
    }
}
