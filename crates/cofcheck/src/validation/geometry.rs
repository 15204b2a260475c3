//! Self-overlapping atoms in structure files.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::check::Check;
use super::finding::{Finding, FindingKind};
use super::report::CheckReport;
use crate::config::DEFAULT_OVERLAP_CUTOFF;
use crate::error::Result;
use crate::records::Database;
use crate::structure::{Structure, StructureReader};

/// An error and its sources joined with `: `.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// File name for messages, falling back to the full path.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Finding for a structure file the backend could not read.
pub(crate) fn unparsable(path: &Path, err: &dyn Error) -> Finding {
    warn!(path = %path.display(), error = %error_chain(err), "unparsable structure");
    Finding::error(
        FindingKind::UnparsableStructure,
        format!("Could not parse {}: {}", display_name(path), error_chain(err)),
    )
    .with_subjects([display_name(path)])
}

fn describe_pair(structure: &Structure, (i, j): (usize, usize)) -> String {
    format!(
        "{}#{} and {}#{} ({:.3})",
        structure.sites[i].label,
        i,
        structure.sites[j].label,
        j,
        structure.distance(i, j)
    )
}

/// `overlapping-atoms <files...>`: no two atoms of a structure closer than
/// the cutoff.
///
/// A file that cannot be parsed is recorded as a finding and the remaining
/// files are still checked.
pub struct OverlappingAtoms<R> {
    files: Vec<PathBuf>,
    reader: R,
    cutoff: f64,
}

impl<R: StructureReader> OverlappingAtoms<R> {
    pub fn new(files: Vec<PathBuf>, reader: R) -> Self {
        Self {
            files,
            reader,
            cutoff: DEFAULT_OVERLAP_CUTOFF,
        }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    fn check_file(&self, path: &Path) -> Option<Finding> {
        let structure = match self.reader.read(path) {
            Ok(structure) => structure,
            Err(err) => return Some(unparsable(path, &err)),
        };

        let pairs = self.reader.overlapping_atoms(&structure, self.cutoff);
        if pairs.is_empty() {
            return None;
        }

        const SHOWN: usize = 3;
        let mut shown: Vec<String> = pairs
            .iter()
            .take(SHOWN)
            .map(|&pair| describe_pair(&structure, pair))
            .collect();
        if pairs.len() > SHOWN {
            shown.push(format!("... {} more", pairs.len() - SHOWN));
        }

        Some(
            Finding::error(
                FindingKind::OverlappingAtoms,
                format!(
                    "{} has {} overlapping atom pair(s) closer than {}: {}",
                    display_name(path),
                    pairs.len(),
                    self.cutoff,
                    shown.join(", ")
                ),
            )
            .with_subjects([display_name(path)]),
        )
    }
}

impl<R: StructureReader> Check for OverlappingAtoms<R> {
    fn name(&self) -> &'static str {
        "overlapping-atoms"
    }

    fn run(&self, _db: &Database) -> Result<CheckReport> {
        let findings = self
            .files
            .iter()
            .filter_map(|path| self.check_file(path))
            .collect();

        Ok(CheckReport::new(
            self.name(),
            findings,
            "No overlapping atoms found.",
            "Overlapping atoms found.",
        ))
    }
}
