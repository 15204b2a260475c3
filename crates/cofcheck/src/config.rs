//! Where the database lives and the tunables the checks use.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CofCheckError, Result};

/// Config file picked up from the database root when no explicit file is given.
pub const DEFAULT_CONFIG_FILE: &str = "cofcheck.json";

/// Distance below which two atoms count as overlapping.
pub const DEFAULT_OVERLAP_CUTOFF: f64 = 0.1;

/// Structures with more atoms than this are not graph-hashed.
pub const DEFAULT_MAX_ATOMS: usize = 1000;

/// The database over-specifies disordered sites, so occupancies are barely checked.
pub const DEFAULT_OCCUPANCY_TOLERANCE: f64 = 100.0;

/// Configuration for a validation run.
///
/// Relative paths are resolved against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Database root directory.
    pub root: PathBuf,
    /// Active frameworks table.
    pub frameworks: PathBuf,
    /// Discarded frameworks table.
    pub discarded: PathBuf,
    /// Papers table.
    pub papers: PathBuf,
    /// Flat directory of `<id>.cif` files.
    pub structures_dir: PathBuf,
    /// Curated list of id pairs allowed to share a graph hash.
    pub exceptions: PathBuf,
    /// Overlap cutoff in the structure file's length unit.
    pub overlap_cutoff: f64,
    /// Atom count above which graph hashing is skipped.
    pub max_atoms: usize,
    /// Occupancy tolerance handed to the crystallographic parser.
    pub occupancy_tolerance: f64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            frameworks: PathBuf::from("cof-frameworks.csv"),
            discarded: PathBuf::from("cof-discarded.csv"),
            papers: PathBuf::from("cof-papers.csv"),
            structures_dir: PathBuf::from("cifs"),
            exceptions: PathBuf::from("structure-exceptions.csv"),
            overlap_cutoff: DEFAULT_OVERLAP_CUTOFF,
            max_atoms: DEFAULT_MAX_ATOMS,
            occupancy_tolerance: DEFAULT_OCCUPANCY_TOLERANCE,
        }
    }
}

impl CheckConfig {
    /// Default configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// A `root` missing from the file defaults to the directory holding the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CofCheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw: serde_json::Value = serde_json::from_str(&content)?;
        let has_root = raw.get("root").is_some();
        let mut config: CheckConfig = serde_json::from_value(raw)?;

        if !has_root {
            config.root = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for a database root.
    ///
    /// An explicit `config_file` must exist; otherwise `cofcheck.json` inside
    /// `root` is used when present and defaults apply when it is not.
    pub fn resolve(root: Option<&Path>, config_file: Option<&Path>) -> Result<Self> {
        if let Some(file) = config_file {
            let mut config = Self::from_file(file)?;
            if let Some(root) = root {
                config.root = root.to_path_buf();
            }
            return Ok(config);
        }

        let root = root.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            let mut config = Self::from_file(&candidate)?;
            config.root = root;
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Reject values the checks cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.overlap_cutoff.is_finite() && self.overlap_cutoff > 0.0) {
            return Err(CofCheckError::Config(format!(
                "overlap_cutoff must be a positive number, got {}",
                self.overlap_cutoff
            )));
        }
        if !(self.occupancy_tolerance.is_finite() && self.occupancy_tolerance >= 1.0) {
            return Err(CofCheckError::Config(format!(
                "occupancy_tolerance must be at least 1.0, got {}",
                self.occupancy_tolerance
            )));
        }
        if self.max_atoms == 0 {
            return Err(CofCheckError::Config("max_atoms must be positive".to_string()));
        }
        Ok(())
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn frameworks_path(&self) -> PathBuf {
        self.resolve_path(&self.frameworks)
    }

    pub fn discarded_path(&self) -> PathBuf {
        self.resolve_path(&self.discarded)
    }

    pub fn papers_path(&self) -> PathBuf {
        self.resolve_path(&self.papers)
    }

    pub fn structures_path(&self) -> PathBuf {
        self.resolve_path(&self.structures_dir)
    }

    pub fn exceptions_path(&self) -> PathBuf {
        self.resolve_path(&self.exceptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_resolve_against_root() {
        let config = CheckConfig::with_root("/data/cofs");
        assert_eq!(config.frameworks_path(), PathBuf::from("/data/cofs/cof-frameworks.csv"));
        assert_eq!(config.structures_path(), PathBuf::from("/data/cofs/cifs"));
        assert_eq!(config.max_atoms, 1000);
        assert!((config.overlap_cutoff - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut config = CheckConfig::with_root("/data/cofs");
        config.structures_dir = PathBuf::from("/scratch/cifs");
        assert_eq!(config.structures_path(), PathBuf::from("/scratch/cifs"));
    }

    #[test]
    fn test_from_file_defaults_root_to_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cofcheck.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"structures_dir": "structures", "max_atoms": 500}}"#).unwrap();

        let config = CheckConfig::from_file(&path).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.structures_path(), dir.path().join("structures"));
        assert_eq!(config.max_atoms, 500);
        assert_eq!(config.papers, PathBuf::from("cof-papers.csv"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cofcheck.json");
        fs::write(&path, r#"{"max_atom": 500}"#).unwrap();
        assert!(matches!(
            CheckConfig::from_file(&path),
            Err(CofCheckError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_cutoff_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cofcheck.json");
        fs::write(&path, r#"{"overlap_cutoff": -1.0}"#).unwrap();
        assert!(matches!(
            CheckConfig::from_file(&path),
            Err(CofCheckError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_without_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckConfig::resolve(Some(dir.path()), None).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.occupancy_tolerance, DEFAULT_OCCUPANCY_TOLERANCE);
    }

    #[test]
    fn test_resolve_picks_up_config_in_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), r#"{"max_atoms": 42}"#).unwrap();
        let config = CheckConfig::resolve(Some(dir.path()), None).unwrap();
        assert_eq!(config.max_atoms, 42);
        assert_eq!(config.root, dir.path());
    }
}
