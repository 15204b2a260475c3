//! Case-insensitive uniqueness of DOIs, framework ids and framework names.

use indexmap::IndexMap;

use super::check::Check;
use super::finding::{Finding, FindingKind};
use super::report::CheckReport;
use crate::error::Result;
use crate::records::Database;

/// Lower-cased DOI.
pub fn normalize_doi(doi: &str) -> String {
    doi.to_lowercase()
}

/// Lower-cased framework id.
pub fn normalize_framework_id(id: &str) -> String {
    id.to_lowercase()
}

/// Lower-cased name with hyphens read as spaces, so `Foo-Bar` matches `foo bar`.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace('-', " ")
}

/// A normalized value that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The normalized value.
    pub key: String,
    /// Zero-based rows holding it.
    pub rows: Vec<usize>,
    /// Distinct spellings as they appear in the table.
    pub spellings: Vec<String>,
}

/// Group values by normalized form and keep groups seen more than once.
///
/// Groups come back in order of first occurrence. Empty cells are ignored.
pub fn find_duplicates<'a, I, F>(values: I, normalize: F) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> String,
{
    let mut groups: IndexMap<String, DuplicateGroup> = IndexMap::new();

    for (row, value) in values.into_iter().enumerate() {
        if value.trim().is_empty() {
            continue;
        }
        let key = normalize(value);
        let group = groups.entry(key.clone()).or_insert_with(|| DuplicateGroup {
            key,
            rows: Vec::new(),
            spellings: Vec::new(),
        });
        group.rows.push(row);
        if !group.spellings.iter().any(|s| s == value) {
            group.spellings.push(value.to_string());
        }
    }

    groups.retain(|_, g| g.rows.len() > 1);
    groups.into_values().collect()
}

fn duplicate_findings(groups: Vec<DuplicateGroup>, kind: FindingKind, what: &str) -> Vec<Finding> {
    groups
        .into_iter()
        .map(|group| {
            let message = format!(
                "{} '{}' occurs {} times (rows {}; spelled {})",
                what,
                group.key,
                group.rows.len(),
                group
                    .rows
                    .iter()
                    .map(|r| (r + 1).to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                group
                    .spellings
                    .iter()
                    .map(|s| format!("'{}'", s))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Finding::error(kind, message).with_subjects([group.key])
        })
        .collect()
}

/// `unique-dois`: no two papers share a DOI.
pub struct UniqueDois;

impl Check for UniqueDois {
    fn name(&self) -> &'static str {
        "unique-dois"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let groups = find_duplicates(db.papers.iter().map(|p| p.doi.as_str()), normalize_doi);
        Ok(CheckReport::new(
            self.name(),
            duplicate_findings(groups, FindingKind::DuplicateDoi, "DOI"),
            "No duplicate DOIs found.",
            "Duplicate DOIs detected.",
        ))
    }
}

/// `unique-cof-ids`: no two active frameworks share an id.
pub struct UniqueFrameworkIds;

impl Check for UniqueFrameworkIds {
    fn name(&self) -> &'static str {
        "unique-cof-ids"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let groups = find_duplicates(
            db.frameworks.iter().map(|r| r.id.as_str()),
            normalize_framework_id,
        );
        Ok(CheckReport::new(
            self.name(),
            duplicate_findings(groups, FindingKind::DuplicateFrameworkId, "CURATED-COFs ID"),
            "No duplicate CURATED-COFs IDs found.",
            "Duplicate CURATED-COFs IDs detected.",
        ))
    }
}

/// `unique-cof-names`: no two active frameworks share a normalized name.
pub struct UniqueFrameworkNames;

impl Check for UniqueFrameworkNames {
    fn name(&self) -> &'static str {
        "unique-cof-names"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let groups = find_duplicates(db.frameworks.iter().map(|r| r.name.as_str()), normalize_name);
        Ok(CheckReport::new(
            self.name(),
            duplicate_findings(groups, FindingKind::DuplicateFrameworkName, "COF name"),
            "No duplicate COF names found.",
            "Duplicate COF names detected.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FrameworkRecord, PaperRecord};

    fn papers(dois: &[&str]) -> Database {
        Database::new(
            vec![],
            vec![],
            dois.iter().map(|d| PaperRecord::new(*d, "p0000")).collect(),
        )
    }

    fn named(names: &[&str]) -> Database {
        Database::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| FrameworkRecord::new(format!("{:05}N2", i), *n, "none"))
                .collect(),
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_dois_are_case_insensitive() {
        let report = UniqueDois.run(&papers(&["10.1/a", "10.1/A"])).unwrap();
        assert!(!report.passed);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].subjects, vec!["10.1/a"]);
        assert!(report.findings[0].message.contains("'10.1/A'"));
    }

    #[test]
    fn test_unique_dois_pass() {
        let report = UniqueDois.run(&papers(&["10.1/a", "10.1/b"])).unwrap();
        assert!(report.passed);
        assert_eq!(report.headline, "No duplicate DOIs found.");
    }

    #[test]
    fn test_blank_dois_are_not_duplicates() {
        let report = UniqueDois.run(&papers(&["", "10.1/a", ""])).unwrap();
        assert!(report.passed);
    }

    #[test]
    fn test_names_normalize_hyphens() {
        let report = UniqueFrameworkNames.run(&named(&["Foo-Bar", "foo bar"])).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].subjects, vec!["foo bar"]);

        let report = UniqueFrameworkNames.run(&named(&["Foo-Bar", "Foo Baz"])).unwrap();
        assert!(report.passed);
    }

    #[test]
    fn test_duplicate_ids() {
        let db = Database::new(
            vec![
                FrameworkRecord::new("05000N2", "a", "none"),
                FrameworkRecord::new("05000n2", "b", "none"),
                FrameworkRecord::new("05001N2", "c", "none"),
            ],
            vec![],
            vec![],
        );
        let report = UniqueFrameworkIds.run(&db).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::DuplicateFrameworkId);
    }

    #[test]
    fn test_find_duplicates_orders_by_first_occurrence() {
        let groups = find_duplicates(["b", "a", "B", "a", "c", ""], |v| v.to_lowercase());
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(groups[0].rows, vec![0, 2]);
        assert_eq!(groups[0].spellings, vec!["b", "B"]);
    }

    #[test]
    fn test_empty_cells_are_ignored() {
        let groups = find_duplicates(["", "", " "], normalize_doi);
        assert!(groups.is_empty());
    }
}
