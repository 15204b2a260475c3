//! Cross-table references: reciprocal duplicate marks and paper ids.

use std::collections::BTreeSet;

use super::check::Check;
use super::finding::{Finding, FindingKind};
use super::report::CheckReport;
use crate::error::Result;
use crate::records::{Database, derive_paper_id};

/// `duplicates-marked-reciprocally`: if A is marked as a duplicate of B, then
/// exactly one row B exists and it is marked as a duplicate of A.
///
/// Only pairwise symmetry is checked; chains are not followed.
pub struct ReciprocalDuplicates;

impl Check for ReciprocalDuplicates {
    fn name(&self) -> &'static str {
        "duplicates-marked-reciprocally"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let mut findings = Vec::new();

        for record in &db.frameworks {
            let Some(duplicate) = record.duplicate_of.as_deref() else {
                continue;
            };

            let rows = db.active_by_id(duplicate);
            match rows.as_slice() {
                [other] => {
                    if other.duplicate_mark() != record.id {
                        findings.push(
                            Finding::error(
                                FindingKind::AsymmetricDuplicateMark,
                                format!(
                                    "Duplicate row {} lists ID {}, expected {}",
                                    duplicate,
                                    other.duplicate_mark(),
                                    record.id
                                ),
                            )
                            .with_subjects([record.id.as_str(), duplicate]),
                        );
                    }
                }
                _ => {
                    findings.push(
                        Finding::error(
                            FindingKind::MissingReciprocalMark,
                            format!(
                                "Found row without reciprocal duplicate mark: {} ({}) is marked as duplicate of {}, which matches {} rows",
                                record.id,
                                record.name,
                                duplicate,
                                rows.len()
                            ),
                        )
                        .with_subjects([record.id.as_str(), duplicate]),
                    );
                }
            }
        }

        Ok(CheckReport::new(
            self.name(),
            findings,
            "Rows marked as duplicates go both ways.",
            "Duplicate marks are not reciprocal.",
        ))
    }
}

/// `consistent-paper-ids`: the paper ids implied by all framework ids equal
/// the paper ids of the papers table.
pub struct ConsistentPaperIds;

impl ConsistentPaperIds {
    /// `p` + first four characters of every active and discarded id.
    pub fn derived_paper_ids(db: &Database) -> BTreeSet<String> {
        db.all_framework_ids().map(derive_paper_id).collect()
    }

    /// Paper ids listed in the papers table.
    pub fn listed_paper_ids(db: &Database) -> BTreeSet<String> {
        db.papers.iter().map(|p| p.paper_id.clone()).collect()
    }
}

impl Check for ConsistentPaperIds {
    fn name(&self) -> &'static str {
        "consistent-paper-ids"
    }

    fn run(&self, db: &Database) -> Result<CheckReport> {
        let derived = Self::derived_paper_ids(db);
        let listed = Self::listed_paper_ids(db);

        let mut findings = Vec::new();
        for id in listed.difference(&derived) {
            findings.push(
                Finding::error(
                    FindingKind::PaperWithoutStructure,
                    format!("Paper ID {} has no associated structure.", id),
                )
                .with_subjects([id.as_str()]),
            );
        }
        for id in derived.difference(&listed) {
            findings.push(
                Finding::error(
                    FindingKind::PaperMissing,
                    format!("Paper ID {} missing in papers table.", id),
                )
                .with_subjects([id.as_str()]),
            );
        }

        Ok(CheckReport::new(
            self.name(),
            findings,
            "Paper IDs are consistent.",
            "Paper IDs are inconsistent.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FrameworkRecord, PaperRecord};

    fn frameworks(rows: &[(&str, &str)]) -> Database {
        Database::new(
            rows.iter()
                .map(|(id, dup)| FrameworkRecord::new(*id, format!("COF {}", id), dup))
                .collect(),
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_reciprocal_marks_pass() {
        let db = frameworks(&[("A", "B"), ("B", "A"), ("C", "none")]);
        let report = ReciprocalDuplicates.run(&db).unwrap();
        assert!(report.passed);
        assert_eq!(report.headline, "Rows marked as duplicates go both ways.");
    }

    #[test]
    fn test_mark_pointing_back_elsewhere() {
        let db = frameworks(&[("A", "B"), ("B", "none")]);
        let report = ReciprocalDuplicates.run(&db).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::AsymmetricDuplicateMark);
        assert_eq!(
            report.findings[0].message,
            "Duplicate row B lists ID none, expected A"
        );

        let db = frameworks(&[("A", "B"), ("B", "C"), ("C", "B")]);
        let report = ReciprocalDuplicates.run(&db).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(
            report.findings[0].message,
            "Duplicate row B lists ID C, expected A"
        );
    }

    #[test]
    fn test_mark_to_absent_row() {
        let db = frameworks(&[("A", "B")]);
        let report = ReciprocalDuplicates.run(&db).unwrap();
        assert!(!report.passed);
        assert_eq!(report.findings[0].kind, FindingKind::MissingReciprocalMark);
        assert!(report.findings[0].message.contains("reciprocal duplicate mark"));
        assert_eq!(report.findings[0].subjects, vec!["A", "B"]);
    }

    #[test]
    fn test_mark_to_ambiguous_row() {
        let db = frameworks(&[("A", "B"), ("B", "A"), ("B", "A")]);
        let report = ReciprocalDuplicates.run(&db).unwrap();
        assert_eq!(report.of_kind(FindingKind::MissingReciprocalMark).count(), 1);
    }

    #[test]
    fn test_mark_comparison_is_case_sensitive() {
        let db = frameworks(&[("A", "b"), ("b", "a")]);
        let report = ReciprocalDuplicates.run(&db).unwrap();
        assert_eq!(report.findings.len(), 2);
    }

    fn paper_db(ids: &[&str], discarded: &[&str], papers: &[&str]) -> Database {
        Database::new(
            ids.iter().map(|id| FrameworkRecord::new(*id, "", "none")).collect(),
            discarded
                .iter()
                .map(|id| FrameworkRecord::new(*id, "", "none"))
                .collect(),
            papers
                .iter()
                .enumerate()
                .map(|(i, p)| PaperRecord::new(format!("10.1/{}", i), *p))
                .collect(),
        )
    }

    #[test]
    fn test_paper_ids_consistent() {
        let db = paper_db(&["1000A1", "1000A2"], &["1000A3"], &["p1000"]);
        assert_eq!(
            ConsistentPaperIds::derived_paper_ids(&db),
            BTreeSet::from(["p1000".to_string()])
        );
        let report = ConsistentPaperIds.run(&db).unwrap();
        assert!(report.passed);
        assert_eq!(report.headline, "Paper IDs are consistent.");
    }

    #[test]
    fn test_paper_without_structure() {
        let db = paper_db(&["1000A1", "1000A2"], &["1000A3"], &["p1000", "p2000"]);
        let report = ConsistentPaperIds.run(&db).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(
            report.findings[0].message,
            "Paper ID p2000 has no associated structure."
        );
    }

    #[test]
    fn test_paper_missing_from_table() {
        let db = paper_db(&["1000A1"], &["2000B1"], &[]);
        let report = ConsistentPaperIds.run(&db).unwrap();
        let subjects: Vec<_> = report
            .of_kind(FindingKind::PaperMissing)
            .flat_map(|f| f.subjects.iter().cloned())
            .collect();
        assert_eq!(subjects, vec!["p1000", "p2000"]);
    }
}
