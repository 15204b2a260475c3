//! Property-based tests for the cofcheck checks.
//!
//! Property-based tests verify:
//! 1. **Determinism**: the same database always produces the same report
//! 2. **Normalization**: case and hyphen variants are the same value
//! 3. **Accounting**: every id and every file is reported at most once
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p cofcheck --test property_tests
//! ```

use std::collections::HashSet;
use std::fs;

use proptest::prelude::*;

use cofcheck::validation::{find_duplicates, normalize_doi, normalize_name};
use cofcheck::{
    Check, ConsistentPaperIds, Database, FindingKind, FrameworkRecord, MatchStructureFiles,
    PaperRecord, UniqueDois, UniqueFrameworkNames,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Framework-id-like strings, e.g. `16242C2`.
fn framework_id() -> impl Strategy<Value = String> {
    "[0-9]{5}[A-Z][0-9]"
}

fn doi() -> impl Strategy<Value = String> {
    "10\\.[0-9]{4}/[a-zA-Z0-9.]{1,12}"
}

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 -]{0,15}"
}

fn flip_case(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

// =============================================================================
// Uniqueness
// =============================================================================

proptest! {
    #[test]
    fn prop_doi_check_is_deterministic(dois in prop::collection::vec(doi(), 0..30)) {
        let db = Database::new(
            vec![],
            vec![],
            dois.iter().map(|d| PaperRecord::new(d.as_str(), "p0000")).collect(),
        );
        let first = UniqueDois.run(&db).unwrap();
        let second = UniqueDois.run(&db).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_case_variant_doi_is_duplicate(dois in prop::collection::hash_set(doi(), 1..20)) {
        let normalized: HashSet<String> = dois.iter().map(|d| normalize_doi(d)).collect();
        let mut values: Vec<String> = normalized.into_iter().collect();
        values.sort();
        values.push(flip_case(&values[0]));

        let db = Database::new(
            vec![],
            vec![],
            values.iter().map(|d| PaperRecord::new(d.as_str(), "p0000")).collect(),
        );
        let report = UniqueDois.run(&db).unwrap();

        prop_assert_eq!(report.findings.len(), 1);
        prop_assert_eq!(report.findings[0].kind, FindingKind::DuplicateDoi);
    }

    #[test]
    fn prop_groups_partition_duplicate_rows(values in prop::collection::vec("[a-cA-C]{1,2}", 0..40)) {
        let groups = find_duplicates(values.iter().map(String::as_str), normalize_doi);
        let mut seen_rows = HashSet::new();
        for group in &groups {
            prop_assert!(group.rows.len() > 1);
            for row in &group.rows {
                prop_assert!(seen_rows.insert(*row));
                prop_assert_eq!(normalize_doi(&values[*row]), group.key.clone());
            }
        }
        let distinct: HashSet<_> = values.iter().map(|v| normalize_doi(v)).collect();
        prop_assert_eq!(groups.is_empty(), distinct.len() == values.len());
    }

    #[test]
    fn prop_hyphens_and_spaces_are_equivalent(base in name()) {
        let hyphenated = base.replace(' ', "-");
        prop_assert_eq!(normalize_name(&base), normalize_name(&hyphenated));

        let db = Database::new(
            vec![
                FrameworkRecord::new("00001A1", base.as_str(), "none"),
                FrameworkRecord::new("00002A1", flip_case(&hyphenated), "none"),
            ],
            vec![],
            vec![],
        );
        prop_assert!(!UniqueFrameworkNames.run(&db).unwrap().passed);
    }
}

// =============================================================================
// Cross references and file sets
// =============================================================================

proptest! {
    #[test]
    fn prop_papers_derived_from_ids_are_consistent(
        ids in prop::collection::vec(framework_id(), 1..20),
        discarded in prop::collection::vec(framework_id(), 0..5),
    ) {
        let paper_ids: HashSet<String> = ids
            .iter()
            .chain(discarded.iter())
            .map(|id| format!("p{}", &id[..4]))
            .collect();
        let db = Database::new(
            ids.iter().map(|id| FrameworkRecord::new(id.as_str(), "", "none")).collect(),
            discarded.iter().map(|id| FrameworkRecord::new(id.as_str(), "", "none")).collect(),
            paper_ids.iter().map(|p| PaperRecord::new(format!("10.1/{}", p), p.as_str())).collect(),
        );
        prop_assert!(ConsistentPaperIds.run(&db).unwrap().passed);
    }

    #[test]
    fn prop_file_set_accounting(
        ids in prop::collection::hash_set(framework_id(), 0..12),
        files in prop::collection::hash_set(framework_id(), 0..12),
    ) {
        let dir = tempfile::tempdir().unwrap();
        for file in &files {
            fs::write(dir.path().join(format!("{}.cif", file)), "").unwrap();
        }

        let db = Database::new(
            ids.iter().map(|id| FrameworkRecord::new(id.as_str(), "", "none")).collect(),
            vec![],
            vec![],
        );
        let report = MatchStructureFiles::new(dir.path()).run(&db).unwrap();

        let missing = report.of_kind(FindingKind::MissingStructureFile).count();
        let unreferenced = report.of_kind(FindingKind::UnreferencedStructureFile).count();
        prop_assert_eq!(missing, ids.difference(&files).count());
        prop_assert_eq!(unreferenced, files.difference(&ids).count());
        prop_assert_eq!(report.passed, ids == files);
    }
}
