//! The loaded database, shared read-only by every check.

use std::collections::HashSet;

use tracing::debug;

use super::exceptions::ExceptionList;
use super::framework::{DUPLICATE_COLUMN, FRAMEWORK_ID_COLUMN, FrameworkRecord, NAME_COLUMN};
use super::paper::{DOI_COLUMN, PAPER_ID_COLUMN, PaperRecord};
use crate::config::CheckConfig;
use crate::error::Result;
use crate::input::{DataTable, TableReader};

/// Frameworks, discarded frameworks and papers, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct Database {
    /// Active frameworks.
    pub frameworks: Vec<FrameworkRecord>,
    /// Discarded frameworks (disjoint ids, exempt from structure comparison).
    pub discarded: Vec<FrameworkRecord>,
    /// Literature references.
    pub papers: Vec<PaperRecord>,
    /// Id pairs allowed to share a structure-graph hash.
    pub exceptions: ExceptionList,
}

impl Database {
    /// Build a database from already-constructed records.
    pub fn new(
        frameworks: Vec<FrameworkRecord>,
        discarded: Vec<FrameworkRecord>,
        papers: Vec<PaperRecord>,
    ) -> Self {
        Self {
            frameworks,
            discarded,
            papers,
            exceptions: ExceptionList::default(),
        }
    }

    /// Attach the curated exception list.
    pub fn with_exceptions(mut self, exceptions: ExceptionList) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Load every table named by `config`.
    ///
    /// Any missing or malformed table is an error; the checks are meaningless
    /// on a partial database. A missing exception file is an empty list.
    pub fn load(config: &CheckConfig) -> Result<Self> {
        let reader = TableReader::new();

        let frameworks = reader.read_file(config.frameworks_path())?;
        let discarded = reader.read_file(config.discarded_path())?;
        let papers = reader.read_file(config.papers_path())?;

        let exceptions_path = config.exceptions_path();
        let exceptions = if exceptions_path.is_file() {
            ExceptionList::load(&exceptions_path)?
        } else {
            debug!(path = %exceptions_path.display(), "no structure exception list");
            ExceptionList::default()
        };

        Ok(Self::from_tables(&frameworks, &discarded, &papers)?.with_exceptions(exceptions))
    }

    /// Convert raw tables into typed records.
    pub fn from_tables(
        frameworks: &DataTable,
        discarded: &DataTable,
        papers: &DataTable,
    ) -> Result<Self> {
        let frameworks = framework_records(frameworks, true)?;
        let discarded = framework_records(discarded, false)?;
        let papers = paper_records(papers)?;

        debug!(
            frameworks = frameworks.len(),
            discarded = discarded.len(),
            papers = papers.len(),
            "database loaded"
        );

        Ok(Self::new(frameworks, discarded, papers))
    }

    /// Ids of active then discarded frameworks, in table order.
    pub fn all_framework_ids(&self) -> impl Iterator<Item = &str> {
        self.frameworks
            .iter()
            .chain(self.discarded.iter())
            .map(|r| r.id.as_str())
    }

    /// Set of discarded ids.
    pub fn discarded_ids(&self) -> HashSet<&str> {
        self.discarded.iter().map(|r| r.id.as_str()).collect()
    }

    /// All active records with the given id (more than one means the table is broken).
    pub fn active_by_id(&self, id: &str) -> Vec<&FrameworkRecord> {
        self.frameworks.iter().filter(|r| r.id == id).collect()
    }
}

/// Read framework records; `strict` requires the name and duplicate columns.
fn framework_records(table: &DataTable, strict: bool) -> Result<Vec<FrameworkRecord>> {
    let ids = table.require_column(FRAMEWORK_ID_COLUMN)?;

    let (names, duplicates) = if strict {
        (
            Some(table.require_column(NAME_COLUMN)?),
            Some(table.require_column(DUPLICATE_COLUMN)?),
        )
    } else {
        (
            table.column_by_name(NAME_COLUMN),
            table.column_by_name(DUPLICATE_COLUMN),
        )
    };

    let records = ids
        .iter()
        .enumerate()
        .map(|(row, id)| {
            let name = names.as_ref().map(|n| n[row]).unwrap_or("");
            let duplicate = duplicates
                .as_ref()
                .map(|d| d[row])
                .unwrap_or(super::framework::NO_DUPLICATE);
            FrameworkRecord::new(*id, name, duplicate)
        })
        .collect();

    Ok(records)
}

fn paper_records(table: &DataTable) -> Result<Vec<PaperRecord>> {
    let dois = table.require_column(DOI_COLUMN)?;
    let paper_ids = table.require_column(PAPER_ID_COLUMN)?;

    Ok(dois
        .into_iter()
        .zip(paper_ids)
        .map(|(doi, paper_id)| PaperRecord::new(doi, paper_id))
        .collect())
}
