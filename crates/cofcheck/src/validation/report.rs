//! Per-command check reports.

use serde::{Deserialize, Serialize};

use super::finding::{Finding, FindingKind, Severity};

/// Counts of findings by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl FindingCounts {
    fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Error => counts.error += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

/// Everything one check found, collected before anything is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Command name of the check, e.g. `unique-dois`.
    pub check: String,
    /// Whether the check passed (no warning or error findings).
    pub passed: bool,
    /// One-line outcome.
    pub headline: String,
    /// Findings in the order they were detected.
    pub findings: Vec<Finding>,
    /// Findings by severity.
    pub counts: FindingCounts,
}

impl CheckReport {
    /// Build a report; `success` and `failure` are the two possible headlines.
    pub fn new(check: &str, findings: Vec<Finding>, success: &str, failure: &str) -> Self {
        let passed = !findings.iter().any(|f| f.severity.is_failure());
        Self {
            check: check.to_string(),
            passed,
            headline: if passed { success } else { failure }.to_string(),
            counts: FindingCounts::from_findings(&findings),
            findings,
        }
    }

    /// Findings that fail the check.
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity.is_failure())
    }

    /// Informational findings.
    pub fn notes(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.severity.is_failure())
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    /// Process exit code for this report alone.
    pub fn exit_code(&self) -> u8 {
        if self.passed { 0 } else { 1 }
    }
}
