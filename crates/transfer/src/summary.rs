//! Per-file outcomes and the batch summary.
//!
//! The orchestrator records one [`FileReport`] per selected file, in
//! selection order. [`TransferSummary`] reduces them to the pass/fail decision
//! of the run.

use crate::{FileTransferError, TargetMapping};

/// Result of handling one selected file.
#[derive(Debug)]
pub enum TransferOutcome {
    /// The file was uploaded.
    Uploaded,
    /// The file was skipped because the target already existed.
    ///
    /// Never produced: an existing target with overwrite disabled is a
    /// failure.
    SkippedExists,
    /// The file was not copied.
    Failed {
        /// Why the copy failed.
        reason: FileTransferError,
    },
}

impl TransferOutcome {
    /// Returns `true` for [`TransferOutcome::Failed`].
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one selected file together with its mapping.
#[derive(Debug)]
pub struct FileReport {
    mapping: TargetMapping,
    outcome: TransferOutcome,
}

impl FileReport {
    pub(crate) const fn new(mapping: TargetMapping, outcome: TransferOutcome) -> Self {
        Self { mapping, outcome }
    }

    /// Source and target of the file.
    pub const fn mapping(&self) -> &TargetMapping {
        &self.mapping
    }

    /// What happened to the file.
    pub const fn outcome(&self) -> &TransferOutcome {
        &self.outcome
    }
}

/// Every per-file outcome of a run, in selection order.
#[derive(Debug, Default)]
pub struct TransferSummary {
    reports: Vec<FileReport>,
}

impl TransferSummary {
    pub(crate) fn push(&mut self, report: FileReport) {
        self.reports.push(report);
    }

    /// All reports.
    pub fn reports(&self) -> &[FileReport] {
        &self.reports
    }

    /// Number of files attempted.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Number of files uploaded.
    pub fn uploaded(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| matches!(report.outcome, TransferOutcome::Uploaded))
            .count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Reports of the files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|report| report.outcome.is_failure())
    }

    /// Returns `true` when no file failed.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}
