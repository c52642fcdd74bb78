//! Run summary: the counters reported to the operator at the end of a run.

use serde::{Deserialize, Serialize};

use super::verdict::RejectReason;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectCounts {
    pub excluded_extension: usize,
    pub too_recent: usize,
    pub not_target_content: usize,
    pub fetch_failed: usize,
    pub internal_fault: usize,
}

impl RejectCounts {
    pub fn record(&mut self, reason: &RejectReason) {
        match reason {
            RejectReason::ExcludedExtension => self.excluded_extension += 1,
            RejectReason::TooRecent => self.too_recent += 1,
            RejectReason::NotTargetContent => self.not_target_content += 1,
            RejectReason::FetchFailed(_) => self.fetch_failed += 1,
            RejectReason::InternalFault(_) => self.internal_fault += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.excluded_extension
            + self.too_recent
            + self.not_target_content
            + self.fetch_failed
            + self.internal_fault
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub dry_run: bool,

    pub entries_read: usize,
    pub tasks_spawned: usize,

    pub qualified: usize,
    /// Qualified in dry-run without content verification.
    pub approximate: usize,
    pub rejected: RejectCounts,
    pub peak_concurrency: usize,

    pub batches_emitted: usize,
    pub batches_applied: usize,
    pub batches_failed: usize,

    /// Execute mode only.
    pub keys_deleted: usize,
    /// Dry-run only.
    pub keys_reported: usize,
}

impl RunSummary {
    /// Non-fatal problems worth surfacing in the exit report.
    pub fn has_failures(&self) -> bool {
        self.rejected.fetch_failed > 0 || self.rejected.internal_fault > 0 || self.batches_failed > 0
    }
}
