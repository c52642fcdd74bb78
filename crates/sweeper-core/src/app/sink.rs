//! BatchSink - batch を報告する（dry-run）か一括削除する（実行モード）
//!
//! # 設計原則
//! - dry-run では絶対に削除しない（deleter を持たない）
//! - 実行モードでは 1 batch = 1 回の `BulkDelete::delete_many`
//! - batch ごとに独立。失敗は呼び出し側が記録し、次の batch に進む

use std::sync::Arc;

use tracing::info;

use crate::domain::{Batch, SinkError};
use crate::ports::BulkDelete;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Dry-run: keys were reported, nothing was mutated.
    Reported(usize),
    /// Execute: keys acknowledged by the provider.
    Deleted(usize),
}

enum Mode {
    DryRun,
    Execute(Arc<dyn BulkDelete>),
}

pub struct BatchSink {
    mode: Mode,
}

impl BatchSink {
    pub fn dry_run() -> Self {
        Self { mode: Mode::DryRun }
    }

    pub fn execute(deleter: Arc<dyn BulkDelete>) -> Self {
        Self {
            mode: Mode::Execute(deleter),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self.mode, Mode::DryRun)
    }

    pub async fn apply(&self, batch: &Batch) -> Result<SinkOutcome, SinkError> {
        match &self.mode {
            Mode::DryRun => {
                info!(
                    size = batch.len(),
                    approximate = batch.approximate_count(),
                    keys = ?batch.keys(),
                    "dry-run: would delete"
                );
                for member in batch.members().iter().filter(|m| m.is_approximate()) {
                    info!(
                        key = %member.key,
                        "dry-run: approximate, extension is ambiguous and content was not checked"
                    );
                }
                Ok(SinkOutcome::Reported(batch.len()))
            }
            Mode::Execute(deleter) => {
                let deleted = deleter.delete_many(&batch.keys()).await?;
                info!(size = batch.len(), deleted, "batch deleted");
                Ok(SinkOutcome::Deleted(deleted))
            }
        }
    }
}
