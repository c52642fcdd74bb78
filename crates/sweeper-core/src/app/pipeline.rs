//! Pipeline - カタログ読み込みから削除までの 1 回の実行
//!
//! # フェーズ（この順に完了する）
//! 1. CatalogSource::load()（失敗したら何もせず中断）
//! 2. Dispatcher で全 entry を分類し join
//! 3. Batcher が結果チャネルを読み切る
//! 4. BatchSink が最後の batch を処理し終える
//!
//! 2〜4 はチャネルでつながって並行に進むが、完了順は上の通り。

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use super::batcher::Batcher;
use super::classifier::Classifier;
use super::dispatcher::{DispatchHandle, Dispatcher};
use super::gate::AdmissionGate;
use super::sink::{BatchSink, SinkOutcome};
use crate::config::RunConfiguration;
use crate::domain::{ParseError, RunSummary};
use crate::ports::CatalogSource;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("pipeline stage did not complete: {0}")]
    Join(String),
}

pub struct Pipeline {
    pub(crate) config: Arc<RunConfiguration>,
    pub(crate) catalog: Arc<dyn CatalogSource>,
    pub(crate) classifier: Arc<Classifier>,
    pub(crate) sink: BatchSink,
}

impl Pipeline {
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let entries = self.catalog.load().await?;

        let mut summary = RunSummary {
            dry_run: self.config.dry_run,
            entries_read: entries.len(),
            ..Default::default()
        };
        info!(
            entries = entries.len(),
            concurrency = self.config.concurrency,
            batch_size = self.config.batch_size,
            dry_run = self.config.dry_run,
            "sweep started"
        );

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.classifier),
            AdmissionGate::new(self.config.concurrency),
            self.config.channel_capacity(),
        );
        let DispatchHandle { results, join } = dispatcher.spawn(entries);

        let (batch_tx, mut batches) = mpsc::channel(1);
        let batcher = tokio::spawn(Batcher::new(self.config.batch_size).run(results, batch_tx));

        let mut index = 0;
        while let Some(batch) = batches.recv().await {
            index += 1;
            match self.sink.apply(&batch).await {
                Ok(SinkOutcome::Reported(n)) => {
                    summary.batches_applied += 1;
                    summary.keys_reported += n;
                }
                Ok(SinkOutcome::Deleted(n)) => {
                    summary.batches_applied += 1;
                    summary.keys_deleted += n;
                }
                Err(e) => {
                    error!(batch = index, size = batch.len(), error = %e, "batch failed, continuing");
                    summary.batches_failed += 1;
                }
            }
        }

        let report = join
            .await
            .map_err(|e| PipelineError::Join(format!("dispatcher: {e}")))?;
        summary.batches_emitted = batcher
            .await
            .map_err(|e| PipelineError::Join(format!("batcher: {e}")))?;

        summary.tasks_spawned = report.spawned;
        summary.qualified = report.qualified;
        summary.approximate = report.approximate;
        summary.rejected = report.rejected;
        summary.peak_concurrency = report.peak_concurrency;

        info!(
            qualified = summary.qualified,
            batches = summary.batches_emitted,
            failed_batches = summary.batches_failed,
            fetch_failures = summary.rejected.fetch_failed,
            internal_faults = summary.rejected.internal_fault,
            "sweep finished"
        );
        Ok(summary)
    }
}
