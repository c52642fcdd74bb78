//! Dispatcher - 上限付きワーカープール
//!
//! # フロー
//! 1. entry ごとに 1 タスクを `JoinSet` に spawn
//! 2. 各タスクは [`AdmissionGate`] の slot を取ってから classify、終わったら返す
//! 3. Qualify は結果チャネル（mpsc）へ送る。書き手は多数、読み手は Batcher ひとつ
//! 4. 全タスクの join が終わったら最後の sender を drop → チャネルが一度だけ閉じる
//!
//! # 障害の封じ込め
//! classify 中の panic はタスク境界で `catch_unwind` し、`RejectReason::InternalFault`
//! として数える。join に失敗したタスクも同様。プールも join barrier も止まらない。
//!
//! 結果の順序は保証しない（削除は集合演算なので）。

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

use super::classifier::Classifier;
use super::gate::AdmissionGate;
use crate::domain::{ClassificationResult, Entry, RejectCounts, RejectReason, Verdict};

/// What the dispatch phase observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub spawned: usize,
    pub qualified: usize,
    pub approximate: usize,
    pub rejected: RejectCounts,
    pub peak_concurrency: usize,
}

impl DispatchReport {
    fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Qualify(result) => {
                self.qualified += 1;
                if result.is_approximate() {
                    self.approximate += 1;
                }
            }
            Verdict::Reject(reason) => self.rejected.record(reason),
        }
    }
}

/// Output of [`Dispatcher::spawn`].
///
/// `results` closes after every classification task has finished;
/// `join` resolves to the report at the same point.
pub struct DispatchHandle {
    pub results: mpsc::Receiver<ClassificationResult>,
    pub join: JoinHandle<DispatchReport>,
}

pub struct Dispatcher {
    classifier: Arc<Classifier>,
    gate: AdmissionGate,
    channel_capacity: usize,
}

impl Dispatcher {
    pub fn new(classifier: Arc<Classifier>, gate: AdmissionGate, channel_capacity: usize) -> Self {
        Self {
            classifier,
            gate,
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Start classifying `entries` in the background.
    pub fn spawn(self, entries: Vec<Entry>) -> DispatchHandle {
        let (tx, results) = mpsc::channel(self.channel_capacity);
        let join = tokio::spawn(self.run(entries, tx));
        DispatchHandle { results, join }
    }

    async fn run(self, entries: Vec<Entry>, tx: mpsc::Sender<ClassificationResult>) -> DispatchReport {
        let mut tasks = JoinSet::new();
        for entry in entries {
            tasks.spawn(classify_one(
                entry,
                Arc::clone(&self.classifier),
                self.gate.clone(),
                tx.clone(),
            ));
        }
        // from here on only the tasks hold senders
        drop(tx);

        let mut report = DispatchReport {
            spawned: tasks.len(),
            ..Default::default()
        };
        info!(tasks = report.spawned, capacity = self.gate.capacity(), "dispatching");

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(verdict) => report.record(&verdict),
                Err(e) => {
                    error!(error = %e, "classification task did not complete");
                    report.rejected.record(&RejectReason::InternalFault(e.to_string()));
                }
            }
        }

        report.peak_concurrency = self.gate.peak();
        info!(
            qualified = report.qualified,
            rejected = report.rejected.total(),
            peak = report.peak_concurrency,
            "dispatch finished"
        );
        report
    }
}

async fn classify_one(
    entry: Entry,
    classifier: Arc<Classifier>,
    gate: AdmissionGate,
    tx: mpsc::Sender<ClassificationResult>,
) -> Verdict {
    let admission = match gate.acquire().await {
        Ok(admission) => admission,
        Err(e) => return Verdict::Reject(RejectReason::InternalFault(e.to_string())),
    };

    let verdict = match AssertUnwindSafe(classifier.classify(&entry)).catch_unwind().await {
        Ok(verdict) => verdict,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(key = %entry.key, panic = %message, "classification panicked");
            Verdict::Reject(RejectReason::InternalFault(message))
        }
    };
    drop(admission);

    if let Verdict::Qualify(result) = &verdict
        && tx.send(result.clone()).await.is_err()
    {
        warn!(key = %entry.key, "result channel closed, qualifying entry dropped");
    }
    verdict
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
