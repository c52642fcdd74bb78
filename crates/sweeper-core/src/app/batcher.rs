//! Batcher - 結果ストリームを固定サイズの batch にまとめる
//!
//! 読み手はひとつだけの逐次処理なので、ワーカープールの非決定性とは切り離して
//! テストできる（`push` / `finish` は同期・純粋）。

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::{Batch, ClassificationResult};

pub struct Batcher {
    size: usize,
    pending: Vec<ClassificationResult>,
}

impl Batcher {
    /// A `size` of 0 is treated as 1.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            pending: Vec::with_capacity(size),
        }
    }

    /// Add one result; returns a full batch once `size` results are pending.
    pub fn push(&mut self, result: ClassificationResult) -> Option<Batch> {
        self.pending.push(result);
        if self.pending.len() < self.size {
            return None;
        }
        Batch::from_members(std::mem::replace(
            &mut self.pending,
            Vec::with_capacity(self.size),
        ))
    }

    /// Flush whatever is pending. `None` if nothing is.
    pub fn finish(self) -> Option<Batch> {
        Batch::from_members(self.pending)
    }

    /// Drain `results` until it closes, forwarding batches to `batches`.
    /// Returns the number of batches emitted.
    pub async fn run(
        mut self,
        mut results: mpsc::Receiver<ClassificationResult>,
        batches: mpsc::Sender<Batch>,
    ) -> usize {
        let mut emitted = 0;
        while let Some(result) = results.recv().await {
            if let Some(batch) = self.push(result) {
                debug!(size = batch.len(), "batch full");
                if batches.send(batch).await.is_err() {
                    warn!("batch channel closed, stopping batcher");
                    return emitted;
                }
                emitted += 1;
            }
        }

        if let Some(batch) = self.finish() {
            debug!(size = batch.len(), "flushing final batch");
            if batches.send(batch).await.is_err() {
                warn!("batch channel closed before final batch");
                return emitted;
            }
            emitted += 1;
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Evidence;
    use rstest::rstest;

    fn result(i: usize) -> ClassificationResult {
        ClassificationResult::new(format!("k{i}"), Evidence::Extension)
    }

    fn batch_all(n: usize, size: usize) -> Vec<Batch> {
        let mut batcher = Batcher::new(size);
        let mut out: Vec<Batch> = (0..n).filter_map(|i| batcher.push(result(i))).collect();
        out.extend(batcher.finish());
        out
    }

    #[rstest]
    #[case::none(0, 20, vec![])]
    #[case::one(1, 20, vec![1])]
    #[case::exactly_full(20, 20, vec![20])]
    #[case::one_over(21, 20, vec![20, 1])]
    #[case::forty_five(45, 20, vec![20, 20, 5])]
    #[case::size_one(3, 1, vec![1, 1, 1])]
    fn batch_sizes(#[case] n: usize, #[case] size: usize, #[case] expected: Vec<usize>) {
        let sizes: Vec<usize> = batch_all(n, size).iter().map(Batch::len).collect();
        assert_eq!(sizes, expected);
    }

    #[test]
    fn order_within_stream_is_kept() {
        let batches = batch_all(5, 2);
        let keys: Vec<String> = batches.iter().flat_map(|b| b.keys()).collect();
        assert_eq!(keys, vec!["k0", "k1", "k2", "k3", "k4"]);
    }

    #[test]
    fn zero_size_behaves_like_one() {
        assert_eq!(batch_all(2, 0).len(), 2);
    }

    #[tokio::test]
    async fn run_flushes_partial_batch_on_close() {
        let (tx, rx) = mpsc::channel(4);
        let (batch_tx, mut batch_rx) = mpsc::channel(4);
        let handle = tokio::spawn(Batcher::new(3).run(rx, batch_tx));

        for i in 0..7 {
            tx.send(result(i)).await.unwrap();
        }
        drop(tx);

        let mut sizes = Vec::new();
        while let Some(batch) = batch_rx.recv().await {
            sizes.push(batch.len());
        }
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(handle.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn run_with_no_results_emits_nothing() {
        let (tx, rx) = mpsc::channel::<ClassificationResult>(1);
        let (batch_tx, mut batch_rx) = mpsc::channel(1);
        drop(tx);

        let emitted = Batcher::new(20).run(rx, batch_tx).await;
        assert_eq!(emitted, 0);
        assert!(batch_rx.recv().await.is_none());
    }
}
