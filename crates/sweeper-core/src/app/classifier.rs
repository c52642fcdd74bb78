//! Classifier - entry ごとの削除判定
//!
//! # 判定順（安いものから）
//! 1. 除外拡張子 → Reject（I/O なし、年齢より優先。大文字小文字は区別しない）
//! 2. `now - max_age` より厳密に古くなければ → Reject
//! 3. 拡張子が対象フォーマットと完全一致（`png`）→ Qualify（取得なし）
//! 4. それ以外（拡張子があいまい。`PNG` のように大文字小文字が違うものも含む）
//!    - dry-run: Qualify（取得しない。レポートは概算扱い = `Evidence::Assumed`）
//!    - 実行モード: 中身を取得して decode できれば Qualify、できなければ Reject
//!
//! 取得失敗は Reject（不確かなものは消さない）。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RunConfiguration;
use crate::domain::{ClassificationResult, Entry, Evidence, FetchError, RejectReason, Verdict};
use crate::ports::{Clock, ContentFetcher, ContentProbe};

pub struct Classifier {
    config: Arc<RunConfiguration>,
    clock: Arc<dyn Clock>,
    fetcher: Option<Arc<dyn ContentFetcher>>,
    probe: Arc<dyn ContentProbe>,
}

impl Classifier {
    /// `fetcher` may be `None` in dry-run, where content is never fetched.
    pub fn new(
        config: Arc<RunConfiguration>,
        clock: Arc<dyn Clock>,
        fetcher: Option<Arc<dyn ContentFetcher>>,
        probe: Arc<dyn ContentProbe>,
    ) -> Self {
        Self {
            config,
            clock,
            fetcher,
            probe,
        }
    }

    pub async fn classify(&self, entry: &Entry) -> Verdict {
        let ext = entry.extension();

        if let Some(ext) = ext
            && self.config.is_excluded(ext)
        {
            return Verdict::Reject(RejectReason::ExcludedExtension);
        }

        if !self.is_old_enough(entry) {
            return Verdict::Reject(RejectReason::TooRecent);
        }

        if let Some(ext) = ext
            && self.config.target_format.extensions().contains(&ext)
        {
            return qualify(entry, Evidence::Extension);
        }

        if self.config.dry_run {
            return qualify(entry, Evidence::Assumed);
        }

        self.sniff(entry).await
    }

    /// Strictly older than `now - max_age`.
    fn is_old_enough(&self, entry: &Entry) -> bool {
        match self.clock.now().checked_sub_signed(self.config.max_age_delta()) {
            Some(cutoff) => entry.last_modified < cutoff,
            None => false,
        }
    }

    async fn sniff(&self, entry: &Entry) -> Verdict {
        let Some(fetcher) = &self.fetcher else {
            return fetch_failed(FetchError::Transport {
                key: entry.key.clone(),
                message: "no content fetcher configured".to_string(),
            });
        };

        match fetcher.fetch(&entry.key).await {
            Ok(bytes) if self.probe.matches(&bytes) => {
                debug!(key = %entry.key, size = bytes.len(), "content matches target format");
                qualify(entry, Evidence::ContentVerified)
            }
            Ok(_) => Verdict::Reject(RejectReason::NotTargetContent),
            Err(e) => fetch_failed(e),
        }
    }
}

fn qualify(entry: &Entry, evidence: Evidence) -> Verdict {
    Verdict::Qualify(ClassificationResult::new(entry.key.clone(), evidence))
}

fn fetch_failed(error: FetchError) -> Verdict {
    warn!(key = %error.key(), error = %error, "fetch failed, keeping object");
    Verdict::Reject(RejectReason::FetchFailed(error))
}
