//! Domain model (entries, verdicts, batches, summary, errors).
//!
//! ドメイン層は I/O を持たない純粋な型だけを置く:
//! - entry: カタログの 1 要素と listing 全体
//! - verdict: 分類結果（Qualify / Reject）
//! - batch: Sink に渡す上限付きのまとまり
//! - summary: 実行結果の集計
//! - errors: エラー型

pub mod batch;
pub mod entry;
pub mod errors;
pub mod summary;
pub mod verdict;

pub use batch::Batch;
pub use entry::{Entry, Listing, Owner};
pub use errors::{ConfigError, FetchError, ParseError, SinkError};
pub use summary::{RejectCounts, RunSummary};
pub use verdict::{ClassificationResult, Evidence, RejectReason, Verdict};
