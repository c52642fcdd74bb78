//! App - アプリケーション層
//!
//! ports を組み合わせて 1 回の sweep を実行する。
//!
//! # 主要コンポーネント
//! - **PipelineBuilder**: 構築とワイヤリング（起動時検証）
//! - **Pipeline**: load → dispatch → batch → sink
//! - **Classifier**: entry ごとの Qualify / Reject 判定
//! - **Dispatcher**: 上限付きワーカープール（AdmissionGate）
//! - **Batcher**: 結果を固定サイズの batch にまとめる
//! - **BatchSink**: dry-run の報告、または一括削除

pub mod batcher;
pub mod builder;
pub mod classifier;
pub mod dispatcher;
pub mod gate;
pub mod pipeline;
pub mod sink;

pub use self::batcher::Batcher;
pub use self::builder::{BuildError, PipelineBuilder};
pub use self::classifier::Classifier;
pub use self::dispatcher::{DispatchHandle, DispatchReport, Dispatcher};
pub use self::gate::{Admission, AdmissionGate};
pub use self::pipeline::{Pipeline, PipelineError};
pub use self::sink::{BatchSink, SinkOutcome};
