//! sweeper-core
//!
//! Object catalog sweeper: classify the entries of a bucket listing and delete
//! the stale target images in fixed-size batches.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Entry, Verdict, Batch, RunSummary, errors）
//! - **ports**: 抽象化レイヤー（CatalogSource, ContentFetcher, ContentProbe, BulkDelete, Clock）
//! - **app**: アプリケーションロジック（builder, classifier, dispatcher, batcher, sink, pipeline）
//! - **impls**: 実装（JSON catalog, object_store adapter, image probe）
//! - **config**: 設定の読み込み（defaults → TOML → env）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

#[cfg(test)]
mod testing;

pub use app::{Pipeline, PipelineBuilder};
pub use config::RunConfiguration;
pub use domain::RunSummary;
