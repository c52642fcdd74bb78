//! Errors - エラー型と分類
//!
//! 実行中のエラーは「致命的か否か」で扱いが分かれます。
//!
//! # 分類
//! - [`ParseError`]: カタログが読めない / 壊れている（致命的、dispatch 前に中断）
//! - [`FetchError`]: entry 単位の取得失敗（非致命的、その entry は Reject）
//! - [`SinkError`]: batch 単位の削除失敗（非致命的、次の batch は続行）
//! - internal fault: 分類タスクの panic（非致命的、Reject として集計）

use std::path::PathBuf;

use thiserror::Error;

/// ParseError はカタログ読み込みの失敗
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog listing: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog entry #{index} has an empty key")]
    EmptyKey { index: usize },
}

/// FetchError は 1 entry の content 取得失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("failed to fetch {key}: {message}")]
    Transport { key: String, message: String },
}

impl FetchError {
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } | Self::Transport { key, .. } => key,
        }
    }
}

/// SinkError は 1 batch の bulk-delete 失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("bulk delete transport failure: {0}")]
    Transport(String),

    #[error("bulk delete failed for {failed} of {requested} keys: {message}")]
    Partial {
        requested: usize,
        failed: usize,
        message: String,
    },
}

/// ConfigError は RunConfiguration の読み込み・検証エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
