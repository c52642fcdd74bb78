//! ContentFetcher port - entry の中身を取得
//!
//! 拡張子だけでは判定できない entry を、実行モード（dry-run ではない）でのみ取得する。
//! タイムアウトは実装側（ストレージクライアント）の責務。

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::FetchError;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Bytes, FetchError>;
}
