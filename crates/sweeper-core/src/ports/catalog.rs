//! CatalogSource port - カタログ（オブジェクト一覧）の読み込み
//!
//! # 設計原則
//! - 一度だけ読む（副作用は読み込みのみ）
//! - 順序はそのまま、重複キーもそのまま流す
//! - 壊れていたら全体を失敗にする（部分的な処理はしない）

use async_trait::async_trait;

use crate::domain::{Entry, ParseError};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Entry>, ParseError>;
}
