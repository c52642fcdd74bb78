//! BulkDelete port - 複数キーの一括削除
//!
//! # 契約
//! - `keys` は空ではなく、batch_size 以下
//! - 1 回の呼び出しが 1 回の provider リクエスト（batch 内は all-or-nothing を期待）
//! - 成功時は削除したキー数を返す

use async_trait::async_trait;

use crate::domain::SinkError;

#[async_trait]
pub trait BulkDelete: Send + Sync {
    async fn delete_many(&self, keys: &[String]) -> Result<usize, SinkError>;
}
