//! ContentProbe port - 取得したバイト列が対象フォーマットか判定
//!
//! 純粋関数（I/O なし）。

pub trait ContentProbe: Send + Sync {
    /// True iff `bytes` decode as the target format.
    fn matches(&self, bytes: &[u8]) -> bool;
}
