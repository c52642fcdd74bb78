//! Ports - 抽象化レイヤー
//!
//! 外部システム（ファイル、オブジェクトストレージ、時刻）へのインターフェースを定義する。
//! パイプライン本体（app）はこれらの trait だけに依存し、実装は impls に置く。

pub mod bulk_delete;
pub mod catalog;
pub mod clock;
pub mod fetcher;
pub mod probe;

pub use self::bulk_delete::BulkDelete;
pub use self::catalog::CatalogSource;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::fetcher::ContentFetcher;
pub use self::probe::ContentProbe;
