//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **JsonFileCatalog / StaticCatalog**: CatalogSource
//! - **ImageProbe**: ContentProbe（`image` クレートでヘッダを decode）
//! - **ObjectStoreFetcher / ObjectStoreBulkDelete**: ContentFetcher / BulkDelete（`object_store`）

pub mod image_probe;
pub mod json_catalog;
pub mod storage;

pub use self::image_probe::ImageProbe;
pub use self::json_catalog::{JsonFileCatalog, StaticCatalog};
pub use self::storage::{ObjectStoreBulkDelete, ObjectStoreFetcher, s3_store};
