//! JsonFileCatalog - `list-objects` の JSON 出力を読むカタログ
//!
//! # 使用例
//! ```ignore
//! let catalog = JsonFileCatalog::new("results.json");
//! let entries = catalog.load().await?;
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{Entry, Listing, ParseError};
use crate::ports::CatalogSource;

pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse a listing document and check that every key is non-empty.
    pub fn parse(bytes: &[u8]) -> Result<Vec<Entry>, ParseError> {
        let listing: Listing = serde_json::from_slice(bytes)?;
        if let Some(index) = listing.contents.iter().position(|e| e.key.is_empty()) {
            return Err(ParseError::EmptyKey { index });
        }
        Ok(listing.contents)
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> Result<Vec<Entry>, ParseError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| ParseError::Io {
                path: self.path.clone(),
                source,
            })?;
        let entries = Self::parse(&bytes)?;
        info!(path = %self.path.display(), entries = entries.len(), "catalog loaded");
        Ok(entries)
    }
}

/// Catalog that is already in memory.
pub struct StaticCatalog {
    entries: Vec<Entry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Vec<Entry>, ParseError> {
        if let Some(index) = self.entries.iter().position(|e| e.key.is_empty()) {
            return Err(ParseError::EmptyKey { index });
        }
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LISTING: &str = r#"{
        "Contents": [
            { "Key": "b.png", "LastModified": "2023-01-01T00:00:00Z", "Size": 10 },
            { "Key": "a.pdf", "LastModified": "2023-01-01T00:00:00Z", "Size": 20 },
            { "Key": "b.png", "LastModified": "2023-01-02T00:00:00Z", "Size": 30 }
        ]
    }"#;

    #[tokio::test]
    async fn load_keeps_order_and_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LISTING.as_bytes()).unwrap();

        let entries = JsonFileCatalog::new(file.path()).load().await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b.png", "a.pdf", "b.png"]);
        assert_eq!(entries[2].size, 30);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileCatalog::new(dir.path().join("missing.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = JsonFileCatalog::parse(b"{\"Contents\": [ {\"Key\": 1} ]}").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));

        let err = JsonFileCatalog::parse(b"not json").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn empty_key_is_rejected() {
        let json = br#"{"Contents": [
            { "Key": "ok", "LastModified": "2023-01-01T00:00:00Z" },
            { "Key": "", "LastModified": "2023-01-01T00:00:00Z" }
        ]}"#;
        let err = JsonFileCatalog::parse(json).unwrap_err();
        assert!(matches!(err, ParseError::EmptyKey { index: 1 }));
    }

    #[tokio::test]
    async fn static_catalog_checks_keys_too() {
        let at = chrono::Utc::now();
        let catalog = StaticCatalog::new(vec![Entry::new("", at)]);
        assert!(matches!(catalog.load().await, Err(ParseError::EmptyKey { index: 0 })));
    }
}
