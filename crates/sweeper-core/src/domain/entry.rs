//! Catalog entries, as they appear in an object-storage listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque owner metadata, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "DisplayName", default)]
    pub display_name: String,

    #[serde(rename = "ID", default)]
    pub id: String,
}

/// One item of the remote catalog.
///
/// Entries are read once from the listing and never mutated afterwards.
/// Field names follow the provider's `list-objects` output (PascalCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "Key")]
    pub key: String,

    #[serde(rename = "LastModified")]
    pub last_modified: DateTime<Utc>,

    #[serde(rename = "Size", default)]
    pub size: u64,

    #[serde(rename = "ETag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(rename = "StorageClass", default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    #[serde(rename = "Owner", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Entry {
    /// Convenience constructor (tests, in-memory catalogs).
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size: 0,
            etag: None,
            storage_class: None,
            owner: None,
        }
    }

    /// Extension of the final path segment, as written in the key.
    ///
    /// `photos/2024/cat.PNG` -> `PNG`, `photos/.hidden` -> `hidden`,
    /// `photos/README` -> `None`, `dir.d/file` -> `None`.
    pub fn extension(&self) -> Option<&str> {
        let name = self.key.rsplit('/').next().unwrap_or(&self.key);
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext)
    }
}

/// The listing document: `{"Contents": [ ... ]}`.
///
/// A listing of an empty bucket omits `Contents` entirely, so it defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "Contents", default)]
    pub contents: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn extension_uses_last_segment_and_keeps_case() {
        assert_eq!(Entry::new("a/b/cat.PNG", at()).extension(), Some("PNG"));
        assert_eq!(Entry::new("report.tar.gz", at()).extension(), Some("gz"));
        assert_eq!(Entry::new("dir.d/file", at()).extension(), None);
        assert_eq!(Entry::new("README", at()).extension(), None);
        assert_eq!(Entry::new("trailing.", at()).extension(), None);
    }

    #[test]
    fn listing_parses_provider_shape() {
        let json = r#"
        {
          "Contents": [
            {
              "Key": "img/a.png",
              "LastModified": "2023-11-02T10:00:00.000Z",
              "ETag": "\"abc\"",
              "Size": 1024,
              "StorageClass": "STANDARD",
              "Owner": { "DisplayName": "ops", "ID": "42" }
            },
            { "Key": "b", "LastModified": "2023-11-02T10:00:00Z" }
          ]
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.contents.len(), 2);
        assert_eq!(listing.contents[0].size, 1024);
        assert_eq!(listing.contents[0].owner.as_ref().unwrap().id, "42");
        assert_eq!(listing.contents[1].etag, None);
    }

    #[test]
    fn listing_without_contents_is_empty() {
        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(listing.contents.is_empty());
    }
}
