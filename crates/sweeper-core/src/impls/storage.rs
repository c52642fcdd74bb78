//! object_store 実装 - S3（または互換ストレージ）への fetch / bulk delete
//!
//! # 実装詳細
//! - `ObjectStoreFetcher`: `ObjectStore::get` で中身を取得
//! - `ObjectStoreBulkDelete`: `ObjectStore::delete_stream`（S3 では DeleteObjects）
//! - テストでは `object_store::memory::InMemory` を使う
//!
//! catalog の key は `Path::parse` でそのまま使う（`Path::from` は `~` などを
//! percent-encode してしまい、別の key を指す）。parse できない key
//! （空セグメント、`.`/`..`、制御文字）は削除も取得もしない。

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::ClientOptions;
use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::domain::{FetchError, SinkError};
use crate::ports::{BulkDelete, ContentFetcher};

/// Build an S3 store from configuration. Credentials come from the environment
/// (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`, ...).
pub fn s3_store(storage: &StorageConfig) -> Result<Arc<dyn ObjectStore>, object_store::Error> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(&storage.bucket)
        .with_region(&storage.region)
        .with_allow_http(storage.allow_http)
        .with_client_options(ClientOptions::new().with_timeout(storage.request_timeout));
    if let Some(endpoint) = &storage.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    Ok(Arc::new(builder.build()?))
}

pub struct ObjectStoreFetcher {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreFetcher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContentFetcher for ObjectStoreFetcher {
    async fn fetch(&self, key: &str) -> Result<Bytes, FetchError> {
        debug!(key, "fetching object");
        let transport = |e: object_store::Error| FetchError::Transport {
            key: key.to_string(),
            message: e.to_string(),
        };

        let location = Path::parse(key).map_err(|e| FetchError::Transport {
            key: key.to_string(),
            message: format!("invalid object key: {e}"),
        })?;

        match self.store.get(&location).await {
            Ok(result) => result.bytes().await.map_err(transport),
            Err(object_store::Error::NotFound { .. }) => Err(FetchError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(transport(e)),
        }
    }
}

pub struct ObjectStoreBulkDelete {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBulkDelete {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BulkDelete for ObjectStoreBulkDelete {
    async fn delete_many(&self, keys: &[String]) -> Result<usize, SinkError> {
        let mut deleted = 0;
        let mut failed = 0;
        let mut first_error = None;

        let mut paths = Vec::with_capacity(keys.len());
        for key in keys {
            match Path::parse(key) {
                Ok(path) => paths.push(path),
                Err(e) => {
                    warn!(key = %key, error = %e, "invalid object key, not deleting");
                    failed += 1;
                    first_error.get_or_insert_with(|| format!("invalid object key {key:?}: {e}"));
                }
            }
        }

        let locations =
            futures::stream::iter(paths.into_iter().map(Ok::<_, object_store::Error>)).boxed();
        let mut results = self.store.delete_stream(locations);
        while let Some(result) = results.next().await {
            match result {
                Ok(_) => deleted += 1,
                Err(e) => {
                    warn!(error = %e, "delete failed");
                    failed += 1;
                    first_error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        match first_error {
            None => Ok(deleted),
            Some(message) if deleted == 0 => Err(SinkError::Transport(message)),
            Some(message) => Err(SinkError::Partial {
                requested: keys.len(),
                failed,
                message,
            }),
        }
    }
}
