//! PipelineBuilder - パイプラインの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に RunConfiguration を検証
//! - 実行モード（dry-run ではない）では fetcher と deleter が必須
//! - 不足があれば BuildError を返す（実行を始めてから気づかない）
//!
//! 省略時の既定:
//! - catalog: `JsonFileCatalog::new(config.catalog_path)`
//! - clock: `SystemClock`
//! - probe: `ImageProbe::new(config.target_format)`

use std::sync::Arc;

use super::classifier::Classifier;
use super::pipeline::Pipeline;
use super::sink::BatchSink;
use crate::config::RunConfiguration;
use crate::domain::ConfigError;
use crate::impls::{ImageProbe, JsonFileCatalog};
use crate::ports::{BulkDelete, CatalogSource, Clock, ContentFetcher, ContentProbe, SystemClock};

/// BuildError はパイプライン構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("missing {0}: it is required when dry_run is false")]
    MissingForExecute(&'static str),
}

/// # 使用例
/// ```ignore
/// let pipeline = PipelineBuilder::new(config)
///     .fetcher(Arc::new(ObjectStoreFetcher::new(store.clone())))
///     .deleter(Arc::new(ObjectStoreBulkDelete::new(store)))
///     .build()?;
/// let summary = pipeline.run().await?;
/// ```
pub struct PipelineBuilder {
    config: RunConfiguration,
    catalog: Option<Arc<dyn CatalogSource>>,
    clock: Option<Arc<dyn Clock>>,
    fetcher: Option<Arc<dyn ContentFetcher>>,
    probe: Option<Arc<dyn ContentProbe>>,
    deleter: Option<Arc<dyn BulkDelete>>,
}

impl PipelineBuilder {
    pub fn new(config: RunConfiguration) -> Self {
        Self {
            config,
            catalog: None,
            clock: None,
            fetcher: None,
            probe: None,
            deleter: None,
        }
    }

    pub fn catalog(mut self, catalog: Arc<dyn CatalogSource>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn ContentProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn deleter(mut self, deleter: Arc<dyn BulkDelete>) -> Self {
        self.deleter = Some(deleter);
        self
    }

    pub fn build(self) -> Result<Pipeline, BuildError> {
        self.config.validate()?;

        let sink = match (self.config.dry_run, self.deleter) {
            (true, _) => BatchSink::dry_run(),
            (false, Some(deleter)) => BatchSink::execute(deleter),
            (false, None) => return Err(BuildError::MissingForExecute("deleter")),
        };
        if !self.config.dry_run && self.fetcher.is_none() {
            return Err(BuildError::MissingForExecute("fetcher"));
        }

        let catalog = self.catalog.unwrap_or_else(|| {
            Arc::new(JsonFileCatalog::new(self.config.catalog_path.clone())) as Arc<dyn CatalogSource>
        });
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let probe = self.probe.unwrap_or_else(|| {
            Arc::new(ImageProbe::new(self.config.target_format)) as Arc<dyn ContentProbe>
        });

        let config = Arc::new(self.config);
        let classifier = Classifier::new(Arc::clone(&config), clock, self.fetcher, probe);

        Ok(Pipeline {
            config,
            catalog,
            classifier: Arc::new(classifier),
            sink,
        })
    }
}
