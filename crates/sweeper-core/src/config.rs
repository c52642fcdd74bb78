//! RunConfiguration - 実行設定
//!
//! 起動時に一度だけ組み立て、以降は読み取り専用で共有する（`Arc<RunConfiguration>`）。
//!
//! # 読み込み順（後勝ち）
//! 1. `RunConfiguration::default()`
//! 2. TOML ファイル（既定は `sweeper.toml`、なければスキップ）
//! 3. `SWEEPER__` で始まる環境変数（`__` で階層を区切る。例: `SWEEPER__STORAGE__BUCKET`）
//!
//! CLI の `--dryrun` はさらにその後で上書きする。

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "sweeper.toml";
pub const ENV_PREFIX: &str = "SWEEPER__";

/// The provider's ceiling for one bulk-delete request.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Content format the sweep targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl TargetFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
        }
    }

    /// Extensions that identify this format without looking at content.
    pub fn extensions(self) -> &'static [&'static str] {
        self.image_format().extensions_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// S3-compatible endpoint (MinIO, LocalStack). `None` means AWS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub allow_http: bool,
    /// Per-request budget for fetch and delete calls.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: None,
            allow_http: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Listing file produced by the provider's `list-objects`.
    pub catalog_path: PathBuf,

    /// Maximum number of classification tasks holding an admission slot.
    pub concurrency: usize,

    /// Maximum number of keys per bulk-delete call.
    pub batch_size: usize,

    /// Entries must be strictly older than `now - max_age` to qualify.
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,

    pub dry_run: bool,

    /// Extensions that are never deleted, checked before anything else.
    pub excluded_extensions: Vec<String>,

    pub target_format: TargetFormat,

    /// Capacity of the result channel between workers and the batcher.
    /// Defaults to `concurrency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_capacity: Option<usize>,

    pub storage: StorageConfig,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("results.json"),
            concurrency: 20,
            batch_size: 20,
            max_age: Duration::from_secs(28 * 24 * 60 * 60),
            dry_run: true,
            excluded_extensions: vec!["pdf".to_string(), "csv".to_string()],
            target_format: TargetFormat::Png,
            channel_capacity: None,
            storage: StorageConfig::default(),
        }
    }
}

impl RunConfiguration {
    /// Load defaults, then the TOML file, then `SWEEPER__*` env vars.
    ///
    /// Does not validate: callers may still override fields (e.g. `dry_run` from the
    /// CLI). `PipelineBuilder::build` validates.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(RunConfiguration::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Invalid(format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }
        if self.channel_capacity == Some(0) {
            return Err(ConfigError::Invalid("channel_capacity must be at least 1".into()));
        }
        if chrono::TimeDelta::from_std(self.max_age).is_err() {
            return Err(ConfigError::Invalid(format!(
                "max_age out of range: {:?}",
                self.max_age
            )));
        }
        if !self.dry_run && self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.bucket is required outside dry-run".into(),
            ));
        }
        Ok(())
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.unwrap_or(self.concurrency)
    }

    /// `max_age` as a chrono delta. Saturates; `validate` rejects out-of-range values.
    pub fn max_age_delta(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::from_std(self.max_age).unwrap_or(chrono::TimeDelta::MAX)
    }

    /// True when `ext` (without the dot) is on the exclusion list, ignoring ASCII case.
    pub fn is_excluded(&self, ext: &str) -> bool {
        self.excluded_extensions
            .iter()
            .any(|x| x.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
