//! sweeper - delete stale target images listed in a bucket catalog
//!
//! ```text
//! sweeper                      # dry-run (default): report what would be deleted
//! sweeper --dryrun=false       # delete
//! sweeper --config ./prod.toml
//! ```
//!
//! The run summary is printed as JSON on stdout; logs go to stderr (`RUST_LOG`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sweeper_core::config::RunConfiguration;
use sweeper_core::impls::{ObjectStoreBulkDelete, ObjectStoreFetcher, s3_store};
use sweeper_core::PipelineBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sweeper", version, about, long_about = None)]
struct Cli {
    /// Report what would be deleted without deleting anything.
    /// Overrides `dry_run` from the config file / env (which defaults to true)
    #[arg(long = "dryrun", action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    dryrun: Option<bool>,

    /// TOML configuration file (defaults to ./sweeper.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut RunConfiguration) {
        if let Some(dry_run) = self.dryrun {
            config.dry_run = dry_run;
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // (A) 設定: defaults → TOML → env → --dryrun（指定時のみ）
    let mut config =
        RunConfiguration::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    // (B) ストレージ。dry-run でバケット未設定ならネットワークに触らない
    let mut builder = PipelineBuilder::new(config.clone());
    if !config.storage.bucket.is_empty() {
        let store = s3_store(&config.storage).context("failed to build object store client")?;
        builder = builder
            .fetcher(Arc::new(ObjectStoreFetcher::new(Arc::clone(&store))))
            .deleter(Arc::new(ObjectStoreBulkDelete::new(store)));
    } else {
        info!("no bucket configured, running without storage access");
    }

    // (C) 実行
    let pipeline = builder.build().context("invalid configuration")?;
    let summary = pipeline
        .run()
        .await
        .with_context(|| format!("sweep aborted (catalog: {})", config.catalog_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["sweeper"]).unwrap();
        assert_eq!(cli.dryrun, None);
        assert!(cli.config.is_none());

        let mut config = RunConfiguration::default();
        cli.apply_overrides(&mut config);
        assert!(config.dry_run);

        let mut config = RunConfiguration {
            dry_run: false,
            ..Default::default()
        };
        cli.apply_overrides(&mut config);
        assert!(!config.dry_run);
    }

    #[test]
    fn dryrun_accepts_explicit_values() {
        let cli = Cli::try_parse_from(["sweeper", "--dryrun=false"]).unwrap();
        assert_eq!(cli.dryrun, Some(false));
        let cli = Cli::try_parse_from(["sweeper", "--dryrun", "false"]).unwrap();
        assert_eq!(cli.dryrun, Some(false));
        let cli = Cli::try_parse_from(["sweeper", "--dryrun"]).unwrap();
        assert_eq!(cli.dryrun, Some(true));
    }

    #[test]
    fn explicit_flag_overrides_config() {
        let mut config = RunConfiguration {
            dry_run: false,
            ..Default::default()
        };
        Cli::try_parse_from(["sweeper", "--dryrun"])
            .unwrap()
            .apply_overrides(&mut config);
        assert!(config.dry_run);

        let mut config = RunConfiguration::default();
        Cli::try_parse_from(["sweeper", "--dryrun=false"])
            .unwrap()
            .apply_overrides(&mut config);
        assert!(!config.dry_run);
    }

    #[test]
    fn config_path_is_parsed() {
        let cli = Cli::try_parse_from(["sweeper", "-c", "prod.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("prod.toml")));
    }
}
