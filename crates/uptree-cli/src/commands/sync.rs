//! Sync command - run one incremental mirror pass
//!
//! Provides the `uptree sync` CLI command which:
//! 1. Loads configuration and applies command-line overrides
//! 2. Builds the glob matcher and the local-directory client
//! 3. Runs the sync engine and displays the operation summary

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use uptree_core::config::{Config, SyncConfig};
use uptree_remote::LocalDirClient;
use uptree_sync::SyncEngine;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Source directory (overrides the config file)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Target directory to mirror into (overrides the config file)
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// State directory (overrides the config file)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Additional include pattern (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    pub includes: Vec<String>,

    /// Additional exclude pattern (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Re-sync every present path regardless of previous state
    #[arg(long)]
    pub full_sync: bool,

    /// Keep remote objects whose local counterpart disappeared
    #[arg(long)]
    pub no_delete: bool,

    /// Hash file content for change detection
    #[arg(long)]
    pub fingerprint: bool,
}

impl SyncCommand {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        let source = self.source.clone().unwrap_or_else(|| config.sync.source.clone());
        let target = self.target.clone().unwrap_or_else(|| config.remote.target.clone());
        let state_dir = self
            .state_dir
            .clone()
            .unwrap_or_else(|| config.sync.state_dir.clone());

        if target.as_os_str().is_empty() {
            formatter.error("No sync target configured. Set remote.target or pass --target.");
            return Ok(());
        }

        let mut includes = config.sync.includes.clone();
        includes.extend(self.includes.iter().cloned());
        let mut excludes = config.sync.excludes.clone();
        excludes.extend(self.excludes.iter().cloned());

        let sync_config = SyncConfig::new(source, state_dir)
            .with_includes(includes)
            .with_excludes(excludes)
            .with_dry_run(self.dry_run)
            .with_full_sync(self.full_sync)
            .with_delete_dest(config.sync.delete_dest && !self.no_delete)
            .with_fingerprint(self.fingerprint || config.sync.fingerprint);

        let matcher = sync_config
            .build_matcher()
            .context("invalid include/exclude patterns")?;
        let client = LocalDirClient::named(config.remote.name.clone(), target);

        if self.dry_run {
            formatter.info("Dry run mode - no changes will be made");
        }

        let engine = SyncEngine::new(Arc::new(client), Arc::new(matcher), sync_config);
        let summary = engine.incremental_copy().await?;

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::json!({
                "operations": summary.operations,
                "deletes": summary.deletes,
                "mkdirs": summary.mkdirs,
                "puts": summary.puts,
                "dry_run": summary.dry_run,
                "duration_ms": summary.duration_ms,
            });
            formatter.print_json(&json);
        } else {
            let duration_display = if summary.duration_ms >= 1000 {
                format!("{:.1}s", summary.duration_ms as f64 / 1000.0)
            } else {
                format!("{}ms", summary.duration_ms)
            };

            if summary.operations == 0 {
                formatter.success("Already up to date");
            } else if summary.dry_run {
                formatter.success(&format!(
                    "Dry run: {} operation{} planned",
                    summary.operations,
                    if summary.operations == 1 { "" } else { "s" }
                ));
            } else {
                formatter.success(&format!("Sync completed in {}", duration_display));
            }

            if summary.deletes > 0 {
                formatter.info(&format!(
                    "Deleted:  {} path{}",
                    summary.deletes,
                    if summary.deletes == 1 { "" } else { "s" }
                ));
            }
            if summary.mkdirs > 0 {
                formatter.info(&format!(
                    "Created:  {} director{}",
                    summary.mkdirs,
                    if summary.mkdirs == 1 { "y" } else { "ies" }
                ));
            }
            if summary.puts > 0 {
                formatter.info(&format!(
                    "Uploaded: {} file{}",
                    summary.puts,
                    if summary.puts == 1 { "" } else { "s" }
                ));
            }
        }

        Ok(())
    }
}
