//! Run manifest export (JSON).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::StatsConfig;
use crate::runner::StatsRun;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub dataset_hash: String,
    pub config_hash: String,
    pub config: StatsConfig,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub trade_count: usize,
    pub month_count: usize,
    pub asset_count: usize,
    pub no_data: bool,
}

impl RunManifest {
    pub fn from_run(run: &StatsRun) -> Self {
        let stats = run.outcome.statistics();
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            dataset_hash: run.dataset_hash.clone(),
            config_hash: run.config.config_hash(),
            config: run.config.clone(),
            files_loaded: run.files_loaded,
            files_skipped: run.warnings.len(),
            trade_count: run.record_count(),
            month_count: stats.map_or(0, |s| s.monthly.len()),
            asset_count: run.asset_results.len(),
            no_data: run.outcome.is_no_data(),
        }
    }
}

pub fn write_manifest(path: &Path, run: &StatsRun) -> Result<()> {
    let manifest = RunManifest::from_run(run);
    let json =
        serde_json::to_string_pretty(&manifest).context("Failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}
