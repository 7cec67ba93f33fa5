//! Statistics runner — wires together loading, aggregation and the portfolio merge.
//!
//! Two entry points:
//! - `run_statistics()`: loads logs from the configured directory, then runs. Used by CLI.
//! - `run_from_loaded()`: takes already-loaded logs, no I/O. Used by tests and callers
//!   that bring their own records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use tradelog_core::aggregation::{aggregate, StatsOutcome};
use tradelog_core::asset_metrics::derive_asset_result;
use tradelog_core::buckets::bucket_by_month;
use tradelog_core::domain::{Asset, AssetResult, TradeRecord};
use tradelog_core::heatmap::HeatmapSet;
use tradelog_core::portfolio::{aggregate_portfolio, PortfolioSummary};

use crate::config::{ConfigError, StatsConfig};
use crate::data_loader::{load_trade_logs, FileWarning, LoadError, LoadedLogs};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Load(#[from] LoadError),
    #[error("failed to read asset results {path}: {source}")]
    ResultsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse asset results {path}: {source}")]
    ResultsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Complete result of one statistics run.
#[derive(Debug, Clone)]
pub struct StatsRun {
    pub config: StatsConfig,
    pub dataset_hash: String,
    pub files_loaded: usize,
    pub warnings: Vec<FileWarning>,
    pub outcome: StatsOutcome,
    /// One per instrument, in asset-name order.
    pub asset_results: Vec<AssetResult>,
    /// `None` when no instrument produced a record.
    pub portfolio: Option<PortfolioSummary>,
    /// `None` for a no-data outcome.
    pub heatmap: Option<HeatmapSet>,
}

impl StatsRun {
    pub fn record_count(&self) -> usize {
        self.outcome.statistics().map_or(0, |s| s.trade_count)
    }
}

/// Load the configured reports directory and compute all statistics.
pub fn run_statistics(config: &StatsConfig) -> Result<StatsRun, RunError> {
    config.validate()?;
    let loaded = load_trade_logs(config)?;
    Ok(run_from_loaded(config, loaded))
}

/// Compute all statistics from already-loaded logs — no I/O.
pub fn run_from_loaded(config: &StatsConfig, loaded: LoadedLogs) -> StatsRun {
    let grouped = loaded.by_asset();
    let initial_value = config.initial_value_for(grouped.len());
    let asset_results = derive_asset_results(&grouped, initial_value);

    let files_loaded = loaded.files.len().saturating_sub(loaded.warnings.len());
    let series = bucket_by_month(loaded.records);
    let outcome = aggregate(&series, config.starting_cash);

    let portfolio = (!asset_results.is_empty()).then(|| aggregate_portfolio(&asset_results));
    let heatmap = outcome.statistics().map(HeatmapSet::from_statistics);

    info!(
        files = files_loaded,
        skipped = loaded.warnings.len(),
        trades = series.record_count(),
        months = series.len(),
        assets = asset_results.len(),
        "statistics computed"
    );

    StatsRun {
        config: config.clone(),
        dataset_hash: loaded.dataset_hash,
        files_loaded,
        warnings: loaded.warnings,
        outcome,
        asset_results,
        portfolio,
        heatmap,
    }
}

/// Derive one `AssetResult` per instrument in parallel. Output follows the
/// map's (name) order.
pub fn derive_asset_results(
    grouped: &BTreeMap<Asset, Vec<TradeRecord>>,
    initial_value: f64,
) -> Vec<AssetResult> {
    let assets: Vec<(&Asset, &Vec<TradeRecord>)> = grouped.iter().collect();
    assets
        .par_iter()
        .map(|(asset, trades)| derive_asset_result(asset, trades, initial_value))
        .collect()
}

/// Read externally produced per-instrument results (JSON array).
pub fn load_asset_results(path: &Path) -> Result<Vec<AssetResult>, RunError> {
    let content = std::fs::read_to_string(path).map_err(|source| RunError::ResultsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let results: Vec<AssetResult> =
        serde_json::from_str(&content).map_err(|source| RunError::ResultsParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), assets = results.len(), "loaded asset results");
    Ok(results)
}
