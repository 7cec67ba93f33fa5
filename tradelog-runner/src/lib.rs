//! TradeLog Runner — configuration, log loading, reports and artifacts.
//!
//! This crate builds on `tradelog-core` to provide:
//! - TOML run configuration with validation and a config fingerprint
//! - Reports-directory discovery and parallel, failure-tolerant log loading
//! - The statistics runner (monthly/yearly statistics, per-asset results, portfolio)
//! - Text report and CSV/JSON artifact export

pub mod config;
pub mod data_loader;
pub mod reporting;
pub mod runner;

pub use config::{ConfigError, StatsConfig, DEFAULT_STARTING_CASH};
pub use data_loader::{
    discover_logs, load_files, load_trade_logs, FileWarning, LoadError, LoadedLogs, LogFile,
};
pub use reporting::{export_heatmaps, export_run_with_report, ArtifactManager, ArtifactPaths};
pub use runner::{
    derive_asset_results, load_asset_results, run_from_loaded, run_statistics, RunError,
    StatsRun,
};
