//! TradeLog Core — trade-log parsing and temporal statistics.
//!
//! This crate contains the statistics engine:
//! - Domain types (trade records, per-instrument results, guarded ratios)
//! - Tolerant trade-log parser
//! - Calendar-month bucketing
//! - Sequential balance fold and monthly/yearly aggregation
//! - Portfolio merge with pooled profit factor
//! - Heatmap grids and per-instrument metric derivation

pub mod aggregation;
pub mod asset_metrics;
pub mod balance;
pub mod buckets;
pub mod domain;
pub mod heatmap;
pub mod parser;
pub mod portfolio;

pub use aggregation::{aggregate, MonthlySummary, StatsOutcome, TradeStatistics, YearlySummary};
pub use asset_metrics::derive_asset_result;
pub use balance::{track_balance, BalanceState, MonthlyReturn};
pub use buckets::{bucket_by_month, MonthlyBucket, MonthlySeries, YearMonth};
pub use domain::{AssetResult, Direction, DrawdownUnit, TradeRecord};
pub use heatmap::{HeatmapMetric, HeatmapSet, MonthGrid};
pub use parser::{parse_log, ParseError};
pub use portfolio::{aggregate_portfolio, normalize_drawdown, AssetBreakdown, PortfolioSummary};
