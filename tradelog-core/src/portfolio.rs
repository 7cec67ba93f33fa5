//! Portfolio aggregation — per-instrument results merged into one view.
//!
//! The portfolio profit factor pools gross profit and gross loss across
//! instruments before dividing. Averaging per-instrument factors gives a
//! different (wrong) number and is never done here.

use serde::{Deserialize, Serialize};

use crate::domain::{ratio, AssetResult, DrawdownUnit};

/// Upper bound for reported drawdown, in percent.
pub const MAX_DRAWDOWN_PCT: f64 = 99.9;

/// Normalize a drawdown to a positive percentage capped at [`MAX_DRAWDOWN_PCT`].
///
/// With an explicit unit the value is converted accordingly. Without one,
/// `|value| <= 1.0` is read as a fraction and anything larger as a
/// percentage. The heuristic is ambiguous at exactly `1.0` (100% as a
/// fraction vs 1% as a percentage); it resolves to the fraction reading,
/// which the cap then turns into 99.9%.
pub fn normalize_drawdown(value: f64, unit: Option<DrawdownUnit>) -> f64 {
    let magnitude = value.abs();
    let pct = match unit {
        Some(DrawdownUnit::Fraction) => magnitude * 100.0,
        Some(DrawdownUnit::Percent) => magnitude,
        None if magnitude <= 1.0 => magnitude * 100.0,
        None => magnitude,
    };
    if pct.is_nan() {
        return 0.0;
    }
    pct.min(MAX_DRAWDOWN_PCT)
}

/// One instrument's line in the portfolio tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBreakdown {
    pub asset: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    #[serde(with = "ratio::unbounded")]
    pub profit_factor: f64,
    pub max_drawdown_pct: f64,
    pub risk_ratio: f64,
    pub pnl: f64,
    pub return_pct: f64,
}

impl From<&AssetResult> for AssetBreakdown {
    fn from(r: &AssetResult) -> Self {
        Self {
            asset: r.asset.clone(),
            trades: r.total_trades(),
            wins: r.won,
            losses: r.lost,
            win_rate: r.win_rate(),
            profit_factor: r.profit_factor(),
            max_drawdown_pct: normalize_drawdown(r.max_drawdown, r.drawdown_unit),
            risk_ratio: r.risk_ratio,
            pnl: r.pnl(),
            return_pct: r.return_pct(),
        }
    }
}

/// Portfolio-level trade and value statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_trades: usize,
    pub total_wins: usize,
    pub total_losses: usize,
    pub portfolio_win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    #[serde(with = "ratio::unbounded")]
    pub portfolio_profit_factor: f64,
    pub total_initial: f64,
    pub total_final: f64,
    pub total_pnl: f64,
    pub total_return_pct: f64,
    pub assets: Vec<AssetBreakdown>,
}

/// Merge per-instrument results. Asset order is preserved.
pub fn aggregate_portfolio(results: &[AssetResult]) -> PortfolioSummary {
    let mut total_wins = 0;
    let mut total_losses = 0;
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;
    let mut total_initial = 0.0;
    let mut total_final = 0.0;

    for r in results {
        total_wins += r.won;
        total_losses += r.lost;
        gross_profit += r.gross_profit;
        gross_loss += r.gross_loss.abs();
        total_initial += r.initial_value;
        total_final += r.final_value;
    }

    let total_trades = total_wins + total_losses;
    let total_pnl = total_final - total_initial;

    PortfolioSummary {
        total_trades,
        total_wins,
        total_losses,
        portfolio_win_rate: ratio::percentage(total_wins as f64, total_trades as f64),
        gross_profit,
        gross_loss,
        portfolio_profit_factor: ratio::profit_factor(gross_profit, gross_loss),
        total_initial,
        total_final,
        total_pnl,
        total_return_pct: ratio::percentage(total_pnl, total_initial),
        assets: results.iter().map(AssetBreakdown::from).collect(),
    }
}
