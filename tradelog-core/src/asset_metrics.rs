//! Per-instrument metrics — an `AssetResult` derived from a trade log.
//!
//! Used when no external backtest result is available for an instrument.
//! Every metric is a pure function of the instrument's trades; nothing here
//! touches other instruments, so callers may derive assets in parallel.

use crate::domain::{AssetResult, DrawdownUnit, TradeRecord};

/// Annualization factor for the risk ratio.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Build the instrument's `AssetResult` from its trades and allocated capital.
///
/// Drawdown is reported as a (negative) fraction and tagged as such, so the
/// portfolio layer never has to guess its unit.
pub fn derive_asset_result(asset: &str, trades: &[TradeRecord], initial_value: f64) -> AssetResult {
    let won = trades.iter().filter(|t| t.is_winner()).count();
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl < 0.0)
        .map(|t| t.pnl.abs())
        .sum();
    let net: f64 = trades.iter().map(|t| t.pnl).sum();

    let equity = closed_trade_equity(trades, initial_value);

    AssetResult {
        asset: asset.to_string(),
        won,
        lost: trades.len() - won,
        gross_profit,
        gross_loss,
        max_drawdown: max_drawdown(&equity),
        drawdown_unit: Some(DrawdownUnit::Fraction),
        risk_ratio: sharpe_ratio(&equity),
        initial_value,
        final_value: initial_value + net,
    }
}

/// Account value after each closed trade, starting with `initial_value`.
///
/// Trades are ordered by close time (exit, or entry when the exit is
/// unknown); ties keep their input order.
pub fn closed_trade_equity(trades: &[TradeRecord], initial_value: f64) -> Vec<f64> {
    let mut ordered: Vec<&TradeRecord> = trades.iter().collect();
    ordered.sort_by_key(|t| t.close_time());

    let mut equity = Vec::with_capacity(ordered.len() + 1);
    let mut value = initial_value;
    equity.push(value);
    for trade in ordered {
        value += trade.pnl;
        equity.push(value);
    }
    equity
}

/// Deepest peak-to-trough fall of the equity series, as a fraction of the
/// peak (`-0.15` for a 15% fall). Zero when equity never falls below a prior
/// high; peaks at or below zero are not measured.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };
    equity_curve
        .iter()
        .scan(first, |peak, &value| {
            *peak = peak.max(value);
            Some(if *peak > 0.0 { value / *peak - 1.0 } else { 0.0 })
        })
        .fold(0.0_f64, f64::min)
}

/// Annualized Sharpe-like ratio of the per-trade equity returns:
/// mean over sample deviation, scaled by `sqrt(252)`. Zero with fewer than
/// two returns or when every return is the same.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = step_returns(equity_curve);
    let n = returns.len();
    if n < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / n as f64;
    let spread = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1) as f64;
    let deviation = spread.sqrt();
    if deviation < 1e-15 {
        return 0.0;
    }
    mean / deviation * PERIODS_PER_YEAR.sqrt()
}

/// Fractional change between consecutive equity values; 0.0 after a
/// non-positive value.
pub fn step_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}
