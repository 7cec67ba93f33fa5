//! AssetResult — per-instrument trade and risk aggregates.
//!
//! Produced either by an external backtest engine (loaded from JSON) or
//! derived from the instrument's own trade log (see `asset_metrics`).

use serde::{Deserialize, Serialize};

use super::ratio;

/// Unit of an incoming drawdown value.
///
/// Upstream producers disagree on whether drawdown is a fraction (`0.05`)
/// or a percentage (`5.0`). When the tag is absent the portfolio layer
/// falls back to a magnitude heuristic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DrawdownUnit {
    Fraction,
    Percent,
}

/// Trade and risk summary for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetResult {
    pub asset: String,
    pub won: usize,
    pub lost: usize,
    pub gross_profit: f64,
    /// Sum of losing PnL. Either sign is accepted; only the magnitude is used.
    pub gross_loss: f64,
    pub max_drawdown: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawdown_unit: Option<DrawdownUnit>,
    /// Risk-adjusted return (Sharpe-like).
    #[serde(default)]
    pub risk_ratio: f64,
    pub initial_value: f64,
    pub final_value: f64,
}

impl AssetResult {
    pub fn total_trades(&self) -> usize {
        self.won + self.lost
    }

    /// Win rate in percent, `0.0` without trades.
    pub fn win_rate(&self) -> f64 {
        ratio::percentage(self.won as f64, self.total_trades() as f64)
    }

    pub fn profit_factor(&self) -> f64 {
        ratio::profit_factor(self.gross_profit, self.gross_loss)
    }

    pub fn pnl(&self) -> f64 {
        self.final_value - self.initial_value
    }

    /// Return on the initial value in percent, `0.0` when it is not positive.
    pub fn return_pct(&self) -> f64 {
        ratio::percentage(self.pnl(), self.initial_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AssetResult {
        AssetResult {
            asset: "XAUUSD".into(),
            won: 6,
            lost: 4,
            gross_profit: 1_200.0,
            gross_loss: 400.0,
            max_drawdown: 0.08,
            drawdown_unit: None,
            risk_ratio: 1.1,
            initial_value: 10_000.0,
            final_value: 10_800.0,
        }
    }

    #[test]
    fn derived_fields() {
        let r = sample();
        assert_eq!(r.total_trades(), 10);
        assert!((r.win_rate() - 60.0).abs() < 1e-12);
        assert!((r.profit_factor() - 3.0).abs() < 1e-12);
        assert!((r.pnl() - 800.0).abs() < 1e-12);
        assert!((r.return_pct() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn no_trades_is_zero_not_nan() {
        let r = AssetResult {
            won: 0,
            lost: 0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            initial_value: 0.0,
            final_value: 0.0,
            ..sample()
        };
        assert_eq!(r.win_rate(), 0.0);
        assert_eq!(r.profit_factor(), 0.0);
        assert_eq!(r.return_pct(), 0.0);
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{
            "asset": "EURUSD",
            "won": 3,
            "lost": 1,
            "gross_profit": 300.0,
            "gross_loss": -100.0,
            "max_drawdown": 4.2,
            "initial_value": 1000.0,
            "final_value": 1200.0
        }"#;
        let r: AssetResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.drawdown_unit, None);
        assert_eq!(r.risk_ratio, 0.0);
        assert!((r.profit_factor() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn drawdown_unit_tag_is_lowercase() {
        let json = serde_json::to_string(&DrawdownUnit::Percent).unwrap();
        assert_eq!(json, "\"percent\"");
    }
}
