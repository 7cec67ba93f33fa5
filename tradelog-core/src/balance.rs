//! Running account balance across the month series.
//!
//! Each month's return is measured against the balance *before* that
//! month's net PnL lands, so month N depends on the result of months
//! 1..N-1. The fold below makes that dependency explicit: state in, state
//! out, one month at a time, in series order only.

use serde::{Deserialize, Serialize};

use crate::buckets::{MonthlySeries, YearMonth};

/// The single scalar carried through the fold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceState {
    pub balance: f64,
}

impl BalanceState {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            balance: starting_cash,
        }
    }

    /// Apply one month's net PnL. Returns the next state and the month's
    /// return in percent of the current balance.
    ///
    /// A wiped-out account (balance ≤ 0) reports a `0.0` return instead of
    /// dividing by zero or flipping sign.
    #[must_use]
    pub fn apply(self, net_pnl: f64) -> (BalanceState, f64) {
        let return_pct = if self.balance > 0.0 {
            net_pnl / self.balance * 100.0
        } else {
            0.0
        };
        let next = BalanceState {
            balance: self.balance + net_pnl,
        };
        (next, return_pct)
    }
}

/// Balance movement for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub period: YearMonth,
    pub net_pnl: f64,
    pub balance_before: f64,
    pub return_pct: f64,
    pub balance_after: f64,
}

/// Fold the series through the balance, oldest month first.
///
/// Returns one [`MonthlyReturn`] per bucket (same order) and the final state.
pub fn track_balance(
    series: &MonthlySeries,
    start: BalanceState,
) -> (Vec<MonthlyReturn>, BalanceState) {
    series.iter().fold(
        (Vec::with_capacity(series.len()), start),
        |(mut rows, state), bucket| {
            let net_pnl = bucket.net_pnl();
            let (next, return_pct) = state.apply(net_pnl);
            rows.push(MonthlyReturn {
                period: bucket.period(),
                net_pnl,
                balance_before: state.balance,
                return_pct,
                balance_after: next.balance,
            });
            (rows, next)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::bucket_by_month;
    use crate::domain::TradeRecord;
    use chrono::NaiveDate;

    fn trade(y: i32, m: u32, pnl: f64) -> TradeRecord {
        TradeRecord {
            asset: "EURUSD".into(),
            entry_time: NaiveDate::from_ymd_opt(y, m, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            exit_time: None,
            pnl,
            direction: None,
        }
    }

    #[test]
    fn returns_are_relative_to_pre_update_balance() {
        let series = bucket_by_month(vec![
            trade(2024, 1, 100.0),
            trade(2024, 2, -50.0),
            trade(2024, 3, 200.0),
        ]);
        let (rows, end) = track_balance(&series, BalanceState::new(1000.0));

        assert_eq!(rows.len(), 3);
        assert!((rows[0].return_pct - 10.0).abs() < 1e-10);
        assert!((rows[1].return_pct - (-50.0 / 1100.0 * 100.0)).abs() < 1e-10);
        assert!((rows[2].return_pct - (200.0 / 1050.0 * 100.0)).abs() < 1e-10);
        assert!((end.balance - 1250.0).abs() < 1e-10);
        assert!((rows[2].balance_after - 1250.0).abs() < 1e-10);
        assert!((rows[1].balance_before - 1100.0).abs() < 1e-10);
    }

    #[test]
    fn wiped_out_balance_reports_zero_return() {
        let (state, r) = BalanceState::new(100.0).apply(-150.0);
        assert!((r + 150.0).abs() < 1e-10);
        assert!((state.balance + 50.0).abs() < 1e-10);

        let (state, r) = state.apply(500.0);
        assert_eq!(r, 0.0);
        assert!((state.balance - 450.0).abs() < 1e-10);

        let (_, r) = BalanceState::new(0.0).apply(10.0);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn empty_series_leaves_state_untouched() {
        let series = bucket_by_month(Vec::new());
        let (rows, end) = track_balance(&series, BalanceState::new(5_000.0));
        assert!(rows.is_empty());
        assert_eq!(end.balance, 5_000.0);
    }

    #[test]
    fn trades_within_a_month_are_netted_once() {
        let series = bucket_by_month(vec![trade(2024, 1, 60.0), trade(2024, 1, 40.0)]);
        let (rows, _) = track_balance(&series, BalanceState::new(1000.0));
        assert_eq!(rows.len(), 1);
        assert!((rows[0].return_pct - 10.0).abs() < 1e-10);
    }
}
