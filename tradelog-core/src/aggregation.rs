//! Monthly rows and yearly rollups.
//!
//! Two return measures live side by side and are deliberately not unified:
//! - `cumulative_return` adds up the year's monthly percentages;
//! - `cagr` is a single-period balance ratio against the prior year's
//!   ending balance, except for the latest year, which reports its
//!   `cumulative_return` unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::balance::{track_balance, BalanceState, MonthlyReturn};
use crate::buckets::{MonthlyBucket, MonthlySeries, YearMonth};
use crate::domain::ratio;

/// One month of entry counts and balance movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total: usize,
    pub winners: usize,
    pub losers: usize,
    pub max_daily: usize,
    pub net_pnl: f64,
    pub return_pct: f64,
    pub balance_after: f64,
}

impl MonthlySummary {
    pub fn from_parts(bucket: &MonthlyBucket, movement: &MonthlyReturn) -> Self {
        debug_assert_eq!(bucket.period(), movement.period);
        Self {
            year: bucket.year(),
            month: bucket.month(),
            total: bucket.total(),
            winners: bucket.winners(),
            losers: bucket.losers(),
            max_daily: bucket.max_daily(),
            net_pnl: movement.net_pnl,
            return_pct: movement.return_pct,
            balance_after: movement.balance_after,
        }
    }

    pub fn period(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }
}

/// Rollup of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub total: usize,
    pub winners: usize,
    pub losers: usize,
    /// Max of the months' `max_daily`, not their sum.
    pub max_daily: usize,
    /// Percent, `0.0` without trades.
    pub win_rate: f64,
    /// Sum of the year's monthly returns (percent).
    pub cumulative_return: f64,
    /// Percent.
    pub cagr: f64,
    pub ending_balance: f64,
}

/// Everything derived from a non-empty record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub starting_cash: f64,
    pub monthly: Vec<MonthlySummary>,
    pub yearly: Vec<YearlySummary>,
    pub trade_count: usize,
    pub final_balance: f64,
}

/// Result of an aggregation: either statistics or an explicit absence of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatsOutcome {
    NoData,
    Computed(TradeStatistics),
}

impl StatsOutcome {
    pub fn statistics(&self) -> Option<&TradeStatistics> {
        match self {
            StatsOutcome::NoData => None,
            StatsOutcome::Computed(stats) => Some(stats),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, StatsOutcome::NoData)
    }
}

#[derive(Debug, Default)]
struct YearAccumulator {
    total: usize,
    winners: usize,
    losers: usize,
    max_daily: usize,
    cumulative_return: f64,
    ending_balance: f64,
}

/// Run the balance fold over `series` and derive monthly and yearly statistics.
///
/// An empty series short-circuits to [`StatsOutcome::NoData`].
pub fn aggregate(series: &MonthlySeries, starting_cash: f64) -> StatsOutcome {
    if series.is_empty() {
        return StatsOutcome::NoData;
    }

    let (movements, end) = track_balance(series, BalanceState::new(starting_cash));
    let monthly: Vec<MonthlySummary> = series
        .iter()
        .zip(&movements)
        .map(|(bucket, movement)| MonthlySummary::from_parts(bucket, movement))
        .collect();
    let yearly = rollup_years(&monthly, starting_cash);

    StatsOutcome::Computed(TradeStatistics {
        starting_cash,
        trade_count: series.record_count(),
        final_balance: end.balance,
        monthly,
        yearly,
    })
}

/// Roll chronologically ordered monthly rows up into years.
pub fn rollup_years(monthly: &[MonthlySummary], starting_cash: f64) -> Vec<YearlySummary> {
    let mut years: BTreeMap<i32, YearAccumulator> = BTreeMap::new();
    for m in monthly {
        let acc = years.entry(m.year).or_default();
        acc.total += m.total;
        acc.winners += m.winners;
        acc.losers += m.losers;
        acc.max_daily = acc.max_daily.max(m.max_daily);
        acc.cumulative_return += m.return_pct;
        acc.ending_balance = m.balance_after;
    }

    let latest = years.keys().next_back().copied();
    let mut prior_ending = starting_cash;

    years
        .into_iter()
        .map(|(year, acc)| {
            let cagr = if Some(year) == latest {
                acc.cumulative_return
            } else {
                single_period_growth(prior_ending, acc.ending_balance)
            };
            prior_ending = acc.ending_balance;
            YearlySummary {
                year,
                total: acc.total,
                winners: acc.winners,
                losers: acc.losers,
                max_daily: acc.max_daily,
                win_rate: ratio::percentage(acc.winners as f64, acc.total as f64),
                cumulative_return: acc.cumulative_return,
                cagr,
                ending_balance: acc.ending_balance,
            }
        })
        .collect()
}

/// `((end / base)^1 - 1) * 100` — compounding over exactly one period.
/// A non-positive base yields `0.0`.
pub fn single_period_growth(base: f64, end: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    (end / base - 1.0) * 100.0
}
