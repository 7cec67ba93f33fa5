//! Temporal bucketing — trade records grouped into calendar months.
//!
//! A record's bucket is decided by its entry time alone. Buckets come out
//! in ascending (year, month) order wrapped in [`MonthlySeries`], which is
//! the only input the balance fold accepts.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::TradeRecord;

pub const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1–12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {month}");
        Self { year, month }
    }

    pub fn of(ts: &NaiveDateTime) -> Self {
        Self::new(ts.year(), ts.month())
    }

    /// `"???"` for a month outside 1–12.
    pub fn month_abbr(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|i| MONTH_ABBR.get(i as usize))
            .copied()
            .unwrap_or("???")
    }
}

/// All records whose entry falls in one month, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBucket {
    period: YearMonth,
    records: Vec<TradeRecord>,
}

impl MonthlyBucket {
    pub fn new(period: YearMonth) -> Self {
        Self {
            period,
            records: Vec::new(),
        }
    }

    pub fn period(&self) -> YearMonth {
        self.period
    }

    pub fn year(&self) -> i32 {
        self.period.year
    }

    pub fn month(&self) -> u32 {
        self.period.month
    }

    /// Records in insertion order. Not necessarily chronological.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn winners(&self) -> usize {
        self.records.iter().filter(|r| r.is_winner()).count()
    }

    /// Trades with pnl ≤ 0. Breakeven counts as a loser.
    pub fn losers(&self) -> usize {
        self.total() - self.winners()
    }

    /// Largest number of entries sharing one calendar date.
    pub fn max_daily(&self) -> usize {
        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
        for record in &self.records {
            *per_day.entry(record.entry_date()).or_insert(0) += 1;
        }
        per_day.into_values().max().unwrap_or(0)
    }

    pub fn net_pnl(&self) -> f64 {
        self.records.iter().map(|r| r.pnl).sum()
    }
}

/// Month buckets in strictly increasing (year, month) order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlySeries {
    buckets: Vec<MonthlyBucket>,
}

impl MonthlySeries {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn as_slice(&self) -> &[MonthlyBucket] {
        &self.buckets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthlyBucket> {
        self.buckets.iter()
    }

    pub fn get(&self, period: YearMonth) -> Option<&MonthlyBucket> {
        self.buckets
            .binary_search_by_key(&period, |b| b.period)
            .ok()
            .map(|i| &self.buckets[i])
    }

    /// Total number of records across all buckets.
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(MonthlyBucket::total).sum()
    }

    /// Buckets grouped per year, ascending. Each slice is in month order.
    pub fn years(&self) -> Vec<(i32, &[MonthlyBucket])> {
        let mut out = Vec::new();
        let mut start = 0;
        for i in 1..=self.buckets.len() {
            let boundary =
                i == self.buckets.len() || self.buckets[i].year() != self.buckets[start].year();
            if boundary {
                out.push((self.buckets[start].year(), &self.buckets[start..i]));
                start = i;
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a MonthlySeries {
    type Item = &'a MonthlyBucket;
    type IntoIter = std::slice::Iter<'a, MonthlyBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Assign every record to its entry month. Input order is irrelevant.
pub fn bucket_by_month<I>(records: I) -> MonthlySeries
where
    I: IntoIterator<Item = TradeRecord>,
{
    let mut by_month: BTreeMap<YearMonth, MonthlyBucket> = BTreeMap::new();
    for record in records {
        let period = YearMonth::of(&record.entry_time);
        by_month
            .entry(period)
            .or_insert_with(|| MonthlyBucket::new(period))
            .records
            .push(record);
    }
    MonthlySeries {
        buckets: by_month.into_values().collect(),
    }
}
