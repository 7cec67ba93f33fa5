//! Year × month grids for heatmap renderers.
//!
//! Built from monthly summaries only (bucket counts + balance fold output),
//! so a renderer never has to go back to the trade logs. Rows are the years
//! present in the data, ascending; months without trades hold zero.

use serde::{Deserialize, Serialize};

use crate::aggregation::{MonthlySummary, TradeStatistics};

/// Dense grid: one row of twelve months per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid<T> {
    pub years: Vec<i32>,
    pub rows: Vec<[T; 12]>,
}

impl<T: Copy + Default> MonthGrid<T> {
    fn zeroed(years: &[i32]) -> Self {
        Self {
            years: years.to_vec(),
            rows: vec![[T::default(); 12]; years.len()],
        }
    }

    fn set(&mut self, year: i32, month: u32, value: T) {
        if !(1..=12).contains(&month) {
            return;
        }
        if let Ok(row) = self.years.binary_search(&year) {
            self.rows[row][(month - 1) as usize] = value;
        }
    }

    pub fn get(&self, year: i32, month: u32) -> Option<T> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let row = self.years.binary_search(&year).ok()?;
        Some(self.rows[row][(month - 1) as usize])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = (i32, &[T; 12])> {
        self.years.iter().copied().zip(self.rows.iter())
    }
}

impl MonthGrid<usize> {
    pub fn row_sums(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.iter().sum()).collect()
    }

    pub fn row_max(&self) -> Vec<usize> {
        self.rows
            .iter()
            .map(|r| r.iter().copied().max().unwrap_or(0))
            .collect()
    }
}

impl MonthGrid<f64> {
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.iter().sum()).collect()
    }
}

/// Named grid identifiers, also used for export file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapMetric {
    Total,
    Winners,
    Losers,
    MaxDaily,
    ReturnPct,
}

impl HeatmapMetric {
    pub const ALL: [HeatmapMetric; 5] = [
        HeatmapMetric::Total,
        HeatmapMetric::Winners,
        HeatmapMetric::Losers,
        HeatmapMetric::MaxDaily,
        HeatmapMetric::ReturnPct,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HeatmapMetric::Total => "total",
            HeatmapMetric::Winners => "winners",
            HeatmapMetric::Losers => "losers",
            HeatmapMetric::MaxDaily => "max_daily",
            HeatmapMetric::ReturnPct => "return_pct",
        }
    }
}

/// The five monthly grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSet {
    pub total: MonthGrid<usize>,
    pub winners: MonthGrid<usize>,
    pub losers: MonthGrid<usize>,
    pub max_daily: MonthGrid<usize>,
    pub return_pct: MonthGrid<f64>,
}

impl HeatmapSet {
    pub fn from_summaries(monthly: &[MonthlySummary]) -> Self {
        let mut years: Vec<i32> = monthly.iter().map(|m| m.year).collect();
        years.sort_unstable();
        years.dedup();

        let mut set = Self {
            total: MonthGrid::zeroed(&years),
            winners: MonthGrid::zeroed(&years),
            losers: MonthGrid::zeroed(&years),
            max_daily: MonthGrid::zeroed(&years),
            return_pct: MonthGrid::zeroed(&years),
        };
        for m in monthly {
            set.total.set(m.year, m.month, m.total);
            set.winners.set(m.year, m.month, m.winners);
            set.losers.set(m.year, m.month, m.losers);
            set.max_daily.set(m.year, m.month, m.max_daily);
            set.return_pct.set(m.year, m.month, m.return_pct);
        }
        set
    }

    pub fn from_statistics(stats: &TradeStatistics) -> Self {
        Self::from_summaries(&stats.monthly)
    }

    pub fn years(&self) -> &[i32] {
        &self.total.years
    }

    /// A grid as `f64` rows, for metric-agnostic consumers such as exporters.
    pub fn grid_f64(&self, metric: HeatmapMetric) -> MonthGrid<f64> {
        let widen = |g: &MonthGrid<usize>| MonthGrid {
            years: g.years.clone(),
            rows: g.rows.iter().map(|r| r.map(|v| v as f64)).collect(),
        };
        match metric {
            HeatmapMetric::Total => widen(&self.total),
            HeatmapMetric::Winners => widen(&self.winners),
            HeatmapMetric::Losers => widen(&self.losers),
            HeatmapMetric::MaxDaily => widen(&self.max_daily),
            HeatmapMetric::ReturnPct => self.return_pct.clone(),
        }
    }

    /// Per-year reduction of a grid: sums for counts and returns, max for `MaxDaily`.
    pub fn yearly(&self, metric: HeatmapMetric) -> Vec<f64> {
        let as_f64 = |v: Vec<usize>| -> Vec<f64> { v.into_iter().map(|x| x as f64).collect() };
        match metric {
            HeatmapMetric::Total => as_f64(self.total.row_sums()),
            HeatmapMetric::Winners => as_f64(self.winners.row_sums()),
            HeatmapMetric::Losers => as_f64(self.losers.row_sums()),
            HeatmapMetric::MaxDaily => as_f64(self.max_daily.row_max()),
            HeatmapMetric::ReturnPct => self.return_pct.row_sums(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, month: u32, total: usize, max_daily: usize, ret: f64) -> MonthlySummary {
        MonthlySummary {
            year,
            month,
            total,
            winners: total / 2,
            losers: total - total / 2,
            max_daily,
            net_pnl: 0.0,
            return_pct: ret,
            balance_after: 0.0,
        }
    }

    #[test]
    fn grid_has_one_row_per_present_year() {
        let set = HeatmapSet::from_summaries(&[
            row(2021, 4, 3, 2, 1.5),
            row(2023, 1, 4, 1, -0.5),
        ]);
        assert_eq!(set.years(), &[2021, 2023]);
        assert_eq!(set.total.get(2021, 4), Some(3));
        assert_eq!(set.total.get(2021, 5), Some(0));
        assert_eq!(set.total.get(2022, 1), None);
        assert_eq!(set.total.get(2021, 13), None);
        assert_eq!(set.return_pct.get(2023, 1), Some(-0.5));
    }

    #[test]
    fn out_of_range_months_are_ignored() {
        let stray: MonthlySummary = serde_json::from_str(
            r#"{"year":2024,"month":13,"total":5,"winners":2,"losers":3,"max_daily":2,
                "net_pnl":0.0,"return_pct":1.0,"balance_after":0.0}"#,
        )
        .unwrap();
        let set = HeatmapSet::from_summaries(&[
            stray,
            row(2024, 0, 7, 1, 2.0),
            row(2024, 3, 4, 2, 0.5),
        ]);
        assert_eq!(set.years(), &[2024]);
        assert_eq!(set.yearly(HeatmapMetric::Total), vec![4.0]);
        assert_eq!(set.total.get(2024, 3), Some(4));
    }

    #[test]
    fn yearly_reductions() {
        let set = HeatmapSet::from_summaries(&[
            row(2023, 1, 4, 3, 1.0),
            row(2023, 2, 6, 5, 2.0),
            row(2023, 3, 2, 2, -0.5),
        ]);
        assert_eq!(set.yearly(HeatmapMetric::Total), vec![12.0]);
        assert_eq!(set.yearly(HeatmapMetric::MaxDaily), vec![5.0]);
        assert_eq!(set.yearly(HeatmapMetric::ReturnPct), vec![2.5]);
        assert_eq!(set.winners.row_sums(), vec![2 + 3 + 1]);
    }

    #[test]
    fn widened_grid_matches_counts() {
        let set = HeatmapSet::from_summaries(&[row(2024, 12, 7, 4, 0.0)]);
        let g = set.grid_f64(HeatmapMetric::MaxDaily);
        assert_eq!(g.get(2024, 12), Some(4.0));
        assert_eq!(g.rows[0].iter().filter(|v| **v != 0.0).count(), 1);
    }

    #[test]
    fn empty_summaries_give_empty_grids() {
        let set = HeatmapSet::from_summaries(&[]);
        assert!(set.years().is_empty());
        assert!(set.yearly(HeatmapMetric::Total).is_empty());
    }

    #[test]
    fn metric_names() {
        let names: Vec<_> = HeatmapMetric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["total", "winners", "losers", "max_daily", "return_pct"]);
    }
}
