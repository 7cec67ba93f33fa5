//! Property tests for the statistics engine.
//!
//! Uses proptest to verify:
//! 1. Parse tolerance — malformed entries vanish, valid ones survive intact and in order
//! 2. Bucket completeness — the buckets hold exactly the input records, each in its month
//! 3. Balance consistency — the fold ends at start + Σpnl and each return is net / before
//! 4. Order independence — shuffling the records does not change the statistics

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use tradelog_core::aggregation::aggregate;
use tradelog_core::balance::{track_balance, BalanceState};
use tradelog_core::buckets::{bucket_by_month, YearMonth};
use tradelog_core::domain::TradeRecord;
use tradelog_core::parser::parse_log;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (2019i32..2026, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, m, d, h, min)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    })
}

fn arb_pnl() -> impl Strategy<Value = f64> {
    (-5_000.0..5_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_record() -> impl Strategy<Value = TradeRecord> {
    (arb_timestamp(), arb_pnl()).prop_map(|(entry_time, pnl)| TradeRecord {
        asset: "EURUSD".into(),
        entry_time,
        exit_time: None,
        pnl,
        direction: None,
    })
}

/// A malformed entry body: a missing field or an unparseable value.
fn arb_bad_entry() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Time: 2024-01-01 10:00:00\nDirection: LONG\n".to_string()),
        Just("PnL: $10.00\n".to_string()),
        Just("Time: not a date\nPnL: 5\n".to_string()),
        Just("Time: 2024-01-01 10:00:00\nPnL: N/A\n".to_string()),
        Just("Notes only\n".to_string()),
    ]
}

fn render_entry(record: &TradeRecord) -> String {
    let sign = if record.pnl < 0.0 { "-" } else { "" };
    format!(
        "Time: {}\nPnL: {}${:.2}\n",
        record.entry_time.format("%Y-%m-%d %H:%M:%S"),
        sign,
        record.pnl.abs()
    )
}

// ── 1. Parse tolerance ───────────────────────────────────────────────

proptest! {
    /// Malformed entries are dropped without affecting valid ones.
    #[test]
    fn malformed_entries_are_skipped(
        good in prop::collection::vec(arb_record(), 0..20),
        bad in prop::collection::vec(arb_bad_entry(), 0..10),
        seed in any::<u64>(),
    ) {
        let mut bodies: Vec<(Option<&TradeRecord>, String)> =
            good.iter().map(|r| (Some(r), render_entry(r))).collect();
        bodies.extend(bad.iter().map(|b| (None, b.clone())));
        // Deterministic interleave.
        let n = bodies.len().max(1) as u64;
        bodies.rotate_left((seed % n) as usize);

        let mut text = String::from("TRADE REPORT\n");
        for (i, (_, body)) in bodies.iter().enumerate() {
            text.push_str(&format!("ENTRY #{}\n{}", i + 1, body));
        }
        let expected: Vec<&TradeRecord> = bodies.iter().filter_map(|(r, _)| *r).collect();

        let parsed: Vec<TradeRecord> = parse_log("EURUSD", &text).collect();
        prop_assert_eq!(parsed.len(), expected.len());
        for (got, want) in parsed.iter().zip(&expected) {
            prop_assert_eq!(got.entry_time, want.entry_time);
            prop_assert!((got.pnl - want.pnl).abs() < 1e-9);
            prop_assert_eq!(got.asset.as_str(), "EURUSD");
        }
    }
}

// ── 2. Bucket completeness ───────────────────────────────────────────

proptest! {
    /// Buckets partition the records by (year, month), ascending.
    #[test]
    fn buckets_partition_records(records in prop::collection::vec(arb_record(), 0..60)) {
        let series = bucket_by_month(records.clone());

        prop_assert_eq!(series.record_count(), records.len());
        let mut flattened: Vec<(NaiveDateTime, f64)> = series
            .iter()
            .flat_map(|b| b.records().iter().map(|r| (r.entry_time, r.pnl)))
            .collect();
        let mut input: Vec<(NaiveDateTime, f64)> =
            records.iter().map(|r| (r.entry_time, r.pnl)).collect();
        flattened.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        input.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        prop_assert_eq!(flattened, input);
        for bucket in &series {
            for r in bucket.records() {
                prop_assert_eq!(YearMonth::of(&r.entry_time), bucket.period());
            }
            prop_assert!(bucket.winners() + bucket.losers() == bucket.total());
            prop_assert!(bucket.max_daily() <= bucket.total());
            prop_assert!(bucket.total() > 0);
        }
        let periods: Vec<YearMonth> = series.iter().map(|b| b.period()).collect();
        prop_assert!(periods.windows(2).all(|w| w[0] < w[1]));
    }
}

// ── 3. Balance consistency ───────────────────────────────────────────

proptest! {
    /// Final balance is start + Σpnl; each month's return is net / balance_before × 100.
    #[test]
    fn balance_fold_is_consistent(
        records in prop::collection::vec(arb_record(), 1..60),
        start in 10_000.0..200_000.0_f64,
    ) {
        let total: f64 = records.iter().map(|r| r.pnl).sum();
        let series = bucket_by_month(records);
        let (months, end) = track_balance(&series, BalanceState::new(start));

        prop_assert!((end.balance - (start + total)).abs() < 1e-6);
        prop_assert!((months[0].balance_before - start).abs() < 1e-12);
        for w in months.windows(2) {
            prop_assert!((w[1].balance_before - w[0].balance_after).abs() < 1e-9);
        }
        for m in &months {
            if m.balance_before > 0.0 {
                let expected = m.net_pnl / m.balance_before * 100.0;
                prop_assert!((m.return_pct - expected).abs() < 1e-9);
            } else {
                prop_assert_eq!(m.return_pct, 0.0);
            }
            prop_assert!((m.balance_after - (m.balance_before + m.net_pnl)).abs() < 1e-9);
        }
    }
}

// ── 4. Order independence ────────────────────────────────────────────

proptest! {
    /// Counts do not depend on input order; balances only up to float summation.
    #[test]
    fn statistics_ignore_input_order(records in prop::collection::vec(arb_record(), 1..40)) {
        let mut reversed = records.clone();
        reversed.reverse();

        let a = aggregate(&bucket_by_month(records), 100_000.0);
        let b = aggregate(&bucket_by_month(reversed), 100_000.0);
        let (a, b) = (a.statistics().unwrap(), b.statistics().unwrap());

        prop_assert_eq!(a.monthly.len(), b.monthly.len());
        for (x, y) in a.monthly.iter().zip(&b.monthly) {
            prop_assert_eq!(x.period(), y.period());
            prop_assert_eq!(x.total, y.total);
            prop_assert_eq!(x.winners, y.winners);
            prop_assert_eq!(x.max_daily, y.max_daily);
            prop_assert!((x.balance_after - y.balance_after).abs() < 1e-6);
        }
    }
}
