//! Criterion benchmarks for the statistics hot paths.
//!
//! Benchmarks:
//! 1. Log parsing (text → trade records)
//! 2. Monthly bucketing
//! 3. Balance fold + yearly rollup
//! 4. Per-instrument metric derivation

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradelog_core::aggregation::aggregate;
use tradelog_core::asset_metrics::derive_asset_result;
use tradelog_core::buckets::bucket_by_month;
use tradelog_core::domain::TradeRecord;
use tradelog_core::parser::parse_log;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_records(n: usize) -> Vec<TradeRecord> {
    let base = NaiveDate::from_ymd_opt(2018, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let entry_time = base + Duration::hours(i as i64 * 7);
            TradeRecord {
                asset: "EURUSD".into(),
                entry_time,
                exit_time: Some(entry_time + Duration::hours(3)),
                pnl: (i as f64 * 0.37).sin() * 250.0,
                direction: None,
            }
        })
        .collect()
}

fn make_log(n: usize) -> String {
    let mut text = String::from("TRADE REPORT - EURUSD\n");
    for (i, r) in make_records(n).iter().enumerate() {
        text.push_str(&format!(
            "ENTRY #{}\nTime: {}\nDirection: LONG\nExit Time: {}\nPnL: ${:.2}\n",
            i + 1,
            r.entry_time.format("%Y-%m-%d %H:%M:%S"),
            r.exit_time.unwrap().format("%Y-%m-%d %H:%M:%S"),
            r.pnl
        ));
    }
    text
}

// ── 1. Parsing ───────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_log");
    for &n in &[1_000, 10_000] {
        let text = make_log(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &text, |b, text| {
            b.iter(|| parse_log("EURUSD", black_box(text)).count());
        });
    }
    group.finish();
}

// ── 2. Bucketing ─────────────────────────────────────────────────────

fn bench_bucket(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_by_month");
    for &n in &[1_000, 10_000] {
        let records = make_records(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| bucket_by_month(black_box(records.clone())));
        });
    }
    group.finish();
}

// ── 3. Aggregation ───────────────────────────────────────────────────

fn bench_aggregate(c: &mut Criterion) {
    let series = bucket_by_month(make_records(10_000));
    c.bench_function("aggregate_10000", |b| {
        b.iter(|| aggregate(black_box(&series), 100_000.0));
    });
}

// ── 4. Asset metrics ─────────────────────────────────────────────────

fn bench_asset_metrics(c: &mut Criterion) {
    let records = make_records(10_000);
    c.bench_function("derive_asset_result_10000", |b| {
        b.iter(|| derive_asset_result("EURUSD", black_box(&records), 100_000.0));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_bucket,
    bench_aggregate,
    bench_asset_metrics,
);
criterion_main!(benches);
