//! Fixed-width text report generator.

use std::fmt::Write as _;

use tradelog_core::aggregation::{StatsOutcome, TradeStatistics};
use tradelog_core::buckets::YearMonth;
use tradelog_core::domain::format_ratio;
use tradelog_core::portfolio::PortfolioSummary;

use crate::runner::StatsRun;

const RULE_WIDE: usize = 100;
const RULE: usize = 60;

pub struct TextReportGenerator;

impl TextReportGenerator {
    /// Full report for a run: statistics tables, then the portfolio section.
    ///
    /// A no-data run renders as a single line.
    pub fn generate(&self, run: &StatsRun) -> String {
        let stats = match &run.outcome {
            StatsOutcome::NoData => {
                return format!(
                    "No data: no valid trade records found in {}\n",
                    run.config.reports_dir.display()
                );
            }
            StatsOutcome::Computed(stats) => stats,
        };

        let mut out = self.statistics_section(stats);
        if let Some(portfolio) = &run.portfolio {
            out.push('\n');
            out.push_str(&self.portfolio_section(portfolio));
        }
        let _ = writeln!(
            out,
            "Statistics generated from {} trades in {} files (dataset {})",
            stats.trade_count,
            run.files_loaded,
            short_hash(&run.dataset_hash)
        );
        for w in &run.warnings {
            let _ = writeln!(out, "Skipped {}: {}", w.path.display(), w.reason);
        }
        out
    }

    /// Monthly entry statistics, yearly summary, monthly profitability, yearly returns.
    pub fn statistics_section(&self, stats: &TradeStatistics) -> String {
        let mut out = String::new();
        let wide = "=".repeat(RULE_WIDE);
        let rule = "-".repeat(RULE);

        let _ = writeln!(out, "{wide}");
        let _ = writeln!(out, "MONTHLY STATISTICS ANALYSIS");
        let _ = writeln!(out, "{wide}");

        // ── Entry counts ──
        let _ = writeln!(out, "\nMONTHLY ENTRY STATISTICS");
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:>8} {:>8} {:>8} {:>8}",
            "Year", "Month", "Total", "Winners", "Losers", "Max/Day"
        );
        let _ = writeln!(out, "{rule}");
        for m in &stats.monthly {
            let _ = writeln!(
                out,
                "{:<6} {:<10} {:>8} {:>8} {:>8} {:>8}",
                m.year,
                YearMonth::new(m.year, m.month).month_abbr(),
                m.total,
                m.winners,
                m.losers,
                m.max_daily
            );
        }
        let _ = writeln!(out, "{rule}");
        for y in &stats.yearly {
            let _ = writeln!(
                out,
                "{:<6} {:<10} {:>8} {:>8} {:>8} {:>8}",
                y.year, "TOTAL", y.total, y.winners, y.losers, y.max_daily
            );
        }

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^60}", "YEARLY SUMMARY");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{:<6} {:>8} {:>8} {:>8} {:>10} {:>8}",
            "Year", "Total", "Winners", "Losers", "Win Rate", "Max/Day"
        );
        let _ = writeln!(out, "{rule}");
        for y in &stats.yearly {
            let _ = writeln!(
                out,
                "{:<6} {:>8} {:>8} {:>8} {:>9.1}% {:>8}",
                y.year, y.total, y.winners, y.losers, y.win_rate, y.max_daily
            );
        }

        // ── Profitability ──
        let _ = writeln!(out, "\nMONTHLY PROFITABILITY (% relative to accumulated balance)");
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:>12} {:>12} {:>12}",
            "Year", "Month", "PnL ($)", "Return (%)", "Cumulative"
        );
        let _ = writeln!(out, "{rule}");
        for m in &stats.monthly {
            let _ = writeln!(
                out,
                "{:<6} {:<10} {:>12} {:>11.2}% {:>12}",
                m.year,
                YearMonth::new(m.year, m.month).month_abbr(),
                dollars(m.net_pnl),
                m.return_pct,
                dollars(m.balance_after)
            );
        }

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^60}", "YEARLY SUMMARY");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{:<6} {:>12} {:>12} {:>14}",
            "Year", "Return (%)", "CAGR (%)", "Final Balance"
        );
        let _ = writeln!(out, "{rule}");
        for y in &stats.yearly {
            let _ = writeln!(
                out,
                "{:<6} {:>11.2}% {:>11.2}% {:>14}",
                y.year,
                y.cumulative_return,
                y.cagr,
                dollars(y.ending_balance)
            );
        }
        let _ = writeln!(out, "{wide}");
        out
    }

    /// Portfolio values, per-asset trade statistics and risk metrics.
    pub fn portfolio_section(&self, p: &PortfolioSummary) -> String {
        let mut out = String::new();
        let rule = "=".repeat(80);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "PORTFOLIO AGGREGATION");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Initial Portfolio Value: {}", dollars(p.total_initial));
        let _ = writeln!(out, "Final Portfolio Value:   {}", dollars(p.total_final));
        let _ = writeln!(out, "Total Profit/Loss:       {}", dollars(p.total_pnl));
        let _ = writeln!(out, "Total Return:            {:+.2}%", p.total_return_pct);

        let _ = writeln!(out, "\nINDIVIDUAL ASSET PERFORMANCE:");
        for a in &p.assets {
            let _ = writeln!(
                out,
                "  {:<8}: {:>11} ({:>+6.2}%)",
                a.asset,
                signed_dollars(a.pnl),
                a.return_pct
            );
        }

        let _ = writeln!(out, "\nTRADE STATISTICS:");
        for a in &p.assets {
            let _ = writeln!(
                out,
                "  {:<8}: {:>3} trades | {:>3} wins | {:>3} losses | {:>5.1}% WR | PF: {}",
                a.asset,
                a.trades,
                a.wins,
                a.losses,
                a.win_rate,
                format_ratio(a.profit_factor)
            );
        }
        let _ = writeln!(
            out,
            "  {:<8}: {:>3} trades | {:>3} wins | {:>3} losses | {:>5.1}% WR | PF: {}",
            "TOTAL",
            p.total_trades,
            p.total_wins,
            p.total_losses,
            p.portfolio_win_rate,
            format_ratio(p.portfolio_profit_factor)
        );

        let _ = writeln!(out, "\nRISK METRICS:");
        for a in &p.assets {
            let _ = writeln!(
                out,
                "  {:<8}: Max DD: {:>5.2}% | Sharpe: {:>6.3} | PF: {}",
                a.asset,
                a.max_drawdown_pct,
                a.risk_ratio,
                format_ratio(a.profit_factor)
            );
        }
        let _ = writeln!(
            out,
            "  {:<8}: Portfolio PF: {}",
            "PORTFOLIO",
            format_ratio(p.portfolio_profit_factor)
        );
        let _ = writeln!(out, "{rule}");
        out
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

/// `1234.5` → `1,234.50`. Sign kept in front.
pub fn thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.00 prints without a sign.
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// `-1234.5` → `-$1,234.50`.
pub fn dollars(value: f64) -> String {
    let body = thousands(value);
    match body.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${body}"),
    }
}

/// Like [`dollars`], with an explicit `+` for non-negative values.
pub fn signed_dollars(value: f64) -> String {
    let body = dollars(value);
    if body.starts_with('-') {
        body
    } else {
        format!("+{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradelog_core::domain::AssetResult;
    use tradelog_core::portfolio::aggregate_portfolio;

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(999.999), "1,000.00");
        assert_eq!(thousands(1234.5), "1,234.50");
        assert_eq!(thousands(-1_234_567.891), "-1,234,567.89");
        assert_eq!(thousands(-0.001), "0.00");
        assert_eq!(thousands(100_000.0), "100,000.00");
    }

    #[test]
    fn dollar_signs() {
        assert_eq!(dollars(-50.0), "-$50.00");
        assert_eq!(dollars(1250.0), "$1,250.00");
        assert_eq!(signed_dollars(10.0), "+$10.00");
        assert_eq!(signed_dollars(-10.0), "-$10.00");
    }

    #[test]
    fn portfolio_section_prints_infinity() {
        let p = aggregate_portfolio(&[AssetResult {
            asset: "EURUSD".into(),
            won: 3,
            lost: 0,
            gross_profit: 300.0,
            gross_loss: 0.0,
            max_drawdown: 0.0,
            drawdown_unit: None,
            risk_ratio: 0.0,
            initial_value: 10_000.0,
            final_value: 10_300.0,
        }]);
        let text = TextReportGenerator.portfolio_section(&p);
        assert!(text.contains("Portfolio PF: ∞"));
        assert!(text.contains("EURUSD  :   3 trades"));
        assert!(text.contains("Total Return:            +3.00%"));
    }
}
