//! TradeLog CLI — statistics, portfolio and heatmap commands.
//!
//! Commands:
//! - `stats` — load trade logs, print monthly/yearly tables and the portfolio section
//! - `portfolio` — print the portfolio section for externally produced asset results
//! - `heatmap` — write the year × month grid CSVs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tradelog_core::portfolio::aggregate_portfolio;
use tradelog_runner::reporting::reports::TextReportGenerator;
use tradelog_runner::{
    export_heatmaps, export_run_with_report, load_asset_results, run_statistics, StatsConfig,
};

#[derive(Parser)]
#[command(
    name = "tradelog",
    about = "TradeLog CLI — monthly, yearly and portfolio statistics from trade logs"
)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence when set).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics from a directory of trade logs.
    Stats {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding `<ASSET>_trades_*.txt` logs. Overrides the config file.
        #[arg(long)]
        reports_dir: Option<PathBuf>,

        /// Starting account balance. Overrides the config file.
        #[arg(long)]
        starting_cash: Option<f64>,

        /// Write CSV/JSON artifacts and report.txt into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Merge externally produced per-asset results into a portfolio view.
    Portfolio {
        /// JSON array of asset results.
        #[arg(long)]
        results: PathBuf,
    },
    /// Write heatmap grid CSVs (total, winners, losers, max_daily, return_pct).
    Heatmap {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding the trade logs. Overrides the config file.
        #[arg(long)]
        reports_dir: Option<PathBuf>,

        /// Directory for the heatmap CSVs.
        #[arg(long)]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Stats {
            config,
            reports_dir,
            starting_cash,
            output_dir,
        } => run_stats_cmd(config, reports_dir, starting_cash, output_dir),
        Commands::Portfolio { results } => run_portfolio_cmd(results),
        Commands::Heatmap {
            config,
            reports_dir,
            output_dir,
        } => run_heatmap_cmd(config, reports_dir, output_dir),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tradelog=debug" } else { "tradelog=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(
    config_path: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    starting_cash: Option<f64>,
) -> Result<StatsConfig> {
    let mut config = match config_path {
        Some(path) => StatsConfig::from_file(&path)?,
        None => StatsConfig::default(),
    };
    if let Some(dir) = reports_dir {
        config.reports_dir = dir;
    }
    if let Some(cash) = starting_cash {
        config.starting_cash = cash;
    }
    config.validate()?;
    Ok(config)
}

fn run_stats_cmd(
    config_path: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    starting_cash: Option<f64>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path, reports_dir, starting_cash)?;
    let run = run_statistics(&config)?;

    print!("{}", TextReportGenerator.generate(&run));

    if let Some(dir) = output_dir {
        let paths = export_run_with_report(&dir, &run, true)?;
        info!(
            dir = %dir.display(),
            heatmaps = paths.heatmaps.len(),
            "artifacts written"
        );
        println!("Artifacts saved to: {}", dir.display());
        println!("  manifest: {}", paths.manifest.display());
    }

    Ok(())
}

fn run_portfolio_cmd(results_path: PathBuf) -> Result<()> {
    let results = load_asset_results(&results_path)?;
    if results.is_empty() {
        println!("No asset results in {}", results_path.display());
        return Ok(());
    }
    let summary = aggregate_portfolio(&results);
    print!("{}", TextReportGenerator.portfolio_section(&summary));
    Ok(())
}

fn run_heatmap_cmd(
    config_path: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    output_dir: PathBuf,
) -> Result<()> {
    let config = resolve_config(config_path, reports_dir, None)?;
    let run = run_statistics(&config)?;

    let Some(set) = &run.heatmap else {
        println!(
            "No data: no valid trade records found in {}",
            config.reports_dir.display()
        );
        return Ok(());
    };

    let paths = export_heatmaps(&output_dir, set)?;
    println!(
        "Heatmaps for {} years written to {}:",
        set.years().len(),
        output_dir.display()
    );
    for path in &paths {
        println!("  {}", path.display());
    }
    Ok(())
}
