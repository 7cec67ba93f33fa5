//! Heatmap grid export (one CSV per metric).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use tradelog_core::buckets::MONTH_ABBR;
use tradelog_core::heatmap::{HeatmapMetric, HeatmapSet, MonthGrid};

/// Write `heatmap_<metric>.csv` for every metric into `dir`.
pub fn write_heatmaps(dir: &Path, set: &HeatmapSet) -> Result<Vec<PathBuf>> {
    HeatmapMetric::ALL
        .iter()
        .map(|&metric| {
            let path = dir.join(format!("heatmap_{}.csv", metric.name()));
            write_grid_csv(&path, &set.grid_f64(metric))?;
            Ok(path)
        })
        .collect()
}

/// Columns: `year`, `Jan` … `Dec`. One row per year.
pub fn write_grid_csv(path: &Path, grid: &MonthGrid<f64>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create heatmap CSV {}", path.display()))?;

    let mut header = vec!["year"];
    header.extend(MONTH_ABBR);
    writer.write_record(&header)?;

    for (year, row) in grid.iter_rows() {
        let mut record = Vec::with_capacity(13);
        record.push(year.to_string());
        record.extend(row.iter().map(|v| format!("{v}")));
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
