//! Monthly and yearly table export (CSV).

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use tradelog_core::aggregation::{MonthlySummary, YearlySummary};

pub fn write_monthly_csv(path: &Path, monthly: &[MonthlySummary]) -> Result<()> {
    write_rows(path, monthly)
}

pub fn write_yearly_csv(path: &Path, yearly: &[YearlySummary]) -> Result<()> {
    write_rows(path, yearly)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
