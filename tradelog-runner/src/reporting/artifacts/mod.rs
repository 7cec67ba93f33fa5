//! Artifact manager for persisting run outputs.

mod heatmap;
mod manifest;
mod tables;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::runner::StatsRun;

pub use heatmap::{write_grid_csv, write_heatmaps};
pub use manifest::{RunManifest, SCHEMA_VERSION};

/// Artifact paths returned after export.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPaths {
    pub manifest: PathBuf,
    pub statistics_json: PathBuf,
    /// Absent for a no-data run.
    pub monthly_csv: Option<PathBuf>,
    pub yearly_csv: Option<PathBuf>,
    pub heatmaps: Vec<PathBuf>,
    pub portfolio_json: Option<PathBuf>,
    pub report_text: Option<PathBuf>,
}

/// Manages writing all artifacts for a run into one directory.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save complete run artifacts.
    pub fn save_run(&self, run: &StatsRun) -> Result<ArtifactPaths> {
        let manifest_path = self.output_dir.join("manifest.json");
        manifest::write_manifest(&manifest_path, run)?;

        let statistics_json = self.output_dir.join("statistics.json");
        write_json(&statistics_json, &run.outcome)?;

        let mut paths = ArtifactPaths {
            manifest: manifest_path,
            statistics_json,
            ..ArtifactPaths::default()
        };

        if let Some(stats) = run.outcome.statistics() {
            let monthly_csv = self.output_dir.join("monthly.csv");
            let yearly_csv = self.output_dir.join("yearly.csv");
            tables::write_monthly_csv(&monthly_csv, &stats.monthly)?;
            tables::write_yearly_csv(&yearly_csv, &stats.yearly)?;
            paths.monthly_csv = Some(monthly_csv);
            paths.yearly_csv = Some(yearly_csv);
        }

        if let Some(set) = &run.heatmap {
            paths.heatmaps = write_heatmaps(&self.output_dir, set)?;
        }

        if let Some(portfolio) = &run.portfolio {
            let portfolio_json = self.output_dir.join("portfolio.json");
            write_json(&portfolio_json, portfolio)?;
            paths.portfolio_json = Some(portfolio_json);
        }

        Ok(paths)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
