//! Export orchestrator for artifacts and reports.

use anyhow::Result;
use std::path::{Path, PathBuf};

use tradelog_core::heatmap::HeatmapSet;

use crate::reporting::artifacts::{write_heatmaps, ArtifactManager, ArtifactPaths};
use crate::reporting::reports::TextReportGenerator;
use crate::runner::StatsRun;

pub fn export_run_with_report(
    output_dir: impl AsRef<Path>,
    run: &StatsRun,
    include_report: bool,
) -> Result<ArtifactPaths> {
    let manager = ArtifactManager::new(output_dir)?;
    let mut paths = manager.save_run(run)?;

    if include_report {
        let report_path = manager.output_dir().join("report.txt");
        let report = TextReportGenerator.generate(run);
        std::fs::write(&report_path, report)?;
        paths.report_text = Some(report_path);
    }

    Ok(paths)
}

/// Only the heatmap grids, without the rest of the run artifacts.
pub fn export_heatmaps(output_dir: impl AsRef<Path>, set: &HeatmapSet) -> Result<Vec<PathBuf>> {
    let manager = ArtifactManager::new(output_dir)?;
    write_heatmaps(manager.output_dir(), set)
}
