//! Reporting and artifact export pipeline.

pub mod artifacts;
pub mod reports;
pub mod export;

pub use artifacts::{ArtifactManager, ArtifactPaths};
pub use export::{export_heatmaps, export_run_with_report};
