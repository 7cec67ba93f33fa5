//! Trade-log discovery and loading.
//!
//! Scans the reports directory for `<ASSET><separator>*.<ext>` files and
//! parses them in parallel. Failure policy:
//! 1. Missing directory → empty load (the run reports "no data")
//! 2. Directory unreachable (permissions) or not listable → hard error
//! 3. Unreadable or non-UTF-8 file → warning, the file contributes nothing
//! 4. Malformed entry inside a file → discarded by the parser
//!
//! Records come back in file-path order regardless of how the parallel
//! reads were scheduled.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use tradelog_core::domain::{Asset, TradeRecord};
use tradelog_core::parser::{asset_from_file_name, parse_log};

use crate::config::StatsConfig;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot access reports directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A discovered log file and the instrument it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub asset: Asset,
    pub path: PathBuf,
}

/// A file that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWarning {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a reports directory.
#[derive(Debug, Default)]
pub struct LoadedLogs {
    /// All valid records, file by file in path order.
    pub records: Vec<TradeRecord>,
    /// Files that were discovered (including ones that later failed).
    pub files: Vec<LogFile>,
    pub warnings: Vec<FileWarning>,
    /// BLAKE3 over the raw bytes of every file that was read, in path order.
    pub dataset_hash: String,
}

impl LoadedLogs {
    /// Records grouped per instrument, assets in name order.
    pub fn by_asset(&self) -> BTreeMap<Asset, Vec<TradeRecord>> {
        let mut grouped: BTreeMap<Asset, Vec<TradeRecord>> = BTreeMap::new();
        for record in &self.records {
            grouped
                .entry(record.asset.clone())
                .or_default()
                .push(record.clone());
        }
        grouped
    }
}

/// List trade-log files in `config.reports_dir`, sorted by path.
pub fn discover_logs(config: &StatsConfig) -> Result<Vec<LogFile>, LoadError> {
    let dir = &config.reports_dir;
    match dir.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            warn!(dir = %dir.display(), "reports directory does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(LoadError::DirectoryUnreadable {
                path: dir.clone(),
                source,
            })
        }
    }

    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::DirectoryUnreadable {
        path: dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::DirectoryUnreadable {
            path: dir.clone(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(config.file_extension.as_str()) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(asset) = asset_from_file_name(name, &config.file_separator) else {
            continue;
        };
        if !config.accepts_asset(asset) {
            debug!(asset, "asset not in allowlist, skipping");
            continue;
        }
        files.push(LogFile {
            asset: asset.to_string(),
            path,
        });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Discover and parse every trade log under the configured directory.
pub fn load_trade_logs(config: &StatsConfig) -> Result<LoadedLogs, LoadError> {
    let files = discover_logs(config)?;
    Ok(load_files(files))
}

enum FileOutcome {
    Parsed { records: Vec<TradeRecord>, hash: blake3::Hash },
    Skipped(FileWarning),
}

/// Read and parse already-discovered files. Never fails as a whole.
pub fn load_files(files: Vec<LogFile>) -> LoadedLogs {
    let outcomes: Vec<FileOutcome> = files.par_iter().map(load_one).collect();

    let mut hasher = blake3::Hasher::new();
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for (file, outcome) in files.iter().zip(outcomes) {
        match outcome {
            FileOutcome::Parsed {
                records: parsed,
                hash,
            } => {
                hasher.update(file.asset.as_bytes());
                hasher.update(hash.as_bytes());
                records.extend(parsed);
            }
            FileOutcome::Skipped(warning) => warnings.push(warning),
        }
    }

    LoadedLogs {
        records,
        files,
        warnings,
        dataset_hash: hasher.finalize().to_hex().to_string(),
    }
}

fn load_one(file: &LogFile) -> FileOutcome {
    match read_log(&file.path) {
        Ok(text) => {
            let records: Vec<TradeRecord> = parse_log(&file.asset, &text).collect();
            debug!(
                asset = %file.asset,
                path = %file.path.display(),
                records = records.len(),
                "parsed trade log"
            );
            FileOutcome::Parsed {
                records,
                hash: blake3::hash(text.as_bytes()),
            }
        }
        Err(reason) => {
            warn!(path = %file.path.display(), %reason, "skipping unreadable trade log");
            FileOutcome::Skipped(FileWarning {
                path: file.path.clone(),
                reason,
            })
        }
    }
}

fn read_log(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {e}"))
}
