//! Statistics run configuration (TOML).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use tradelog_core::parser::DEFAULT_FILE_SEPARATOR;

/// Default account balance the monthly returns are measured against.
pub const DEFAULT_STARTING_CASH: f64 = 100_000.0;

/// Errors from loading or validating a [`StatsConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything a statistics run needs besides the logs themselves.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Directory scanned for `<ASSET><separator>*.<extension>` logs.
    pub reports_dir: PathBuf,
    pub starting_cash: f64,
    pub file_separator: String,
    /// Without the leading dot.
    pub file_extension: String,
    /// Only these instruments are loaded when set.
    pub assets: Option<Vec<String>>,
    /// Capital allocated to each instrument when deriving per-asset results.
    /// Defaults to `starting_cash` split evenly across instruments.
    pub asset_initial_value: Option<f64>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("temp_reports"),
            starting_cash: DEFAULT_STARTING_CASH,
            file_separator: DEFAULT_FILE_SEPARATOR.to_string(),
            file_extension: "txt".to_string(),
            assets: None,
            asset_initial_value: None,
        }
    }
}

impl StatsConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.starting_cash.is_finite() || self.starting_cash <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "starting_cash must be a positive number, got {}",
                self.starting_cash
            )));
        }
        if self.file_separator.is_empty() {
            return Err(ConfigError::Invalid("file_separator must not be empty".into()));
        }
        if self.file_extension.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "file_extension is given without the dot, got '{}'",
                self.file_extension
            )));
        }
        if let Some(v) = self.asset_initial_value {
            if !v.is_finite() || v <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "asset_initial_value must be a positive number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Whether the allowlist (if any) admits `asset`.
    pub fn accepts_asset(&self, asset: &str) -> bool {
        match &self.assets {
            Some(list) => list.iter().any(|a| a == asset),
            None => true,
        }
    }

    /// Capital allocated to each of `asset_count` instruments.
    pub fn initial_value_for(&self, asset_count: usize) -> f64 {
        match self.asset_initial_value {
            Some(v) => v,
            None if asset_count == 0 => self.starting_cash,
            None => self.starting_cash / asset_count as f64,
        }
    }

    /// Deterministic BLAKE3 hash of this configuration.
    ///
    /// Two runs with identical settings share a hash, which the manifest
    /// records next to the dataset hash.
    pub fn config_hash(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
