//! FILENAME: app/src/config.rs
// PURPOSE: Dashboard configuration, loaded once at startup from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dataset::{AgeBands, LookupError};
use view_adapters::{AdapterOptions, ViewKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    AgeBands(#[from] LookupError),

    #[error("no views enabled")]
    NoViews,

    #[error("view listed twice: {0}")]
    DuplicateView(ViewKind),
}

/// Age band layout: `[start, start+width), ...` up to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBandConfig {
    pub start: u32,
    pub end: u32,
    pub width: u32,
}

impl Default for AgeBandConfig {
    fn default() -> Self {
        AgeBandConfig {
            start: AgeBands::STANDARD_START,
            end: AgeBands::STANDARD_END,
            width: AgeBands::STANDARD_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file with the shopping trends records.
    pub dataset_path: PathBuf,

    /// Unified log file. `None` keeps logging on the `log` facade only.
    pub log_file: Option<PathBuf>,

    pub age_bands: AgeBandConfig,

    /// Drop the `unbanded` age group from age-grouped views.
    pub exclude_unbanded: bool,

    /// Views to build, in display order.
    pub views: Vec<ViewKind>,

    /// Recompute stale views on scoped worker threads.
    pub parallel: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            dataset_path: PathBuf::from("shopping_trends.csv"),
            log_file: None,
            age_bands: AgeBandConfig::default(),
            exclude_unbanded: false,
            views: ViewKind::ALL.to_vec(),
            parallel: false,
        }
    }
}

impl DashboardConfig {
    /// Reads and validates a JSON config file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bands()?;
        if self.views.is_empty() {
            return Err(ConfigError::NoViews);
        }
        for (i, kind) in self.views.iter().enumerate() {
            if self.views[..i].contains(kind) {
                return Err(ConfigError::DuplicateView(*kind));
            }
        }
        Ok(())
    }

    pub fn bands(&self) -> Result<AgeBands, ConfigError> {
        let AgeBandConfig { start, end, width } = self.age_bands;
        Ok(AgeBands::new(start, end, width)?)
    }

    pub fn adapter_options(&self) -> AdapterOptions {
        AdapterOptions {
            exclude_unbanded: self.exclude_unbanded,
        }
    }
}
