//! Dashboard configuration.
//!
//! The default configuration is embedded at compile time from
//! `config/default.toml`. A config file given on the command line replaces
//! it wholesale; a couple of environment variables override single values
//! on top of whichever file was used.

use std::path::{Path, PathBuf};

use blossom_map_chart::ChartOptions;
use blossom_map_filter_models::Season;
use blossom_map_neighbourhood_models::{BoundaryFetcherConfig, BoundarySource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The configuration baked into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Overrides `[data] trees_path`.
pub const TREES_PATH_ENV: &str = "BLOSSOM_MAP_TREES_PATH";

/// Replaces the boundary source with a `GeoJSON` URL.
pub const BOUNDARIES_URL_ENV: &str = "BLOSSOM_MAP_BOUNDARIES_URL";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML could not be parsed into a configuration.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but is unusable.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Where the tree inventory lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the processed tree CSV.
    pub trees_path: PathBuf,
}

/// Everything needed to open a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Tree inventory location.
    pub data: DataConfig,
    /// Neighbourhood polygon source.
    pub boundaries: BoundarySource,
    /// Default bloom date window.
    #[serde(default)]
    pub season: Season,
    /// Chart tunables.
    #[serde(default)]
    pub charts: ChartOptions,
}

impl DashboardConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or the season is
    /// reversed.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_CONFIG_TOML)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Reads `path` if given, otherwise the embedded default, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be read or
    /// parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_path(path)?
            }
            None => Self::embedded()?,
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides looked up by environment variable name.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(TREES_PATH_ENV).filter(|v| !v.is_empty()) {
            log::debug!("{TREES_PATH_ENV} overrides trees path with {path}");
            self.data.trees_path = PathBuf::from(path);
        }
        if let Some(url) = lookup(BOUNDARIES_URL_ENV).filter(|v| !v.is_empty()) {
            log::debug!("{BOUNDARIES_URL_ENV} overrides boundary source with {url}");
            self.boundaries.fetcher = BoundaryFetcherConfig::GeojsonUrl { url };
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.season.start > self.season.end {
            return Err(ConfigError::Invalid {
                message: format!(
                    "season starts {} after it ends {}",
                    self.season.start, self.season.end
                ),
            });
        }
        let [lo, hi] = self.charts.diameter_domain_cm;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ConfigError::Invalid {
                message: format!("diameter domain [{lo}, {hi}] is empty"),
            });
        }
        Ok(())
    }
}
