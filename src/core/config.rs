//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::VoltageTable;

/// Name of the local config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "qsched.yaml";

/// Errors loading an explicitly requested config file
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    #[diagnostic(code(qsched::config::io))]
    Io { path: PathBuf, message: String },

    #[error("Invalid config file {path}: {message}")]
    #[diagnostic(
        code(qsched::config::parse),
        help("Run `qsched config keys` to list the supported keys")
    )]
    Parse { path: PathBuf, message: String },
}

/// qsched configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the equipment catalog (JSON or YAML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Country used when neither the caller nor the quote names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_country: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Replaces the built-in exclusion list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_parts: Option<Vec<String>>,

    /// Appended to the exclusion list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_excluded_parts: Vec<String>,

    /// Keywords marking a description as motorized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motor_keywords: Option<Vec<String>>,

    /// Voltage tables merged over the built-in ones
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub voltages: BTreeMap<String, VoltageTable>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// `explicit` names a config file given on the command line; it replaces
    /// the local `qsched.yaml` lookup and must be readable.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // 1. Built-in defaults live in the embedded data files

        // 2. Global user config (~/.config/qsched/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_optional(&global_path) {
                config.merge(global);
            }
        }

        // 3. Explicit or local config
        match explicit {
            Some(path) => config.merge(Self::read_file(path)?),
            None => {
                if let Some(local) = Self::read_optional(&Self::local_config_path()) {
                    config.merge(local);
                }
            }
        }

        // 4. Environment variables
        if let Ok(catalog) = std::env::var("QSCHED_CATALOG") {
            config.catalog = Some(PathBuf::from(catalog));
        }
        if let Ok(country) = std::env::var("QSCHED_COUNTRY") {
            config.default_country = Some(country);
        }

        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "qsched")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Read a config file that must exist and parse
    pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read an implicit config file; missing files are skipped silently,
    /// broken ones with a warning
    fn read_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::read_file(path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config file");
                Some(config)
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable config file");
                None
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.default_country.is_some() {
            self.default_country = other.default_country;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.excluded_parts.is_some() {
            self.excluded_parts = other.excluded_parts;
        }
        self.extra_excluded_parts.extend(other.extra_excluded_parts);
        if other.motor_keywords.is_some() {
            self.motor_keywords = other.motor_keywords;
        }
        self.voltages.extend(other.voltages);
    }
}
