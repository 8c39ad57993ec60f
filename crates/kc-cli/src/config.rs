//! CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Configuration files used when `kc import` is given none.
    pub sources: Vec<PathBuf>,

    /// JSON state file backing the store.
    pub state_file: Option<PathBuf>,

    /// Delete persisted entities absent from the configuration by default.
    pub delete_all_others: bool,

    /// Output format.
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Loads configuration from the default location.
    ///
    /// ## Errors
    ///
    /// Returns an error if the home directory is unknown or the file exists
    /// but cannot be read or parsed.
    pub fn load() -> CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from a file; a missing file gives the defaults.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Gets the configuration file path.
    ///
    /// ## Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".keycloak").join("kc-sync.toml"))
    }

    /// Renders the configuration as TOML.
    ///
    /// ## Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}
