//! Configuration for dsregistry
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, Result};

/// Environment variable naming the registry root directory
pub const DATA_DIR_ENV: &str = "DATASOURCE_DIR";

/// Main configuration for a registry instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory holding one subdirectory per data source.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── 1/data_source_metadata.json
    ///     └── 2/data_source_metadata.json
    ///
    /// Must already exist; the store never creates it.
    pub data_dir: PathBuf,

    /// fsync each metadata file before `create` returns
    pub sync_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./datasources"),
            sync_writes: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a config whose root comes from `DATASOURCE_DIR`
    ///
    /// A `.env` file in the working directory or any parent is loaded
    /// first. Variables already set in the process win over the file.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(RegistryError::Config(format!(".env: {}", e))),
        }
        Self::from_process_env()
    }

    /// Like `from_env`, but loads the given dotenv file instead of searching
    pub fn from_env_file(path: &Path) -> Result<Self> {
        dotenvy::from_path(path)
            .map_err(|e| RegistryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self> {
        match env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Ok(Self::builder().data_dir(dir).build()),
            Ok(_) => Err(RegistryError::Config(format!("{} is empty", DATA_DIR_ENV))),
            Err(e) => Err(RegistryError::Config(format!("{}: {}", DATA_DIR_ENV, e))),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the registry root directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Enable or disable fsync after each metadata write
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
