//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] on top of a single JSON document.  A missing
//! file is not an error: the flight software runs on defaults, exactly as
//! on a first boot.  Both `load` and `save` validate before returning.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::FswConfig;

/// File-backed configuration store.
pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, writing the defaults out first if the file does not
    /// exist yet, so the operator gets a complete template to edit.
    pub fn load_or_init(&self) -> Result<FswConfig, ConfigError> {
        if self.path.exists() {
            return self.load();
        }
        let cfg = FswConfig::default();
        self.save(&cfg)?;
        info!("JsonFileConfig: wrote defaults to {}", self.path.display());
        Ok(cfg)
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<FswConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("JsonFileConfig: {} not found, using defaults", self.path.display());
                return Ok(FswConfig::default());
            }
            Err(e) => {
                warn!("JsonFileConfig: reading {} failed: {e}", self.path.display());
                return Err(ConfigError::IoError);
            }
        };

        let cfg: FswConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("JsonFileConfig: {} is not valid config: {e}", self.path.display());
            ConfigError::Corrupted
        })?;
        cfg.validate()?;
        info!("JsonFileConfig: loaded config from {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &FswConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        std::fs::write(&self.path, text).map_err(|e| {
            warn!("JsonFileConfig: writing {} failed: {e}", self.path.display());
            ConfigError::IoError
        })
    }
}
