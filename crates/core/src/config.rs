//! Per-user defaults for new scene files.
//!
//! Stored as TOML, by default at `smartsave.toml` in the platform config
//! directory. Every key is optional.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::naming::{DEFAULT_DESCRIPTOR, DEFAULT_EXTENSION};
use crate::scene_file::SceneFile;

pub const CONFIG_FILE_NAME: &str = "smartsave.toml";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SmartSaveConfig {
    /// Directory new scenes are saved into. Empty means the working directory.
    pub directory: Option<PathBuf>,
    pub descriptor: Option<String>,
    pub extension: Option<String>,
}

impl SmartSaveConfig {
    /// Loads `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "smartsave", "smartsave")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    pub fn descriptor(&self) -> &str {
        self.descriptor.as_deref().unwrap_or(DEFAULT_DESCRIPTOR)
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    /// Explicit-mode scene file at version 1 built from these defaults.
    pub fn scene_file(&self) -> Result<SceneFile, ConfigError> {
        let directory = self.directory.clone().unwrap_or_default();
        Ok(SceneFile::from_fields(
            directory,
            self.descriptor(),
            1,
            self.extension(),
        )?)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
