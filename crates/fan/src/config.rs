//! Program configuration, stored as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::ParameterTable;

use crate::monitor::{BackendKind, CameraReset};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Viewer connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub host: String,
    pub port: u16,
    /// Camera behaviour when a call does not choose one
    pub reset_camera: CameraReset,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3939,
            reset_camera: CameraReset::Center,
            timeout_ms: 2000,
        }
    }
}

impl ViewerConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Monitor chain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Backends tried in order
    pub backends: Vec<BackendKind>,
    pub viewer: ViewerConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            backends: vec![BackendKind::Viewer, BackendKind::Notebook, BackendKind::NoOp],
            viewer: ViewerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    pub monitor: MonitorConfig,
    /// Overrides merged over the default parameter table
    pub parameters: ParameterTable,
    /// Where `--print` output goes when no directory is given
    pub export_dir: Option<PathBuf>,
}

impl FanConfig {
    /// Config file in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cf-fan", "cf-fan")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, or from the platform config directory.
    ///
    /// An explicit path must exist. A missing file in the config directory
    /// gives the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;
        std::fs::write(path, json).map_err(write_err)
    }
}
