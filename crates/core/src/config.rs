//! Client configuration
//!
//! Base URLs for the HTTP API and the real-time channel. Resolution
//! order: explicit value, `API_URL`/`WS_URL` environment variables,
//! `<config_dir>/podium/config.toml`, then local development defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_WS_URL: &str = "ws://localhost:8000";

const API_URL_ENV: &str = "API_URL";
const WS_URL_ENV: &str = "WS_URL";

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub ws_url: String,
}

/// On-disk layout (all fields optional)
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    ws_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ws_url: ws_url.into(),
        }
    }

    /// Load configuration from the environment and the user config
    /// file, falling back to defaults.
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) if path.exists() => Self::read_file(&path)?,
            _ => ConfigFile::default(),
        };
        Ok(Self::resolve(file))
    }

    /// Load from a specific TOML file plus the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let file = Self::read_file(path)?;
        Ok(Self::resolve(file))
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    fn resolve(file: ConfigFile) -> Self {
        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let ws_url = std::env::var(WS_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.ws_url)
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());

        debug!(api_url = %api_url, ws_url = %ws_url, "Resolved client config");
        Self { api_url, ws_url }
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "podium").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
