//! Configuration loaded from `~/.cgdash/config.json`.
//!
//! Every field has a serde default, so a missing file or a partial file
//! still yields a usable config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::charts::layout::DEFAULT_CONTAINER_HEIGHT;
use crate::types::{Company, Role};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub role: Role,
    pub default_company: Company,
    pub request_timeout_secs: u64,
    pub chart_container_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            role: Role::default(),
            default_company: Company::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            chart_container_height: DEFAULT_CONTAINER_HEIGHT,
        }
    }
}

/// Get the canonical config file path (~/.cgdash/config.json)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".cgdash").join("config.json"))
}

/// Load configuration from ~/.cgdash/config.json
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:8000/");
        assert_eq!(config.role, Role::User);
        assert_eq!(config.default_company, Company::All);
        assert_eq!(config.chart_container_height, 235.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"apiBaseUrl": "https://cg.example.com/api/", "role": "ADMIN", "defaultCompany": "CGPISL"}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://cg.example.com/api/");
        assert_eq!(config.role, Role::Admin);
        assert_eq!(config.default_company, Company::Cgpisl);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse { .. })));
    }
}
