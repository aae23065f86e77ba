//! Runtime configuration
//!
//! The API base URL comes from `INNBOARD_API_URL` (or a CLI flag upstream);
//! the session token lives under the user config directory, overridable with
//! `INNBOARD_CONFIG_DIR` so tests and parallel instances stay isolated.

use crate::error::CoreError;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base path when no environment override is present
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Environment variable overriding the API base path
pub const API_URL_ENV: &str = "INNBOARD_API_URL";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "INNBOARD_CONFIG_DIR";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base path every endpoint is joined onto, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Build from the environment, falling back to [`DEFAULT_API_URL`]
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url),
            _ => Self::default(),
        }
    }

    /// Build with an explicit base URL (trailing slashes stripped)
    pub fn with_base_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// Resolve the directory holding the persisted session file.
///
/// `INNBOARD_CONFIG_DIR` wins when set; otherwise the platform config dir
/// plus `innboard`. The directory is not created here.
pub fn config_dir() -> Result<PathBuf, CoreError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("innboard"))
        .ok_or(CoreError::ConfigDirNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_default() {
        std::env::remove_var(API_URL_ENV);
        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    #[serial]
    fn test_from_env_override() {
        std::env::set_var(API_URL_ENV, "https://pms.example.com/api/");
        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, "https://pms.example.com/api");
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_blank_falls_back() {
        std::env::set_var(API_URL_ENV, "   ");
        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_config_dir_env_override() {
        std::env::set_var(CONFIG_DIR_ENV, "/tmp/innboard-test-config");
        let dir = config_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/innboard-test-config"));
        std::env::remove_var(CONFIG_DIR_ENV);
    }
}
