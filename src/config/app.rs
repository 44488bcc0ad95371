//! Application configuration loading from config.toml
//!
//! The server reads its bind address, CORS origins and bulk import defaults
//! from a TOML file. Every key is optional; a missing file yields the defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Bulk member import settings
    pub import: ImportConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Bulk member import settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Product name used for rows whose product column is blank
    pub fallback_product_name: String,
    /// Remaining session count used for rows whose remaining column is blank
    pub default_remaining: i32,
    /// How many row failure messages are returned to the caller
    pub error_report_limit: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            fallback_product_name: "기본 회원권".to_string(),
            default_remaining: 100,
            error_report_limit: 10,
        }
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `./config.toml`, or the defaults if the file is absent.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::info!("No config.toml found, using default configuration");
        return Ok(AppConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            [server]
            bind_address = "127.0.0.1:9000"
            allowed_origins = ["http://localhost:5173"]

            [import]
            fallback_product_name = "일반 회원권"
            default_remaining = 30
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.server.allowed_origins.len(), 1);
        assert_eq!(config.import.fallback_product_name, "일반 회원권");
        assert_eq!(config.import.default_remaining, 30);
        // Unspecified keys keep their defaults
        assert_eq!(config.import.error_report_limit, 10);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8000");
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.import.fallback_product_name, "기본 회원권");
        assert_eq!(config.import.default_remaining, 100);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
