//! Configuration management for the docbridge gateway.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config file (docbridge.yaml)
//!
//! Environment variables override the config file; CLI flags override both.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default base URL of the external document-search service.
pub const DEFAULT_SEARCH_BASE_URL: &str = "http://localhost:8000";

/// Default base URL of the local EXAONE inference server.
pub const DEFAULT_EXAONE_BASE_URL: &str = "http://localhost:8080";

/// Default Gemini model version identifier.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default HTTP listen port for the gateway.
pub const DEFAULT_PORT: u16 = 3000;

/// Default timeout for outbound requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main application configuration.
///
/// Holds every knob the gateway needs: collaborator base URLs, backend
/// credentials, the listen port, and logging options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the document-search service
    pub search_base_url: String,

    /// API key for the hosted Gemini backend
    pub gemini_api_key: Option<String>,

    /// Gemini model version identifier
    pub gemini_model: String,

    /// Base URL of the local EXAONE inference server
    pub exaone_base_url: String,

    /// Port the gateway listens on
    pub port: u16,

    /// Timeout for outbound HTTP requests, in seconds
    pub request_timeout_secs: u64,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    search: Option<SearchConfig>,
    gemini: Option<GeminiConfig>,
    exaone: Option<ExaoneConfig>,
    server: Option<ServerConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchConfig {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiConfig {
    /// Name of the environment variable holding the API key
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExaoneConfig {
    base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            exaone_base_url: DEFAULT_EXAONE_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `DOCBRIDGE_CONFIG`: Path to config file (default: `docbridge.yaml`)
    /// - `SEARCH_API_BASE_URL`: Base URL of the search service
    /// - `GEMINI_API_KEY`: Gemini API key
    /// - `GEMINI_MODEL_VERSION`: Gemini model version identifier
    /// - `EXAONE_BASE_URL`: Base URL of the EXAONE server
    /// - `DOCBRIDGE_PORT`: Listen port
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("DOCBRIDGE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("docbridge.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(base_url) = std::env::var("SEARCH_API_BASE_URL") {
            config.search_base_url = base_url;
        }

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.gemini_api_key = Some(key);
            }
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL_VERSION") {
            config.gemini_model = model;
        }

        if let Ok(base_url) = std::env::var("EXAONE_BASE_URL") {
            config.exaone_base_url = base_url;
        }

        if let Ok(port) = std::env::var("DOCBRIDGE_PORT") {
            config.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid DOCBRIDGE_PORT: {}", port)))?;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(search) = config_file.search {
            if let Some(base_url) = search.base_url {
                result.search_base_url = base_url;
            }
            if let Some(timeout) = search.timeout_secs {
                result.request_timeout_secs = timeout;
            }
        }

        if let Some(gemini) = config_file.gemini {
            if let Some(model) = gemini.model {
                result.gemini_model = model;
            }
            // Key material stays in the environment; the file only names the variable
            if let Some(env_var) = gemini.api_key_env {
                if let Ok(key) = std::env::var(&env_var) {
                    result.gemini_api_key = Some(key);
                }
            }
        }

        if let Some(exaone) = config_file.exaone {
            if let Some(base_url) = exaone.base_url {
                result.exaone_base_url = base_url;
            }
        }

        if let Some(server) = config_file.server {
            if let Some(port) = server.port {
                result.port = port;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over both environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        port: Option<u16>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(port) = port {
            self.port = port;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for the requested backend.
    ///
    /// The Gemini backend requires an API key; EXAONE only needs a base URL.
    pub fn validate_backend(&self, backend: &str) -> AppResult<()> {
        match backend {
            "gemini" => {
                if self.gemini_api_key.is_none() {
                    return Err(AppError::Config(
                        "Gemini backend requires GEMINI_API_KEY".to_string(),
                    ));
                }
                Ok(())
            }
            "exaone" => Ok(()),
            other => Err(AppError::Config(format!("Unknown backend: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.search_base_url, DEFAULT_SEARCH_BASE_URL);
        assert_eq!(config.exaone_base_url, DEFAULT_EXAONE_BASE_URL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.gemini_api_key.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(None, Some(8081), None, true, false);

        assert_eq!(overridden.port, 8081);
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_backend_gemini_requires_key() {
        let config = AppConfig::default();
        assert!(config.validate_backend("gemini").is_err());

        let config = AppConfig {
            gemini_api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate_backend("gemini").is_ok());
    }

    #[test]
    fn test_validate_backend_exaone() {
        let config = AppConfig::default();
        assert!(config.validate_backend("exaone").is_ok());
    }

    #[test]
    fn test_validate_backend_unknown() {
        let config = AppConfig::default();
        assert!(config.validate_backend("mistral").is_err());
    }
}
