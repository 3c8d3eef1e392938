//! Configuration management for the self-service API
//!
//! Settings are resolved in this order (later wins):
//! 1. Default values
//! 2. Configuration file (TOML format)
//! 3. Environment variables

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main configuration struct, loaded once at startup and handed to each
/// component by reference
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Platform API connection
    pub openshift: OpenshiftConfig,
    /// Upper bounds for self-service quota changes
    pub quotas: QuotaConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Platform API connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenshiftConfig {
    /// Base URL of the master API, e.g. `https://master.example.com:8443`
    pub api_url: String,
    /// Service account token with cluster-admin rights
    pub token: String,
    /// Skip TLS certificate verification (self-signed masters)
    pub accept_invalid_certs: bool,
    /// Request timeout
    pub timeout_secs: u64,
}

/// Quota ceilings
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuotaConfig {
    /// Maximum CPU cores per project
    pub max_cpu: u32,
    /// Maximum memory per project in GiB
    pub max_memory: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Enable file logging
    pub file_logging_enabled: bool,
    /// Emit JSON lines on the console
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for OpenshiftConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            token: String::new(),
            accept_invalid_certs: false,
            timeout_secs: 30,
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_cpu: 30,
            max_memory: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/selfservice"),
            file_logging_enabled: false,
            json: false,
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("SELFSERVICE_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/selfservice/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply `SELFSERVICE_*` overrides, looked up through `var`
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = var("SELFSERVICE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SELFSERVICE_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // OpenShift
        if let Some(url) = var("SELFSERVICE_OPENSHIFT_API_URL") {
            self.openshift.api_url = url;
        }
        if let Some(token) = var("SELFSERVICE_OPENSHIFT_TOKEN") {
            self.openshift.token = token;
        }
        if let Some(insecure) = var("SELFSERVICE_OPENSHIFT_INSECURE") {
            self.openshift.accept_invalid_certs = insecure.parse().unwrap_or(false);
        }
        if let Some(secs) = var("SELFSERVICE_OPENSHIFT_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.openshift.timeout_secs = secs;
        }

        // Quotas
        if let Some(max) = var("SELFSERVICE_MAX_CPU").and_then(|m| m.parse().ok()) {
            self.quotas.max_cpu = max;
        }
        if let Some(max) = var("SELFSERVICE_MAX_MEMORY").and_then(|m| m.parse().ok()) {
            self.quotas.max_memory = max;
        }

        // Logging
        if let Some(level) = var("SELFSERVICE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = var("SELFSERVICE_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(path);
            self.logging.file_logging_enabled = true;
        }
        if let Some(json) = var("SELFSERVICE_LOG_JSON") {
            self.logging.json = json.parse().unwrap_or(false);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.openshift.api_url.is_empty() {
            return Err(ConfigError::Validation("OpenShift API URL cannot be empty".to_string()));
        }
        url::Url::parse(&self.openshift.api_url).map_err(|e| {
            ConfigError::Validation(format!("Invalid OpenShift API URL: {}", e))
        })?;

        if self.openshift.token.is_empty() {
            return Err(ConfigError::Validation("OpenShift token cannot be empty".to_string()));
        }

        if self.quotas.max_cpu == 0 || self.quotas.max_memory == 0 {
            return Err(ConfigError::Validation(
                "Quota ceilings must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Config validation failed: {0}")]
    Validation(String),
}
