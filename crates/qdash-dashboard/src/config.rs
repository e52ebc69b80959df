//! Configuration management for the dashboard.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QDASH_ prefix)
//! 3. .env files
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! Command-line flags are applied on top by the binary.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Web server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling loop settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3000")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum qubits for circuit visualization (performance limit)
    #[serde(default = "default_max_circuit_qubits")]
    pub max_circuit_qubits: usize,
}

/// Upstream backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend (endpoints live under `/api/`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between refresh cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Seed for demo data; `None` draws a fresh seed
    #[serde(default)]
    pub demo_seed: Option<u64>,

    /// Number of jobs in a generated demo job table
    #[serde(default = "default_demo_jobs")]
    pub demo_jobs: usize,
}

/// Values given on the command line. Each one that is set replaces the
/// loaded value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub bind_address: Option<SocketAddr>,
    pub interval_secs: Option<u64>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_circuit_qubits() -> usize {
    50
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_interval_secs() -> u64 {
    5
}

fn default_demo_jobs() -> usize {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_circuit_qubits: default_max_circuit_qubits(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            demo_seed: None,
            demo_jobs: default_demo_jobs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load and validate configuration. See [`DashboardConfig::resolve`].
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::resolve(config_file)?;
        config.validate()?;
        Ok(config)
    }

    /// Assemble configuration without validating it, so that later overrides
    /// (command-line flags) can still replace bad values:
    /// 1. Load .env file if it exists
    /// 2. Load from file if provided
    /// 3. Apply environment variable overrides
    pub fn resolve(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::read_file(path)?,
            None => DashboardConfig::default(),
        };

        Ok(config.merge_env(|key| std::env::var(key).ok()))
    }

    /// Apply command-line overrides.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.api.base_url = url;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind.to_string();
        }
        if let Some(interval) = overrides.interval_secs {
            self.poll.interval_secs = interval;
        }
        self
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set override the current values; unparsable
    /// numeric values are ignored.
    pub fn merge_env<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("QDASH_BIND") {
            self.server.bind_address = v;
        }
        if let Some(v) = var("QDASH_MAX_CIRCUIT_QUBITS").and_then(|v| v.parse().ok()) {
            self.server.max_circuit_qubits = v;
        }
        if let Some(v) = var("QDASH_API_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = var("QDASH_API_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.api.timeout_ms = v;
        }
        if let Some(v) = var("QDASH_POLL_INTERVAL").and_then(|v| v.parse().ok()) {
            self.poll.interval_secs = v;
        }
        if let Some(v) = var("QDASH_DEMO_SEED").and_then(|v| v.parse().ok()) {
            self.poll.demo_seed = Some(v);
        }
        if let Some(v) = var("QDASH_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("QDASH_LOG_FORMAT") {
            self.logging.format = v;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        if self.server.max_circuit_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_circuit_qubits must be greater than 0".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid API URL '{}': {e}", self.api.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "API URL must use http or https: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "poll.interval_secs must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }
        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Get the parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "Invalid bind address: {}",
                self.server.bind_address
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.poll.interval_secs, 5);
        assert_eq!(config.logging.format, "console");
        assert_eq!(config.server.max_circuit_qubits, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default().merge_env(env(&[
            ("QDASH_BIND", "0.0.0.0:8080"),
            ("QDASH_API_URL", "http://backend:9000"),
            ("QDASH_POLL_INTERVAL", "10"),
            ("QDASH_DEMO_SEED", "77"),
            ("QDASH_API_TIMEOUT_MS", "not-a-number"),
            ("QDASH_MAX_CIRCUIT_QUBITS", "20"),
        ]));
        assert_eq!(config.server.max_circuit_qubits, 20);
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.poll.interval_secs, 10);
        assert_eq!(config.poll.demo_seed, Some(77));
        assert_eq!(config.api.timeout_ms, 5000);
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: http://10.0.0.5:5000\npoll:\n  interval_secs: 2").unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.poll.interval_secs, 2);
        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_from_missing_file() {
        let err = DashboardConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll: [not, a, map").unwrap();
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = DashboardConfig::default();
        config.server.bind_address = "nowhere".to_string();
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.poll.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.server.max_circuit_qubits = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_defers_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll:\n  interval_secs: 0").unwrap();

        assert!(DashboardConfig::from_file(file.path()).is_err());
        let config = DashboardConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.poll.interval_secs, 0);
        assert!(config.validate().is_err());

        let config = config.apply(ConfigOverrides {
            interval_secs: Some(3),
            ..ConfigOverrides::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_url_replaces_bad_env_url() {
        let config = DashboardConfig::default().merge_env(env(&[("QDASH_API_URL", "backend:9000")]));
        assert!(config.validate().is_err());

        let config = config.apply(ConfigOverrides {
            api_url: Some("http://127.0.0.1:9000".to_string()),
            bind_address: Some("0.0.0.0:8080".parse().unwrap()),
            interval_secs: None,
        });
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.poll.interval_secs, 5);
    }
}
