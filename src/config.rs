//! Service configuration.
//!
//! Precedence (lowest to highest): compiled defaults, YAML file, environment
//! variables (`LDPOLICY_HOST`, `LDPOLICY_PORT`, `LDPOLICY_MAX_DEPTH`,
//! `RUST_LOG`).

use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse YAML: {}", e),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Documents nested deeper than this are rejected before transformation.
    pub max_document_depth: usize,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_document_depth: 64,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// Keys missing from the file keep their defaults.
    ///
    /// # Example
    /// ```ignore
    /// let config = ServiceConfig::load_from_file("config/ldpolicy.yaml")?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("LDPOLICY_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("LDPOLICY_PORT") {
            self.port = parse_value("LDPOLICY_PORT", &port)?;
        }
        if let Some(depth) = lookup("LDPOLICY_MAX_DEPTH") {
            self.max_document_depth = parse_value("LDPOLICY_MAX_DEPTH", &depth)?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "host".to_string(),
            value: addr,
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_document_depth, 64);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 9090\nmax_document_depth: 16").unwrap();

        let config = ServiceConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.max_document_depth, 16);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: [not, a, port]").unwrap();

        let err = ServiceConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ServiceConfig::load_from_file("/nonexistent/ldpolicy.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [("LDPOLICY_PORT", "7000"), ("RUST_LOG", "ldpolicy=debug")]
            .into_iter()
            .collect();

        let config = ServiceConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.log_filter, "ldpolicy=debug");
    }

    #[test]
    fn test_invalid_override() {
        let err = ServiceConfig::default()
            .apply_overrides(|key| (key == "LDPOLICY_MAX_DEPTH").then(|| "deep".to_string()))
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid value for LDPOLICY_MAX_DEPTH: 'deep'");
    }
}
