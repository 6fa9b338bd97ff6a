//! Config file handling

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::DispatchOptions;
use crate::output::{Logger, TracingLogger};

/// Environment variable overriding `host`
pub const ENV_HOST: &str = "RSAPI_HOST";
/// Environment variable overriding `log_requests`
pub const ENV_LOG: &str = "RSAPI_LOG";
/// Environment variable overriding `dump_request_response`
pub const ENV_DUMP: &str = "RSAPI_DUMP";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// rsapi configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API host, optionally with port (`api.example.com`, `localhost:8080`)
    pub host: String,
    /// URL scheme used to build requests
    pub scheme: String,
    /// Log every request and response through `tracing`
    pub log_requests: bool,
    /// Dump raw requests and response heads to standard output
    pub dump_request_response: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            scheme: "https".to_string(),
            log_requests: false,
            dump_request_response: false,
        }
    }
}

impl ApiConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&content)?.with_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `RSAPI_*` overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `RSAPI_*` overrides using `lookup` as the environment
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.is_empty()) {
            self.host = host;
        }
        if let Some(flag) = lookup(ENV_LOG).and_then(|v| parse_flag(ENV_LOG, &v)) {
            self.log_requests = flag;
        }
        if let Some(flag) = lookup(ENV_DUMP).and_then(|v| parse_flag(ENV_DUMP, &v)) {
            self.dump_request_response = flag;
        }
        self
    }

    /// Check that the configuration can address an API
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.host.contains("://") {
            return Err(ConfigError::Invalid(format!(
                "host must not include a scheme: {}",
                self.host
            )));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::Invalid(format!(
                "unsupported scheme: {}",
                self.scheme
            )));
        }
        Ok(())
    }

    /// Diagnostics matching this configuration
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            logger: self
                .log_requests
                .then(|| Arc::new(TracingLogger) as Arc<dyn Logger>),
            dump_request_response: self.dump_request_response,
            ..DispatchOptions::default()
        }
    }
}

fn parse_flag(var: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(var, value = other, "Ignoring unrecognized boolean");
            None
        }
    }
}
