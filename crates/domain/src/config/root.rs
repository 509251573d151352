use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::http::HttpConfig;
use super::logging::{LogFormat, LoggingConfig};
use super::rules::RulesConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-bridge.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-bridge/config.toml";

/// Main configuration structure for Ferrous Bridge
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (ports, bind address, TLS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolvers and retry policy
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Resolution cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Static rule table
    #[serde(default)]
    pub rules: RulesConfig,

    /// HTTP surface
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-bridge.toml in current directory
    /// 3. /etc/ferrous-bridge/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.http_port {
            self.server.http_port = port;
        }
        if let Some(port) = overrides.https_port {
            self.server.https_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(servers) = overrides.upstream_servers {
            if !servers.is_empty() {
                self.upstream.servers = servers;
            }
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 || self.server.http_port == 0 {
            return Err(ConfigError::Validation("Ports cannot be 0".to_string()));
        }

        if self.server.https_enabled {
            if self.server.https_port == 0 {
                return Err(ConfigError::Validation(
                    "HTTPS port cannot be 0".to_string(),
                ));
            }
            if self.server.tls_cert_path.is_none() || self.server.tls_key_path.is_none() {
                return Err(ConfigError::Validation(
                    "HTTPS enabled but tls_cert_path/tls_key_path not set".to_string(),
                ));
            }
        }

        // RFC 1035 floor; every client must be able to take a 512 byte answer.
        if self.server.max_udp_payload < 512 {
            return Err(ConfigError::Validation(format!(
                "max_udp_payload must be at least 512, got {}",
                self.server.max_udp_payload
            )));
        }

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        for server in &self.upstream.servers {
            server.parse::<SocketAddr>().map_err(|_| {
                ConfigError::Validation(format!("Invalid upstream address '{}'", server))
            })?;
        }

        if self.upstream.attempt_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "attempt_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.upstream.query_timeout_ms < self.upstream.attempt_timeout_ms {
            return Err(ConfigError::Validation(
                "query_timeout_ms must not be lower than attempt_timeout_ms".to_string(),
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }

        for path in [&self.http.lookup_path, &self.http.doh_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "HTTP path '{}' must start with '/'",
                    path
                )));
            }
            if path.as_str() == "/health" || path.as_str() == "/stats" {
                return Err(ConfigError::Validation(format!(
                    "HTTP path '{}' is reserved",
                    path
                )));
            }
        }

        if self.http.lookup_path == self.http.doh_path {
            return Err(ConfigError::Validation(
                "http.lookup_path and http.doh_path must differ".to_string(),
            ));
        }

        self.rules.validate()
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream_servers: Option<Vec<String>>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}
