//! Configuration module for Ferrous Bridge
//!
//! - `root`: Main configuration, file discovery and CLI overrides
//! - `server`: Listener ports, bind address and TLS material
//! - `upstream`: Upstream servers, strategy, timeouts and retry policy
//! - `cache`: Resolution cache sizing and TTL policy
//! - `rules`: Static rule table (blocklist and fixed records)
//! - `http`: HTTP surface paths
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cache;
pub mod errors;
pub mod http;
pub mod logging;
pub mod root;
pub mod rules;
pub mod server;
pub mod upstream;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use http::HttpConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use rules::{RulesConfig, StaticRecordRule};
pub use server::ServerConfig;
pub use upstream::{UpstreamConfig, UpstreamStrategy};
