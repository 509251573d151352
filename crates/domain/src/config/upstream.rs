use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStrategy {
    /// Always try servers in configured order.
    #[default]
    Failover,

    /// Rotate the starting server per query.
    RoundRobin,
}

impl UpstreamStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failover => "failover",
            Self::RoundRobin => "round_robin",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// `host:port` pairs reached over UDP.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    #[serde(default)]
    pub strategy: UpstreamStrategy,

    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Overall ceiling for one query across all attempts.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Extra passes over the server list after the first one.
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl UpstreamConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            strategy: UpstreamStrategy::default(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            retries: default_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_attempt_timeout_ms() -> u64 {
    2000
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    50
}

fn default_backoff_max_ms() -> u64 {
    1000
}
