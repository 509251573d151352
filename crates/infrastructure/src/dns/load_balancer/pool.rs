use super::query::{UpstreamExchange, WireExchange};
use super::strategy::{Strategy, UpstreamResult};
use ferrous_bridge_domain::config::UpstreamConfig;
use ferrous_bridge_domain::{DomainError, Query, UpstreamError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The configured upstream servers and the order they are tried in.
pub struct PoolManager {
    servers: Vec<SocketAddr>,
    strategy: Strategy,
    exchange: Arc<dyn UpstreamExchange>,
    attempt_timeout: Duration,
}

impl PoolManager {
    pub fn new(
        servers: Vec<SocketAddr>,
        strategy: Strategy,
        exchange: Arc<dyn UpstreamExchange>,
        attempt_timeout: Duration,
    ) -> Self {
        info!(
            servers = servers.len(),
            strategy = strategy.name(),
            attempt_timeout_ms = attempt_timeout.as_millis() as u64,
            "Upstream pool created"
        );

        Self {
            servers,
            strategy,
            exchange,
            attempt_timeout,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, DomainError> {
        Self::from_config_with_exchange(config, Arc::new(WireExchange::new()))
    }

    pub fn from_config_with_exchange(
        config: &UpstreamConfig,
        exchange: Arc<dyn UpstreamExchange>,
    ) -> Result<Self, DomainError> {
        let servers = config
            .servers
            .iter()
            .map(|s| {
                s.parse::<SocketAddr>().map_err(|e| {
                    DomainError::Config(format!("Invalid upstream server '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            servers,
            Strategy::from_config(config.strategy),
            exchange,
            config.attempt_timeout(),
        ))
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    /// One pass over every server, starting where the strategy says.
    /// Returns the first usable answer or the last failure.
    pub async fn query(&self, query: &Query) -> Result<UpstreamResult, UpstreamError> {
        if self.servers.is_empty() {
            return Err(UpstreamError::NoServers);
        }

        let count = self.servers.len();
        let start_index = self.strategy.start_index(count);
        debug!(
            strategy = self.strategy.name(),
            servers = count,
            start_index,
            query = %query,
            "Dispatching upstream"
        );

        let mut last_error = UpstreamError::NoServers;
        for position in 0..count {
            let server = self.servers[(start_index + position) % count];
            let started = Instant::now();

            match self
                .exchange
                .exchange(server, query, self.attempt_timeout)
                .await
            {
                Ok(response) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    debug!(server = %server, latency_ms, position, "Server responded");
                    return Ok(UpstreamResult {
                        response,
                        server,
                        latency_ms,
                    });
                }
                Err(e) => {
                    warn!(server = %server, error = %e, position, "Failing over");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
