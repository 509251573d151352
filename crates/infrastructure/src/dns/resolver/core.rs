use crate::dns::load_balancer::PoolManager;
use async_trait::async_trait;
use ferrous_bridge_application::ports::DnsResolver;
use ferrous_bridge_domain::config::UpstreamConfig;
use ferrous_bridge_domain::{Query, ResolutionResult, ResponseCode, UpstreamError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Retry and backoff knobs for upstream dispatch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub query_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            retries: config.retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            backoff_max: Duration::from_millis(config.backoff_max_ms),
            query_timeout: config.query_timeout(),
        }
    }

    /// `min(base * 2^attempt, max)` before jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }

    /// Backoff plus up to 25% random jitter.
    pub fn backoff_with_jitter(&self, attempt: u32) -> Duration {
        let delay = self.backoff(attempt);
        let jitter_ms = (delay.as_millis() as u64) / 4;
        delay + Duration::from_millis(fastrand::u64(0..=jitter_ms))
    }
}

/// Bottom of the resolver stack: asks the upstream pool, retrying whole
/// passes with backoff, all under one overall deadline.
pub struct CoreResolver {
    pool_manager: Arc<PoolManager>,
    policy: RetryPolicy,
}

impl CoreResolver {
    pub fn new(pool_manager: Arc<PoolManager>, policy: RetryPolicy) -> Self {
        info!(
            retries = policy.retries,
            timeout_ms = policy.query_timeout.as_millis() as u64,
            "Core DNS resolver created"
        );

        Self {
            pool_manager,
            policy,
        }
    }

    async fn dispatch(&self, query: &Query) -> ResolutionResult {
        let mut last_error = UpstreamError::NoServers;

        for attempt in 0..=self.policy.retries {
            if attempt > 0 {
                let delay = self.policy.backoff_with_jitter(attempt - 1);
                debug!(query = %query, attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
            }

            match self.pool_manager.query(query).await {
                Ok(result) => {
                    debug!(
                        query = %query,
                        upstream = %result.server,
                        rcode = %result.response.flags.rcode,
                        answers = result.response.answers.len(),
                        "CoreResolver: query successful"
                    );

                    return if result.response.flags.rcode == ResponseCode::NxDomain {
                        ResolutionResult::nx_domain(query.clone())
                    } else {
                        ResolutionResult::answered(query.clone(), result.response.answers)
                    };
                }
                Err(e) => {
                    debug!(query = %query, attempt, error = %e, "Upstream pass failed");
                    last_error = e;
                }
            }
        }

        warn!(query = %query, error = %last_error, "Upstream retries exhausted");
        if last_error.is_timeout() {
            ResolutionResult::timeout(query.clone())
        } else {
            ResolutionResult::serv_fail(query.clone())
        }
    }
}

#[async_trait]
impl DnsResolver for CoreResolver {
    async fn resolve(&self, query: &Query) -> Arc<ResolutionResult> {
        debug!(query = %query, "CoreResolver: performing upstream query");

        let result = match tokio::time::timeout(self.policy.query_timeout, self.dispatch(query)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    query = %query,
                    timeout_ms = self.policy.query_timeout.as_millis() as u64,
                    "Upstream query timed out"
                );
                ResolutionResult::timeout(query.clone())
            }
        };

        Arc::new(result)
    }
}
