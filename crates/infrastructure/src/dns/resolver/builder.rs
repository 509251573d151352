use super::cache_layer::CachedResolver;
use super::core::{CoreResolver, RetryPolicy};
use super::rule_layer::RuleResolver;
use crate::dns::cache::ResolutionCache;
use crate::dns::load_balancer::PoolManager;
use crate::dns::rules::RuleTable;
use ferrous_bridge_application::ports::DnsResolver;
use ferrous_bridge_domain::config::UpstreamConfig;
use std::sync::Arc;
use tracing::info;

/// Assembles the resolver stack: coalescing and cache on top, static rules in
/// the middle, upstream dispatch at the bottom.
pub struct ResolverBuilder {
    pool_manager: Arc<PoolManager>,
    policy: RetryPolicy,
    cache: Option<Arc<ResolutionCache>>,
    rules: Option<Arc<RuleTable>>,
}

impl ResolverBuilder {
    pub fn new(pool_manager: Arc<PoolManager>) -> Self {
        Self {
            pool_manager,
            policy: RetryPolicy::from_config(&UpstreamConfig::default()),
            cache: None,
            rules: None,
        }
    }

    pub fn with_upstream_config(mut self, config: &UpstreamConfig) -> Self {
        self.policy = RetryPolicy::from_config(config);
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_rules(mut self, rules: Arc<RuleTable>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn build(self) -> Arc<dyn DnsResolver> {
        info!(
            cache = self.cache.is_some(),
            rules = self.rules.is_some(),
            retries = self.policy.retries,
            "Building DNS resolver"
        );

        let mut resolver: Arc<dyn DnsResolver> =
            Arc::new(CoreResolver::new(self.pool_manager, self.policy));

        if let Some(rules) = self.rules.filter(|r| !r.is_empty()) {
            resolver = Arc::new(RuleResolver::new(resolver, rules));
        }

        // Coalescing stays on even when the cache is disabled.
        resolver = Arc::new(CachedResolver::new(resolver, self.cache));

        info!("DNS resolver built successfully");
        resolver
    }
}
