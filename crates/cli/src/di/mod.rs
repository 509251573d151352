use axum::Router;
use ferrous_bridge_api::{create_api_routes, AppState};
use ferrous_bridge_application::ports::{CacheMaintenancePort, DnsResolver, ResolutionCachePort};
use ferrous_bridge_application::use_cases::{
    GetCacheStatsUseCase, HandleDnsQueryUseCase, LookupUseCase,
};
use ferrous_bridge_domain::Config;
use ferrous_bridge_infrastructure::dns::{PoolManager, ResolutionCache, ResolverBuilder, RuleTable};
use ferrous_bridge_jobs::{CacheSweepJob, JobRunner};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct BridgeServices {
    pub cache: Arc<ResolutionCache>,
    pub lookup: Arc<LookupUseCase>,
    pub dns_query: Arc<HandleDnsQueryUseCase>,
    pub cache_stats: Arc<GetCacheStatsUseCase>,
}

impl BridgeServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!(
            servers = ?config.upstream.servers,
            strategy = ?config.upstream.strategy,
            "Initializing resolver stack"
        );

        let pool_manager = Arc::new(PoolManager::from_config(&config.upstream)?);
        let rules = Arc::new(RuleTable::from_config(&config.rules)?);

        // Stats stay reachable with the cache disabled; they simply read zero.
        let cache = Arc::new(ResolutionCache::from_config(&config.cache));

        let mut builder = ResolverBuilder::new(pool_manager)
            .with_upstream_config(&config.upstream)
            .with_rules(rules);
        if config.cache.enabled {
            builder = builder.with_cache(cache.clone());
        }
        let resolver: Arc<dyn DnsResolver> = builder.build();

        let lookup = Arc::new(LookupUseCase::new(resolver.clone()));
        let dns_query = Arc::new(HandleDnsQueryUseCase::new(resolver));
        let cache_stats = Arc::new(GetCacheStatsUseCase::new(
            cache.clone() as Arc<dyn ResolutionCachePort>
        ));

        Ok(Self {
            cache,
            lookup,
            dns_query,
            cache_stats,
        })
    }

    pub fn router(&self, config: &Config) -> Router {
        let state = AppState {
            lookup: self.lookup.clone(),
            dns_query: self.dns_query.clone(),
            cache_stats: self.cache_stats.clone(),
        };
        create_api_routes(state, &config.http)
    }

    pub async fn start_jobs(
        &self,
        config: &Config,
        shutdown: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        let mut runner = JobRunner::new().with_shutdown_token(shutdown);

        if config.cache.enabled {
            let maintenance = self.cache.clone() as Arc<dyn CacheMaintenancePort>;
            runner = runner.with_cache_sweep(
                CacheSweepJob::new(maintenance).with_interval(config.cache.sweep_interval_secs),
            );
        }

        runner.start().await
    }
}
