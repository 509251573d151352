use crate::ports::{CacheMetricsSnapshot, ResolutionCachePort};
use std::sync::Arc;

pub struct GetCacheStatsUseCase {
    cache: Arc<dyn ResolutionCachePort>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<dyn ResolutionCachePort>) -> Self {
        Self { cache }
    }

    pub fn execute(&self) -> CacheMetricsSnapshot {
        self.cache.cache_metrics_snapshot()
    }
}
