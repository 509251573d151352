/// Snapshot of resolution cache metrics for API exposure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheMetricsSnapshot {
    pub total_entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub lazy_expirations: u64,
    pub swept: u64,
    pub hit_rate: f64,
}

/// Port for resolution cache state exposed to the API layer.
pub trait ResolutionCachePort: Send + Sync {
    fn cache_size(&self) -> usize;
    fn cache_metrics_snapshot(&self) -> CacheMetricsSnapshot;
}
