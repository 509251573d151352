use async_trait::async_trait;
use ferrous_bridge_domain::DomainError;

/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone)]
pub struct CacheSweepOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Port for periodic cache maintenance.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Remove expired entries to reclaim memory held by dead answers.
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError>;
}
