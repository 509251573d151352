use super::storage::ResolutionCache;
use async_trait::async_trait;
use ferrous_bridge_application::ports::{CacheMaintenancePort, CacheSweepOutcome};
use ferrous_bridge_domain::DomainError;

#[async_trait]
impl CacheMaintenancePort for ResolutionCache {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        let entries_removed = self.sweep();
        Ok(CacheSweepOutcome {
            entries_removed,
            cache_size: self.len(),
        })
    }
}
