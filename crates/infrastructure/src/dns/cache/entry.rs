use ferrous_bridge_domain::ResolutionResult;
use std::sync::Arc;
use tokio::time::Instant;

/// A cached resolution and the instant it stops being served, fixed when
/// the entry is inserted.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: Arc<ResolutionResult>,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn new(result: Arc<ResolutionResult>, expires_at: Instant) -> Self {
        Self { result, expires_at }
    }

    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
