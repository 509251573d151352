use super::entry::CacheEntry;
use super::metrics::CacheMetrics;
use ferrous_bridge_application::ports::{CacheMetricsSnapshot, ResolutionCachePort};
use ferrous_bridge_domain::config::CacheConfig;
use ferrous_bridge_domain::{Query, ResolutionResult, ResolutionStatus};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Bounded, TTL-aware store of resolution results shared by every front-end.
///
/// A single mutex guards the LRU list, so lookups, insertions and evictions
/// never observe each other half-done.
pub struct ResolutionCache {
    entries: Mutex<LruCache<Query, CacheEntry>>,
    capacity: usize,
    negative_ttl: u32,
    max_ttl: u32,
    metrics: CacheMetrics,
}

impl ResolutionCache {
    pub fn new(max_entries: usize, negative_ttl: u32, max_ttl: u32) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);

        info!(
            max_entries = capacity.get(),
            negative_ttl = negative_ttl,
            max_ttl = max_ttl,
            "Resolution cache created"
        );

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity: capacity.get(),
            negative_ttl,
            max_ttl,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, config.negative_ttl, config.max_ttl)
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Query, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live entry for `query`, refreshing its recency. Expired entries are
    /// removed on the spot and reported as a miss.
    pub fn get(&self, query: &Query) -> Option<Arc<ResolutionResult>> {
        let now = Instant::now();
        let mut entries = self.lock();

        let expired = match entries.get(query) {
            Some(entry) if !entry.is_expired(now) => {
                CacheMetrics::bump(&self.metrics.hits);
                return Some(Arc::clone(&entry.result));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(query);
            CacheMetrics::bump(&self.metrics.lazy_expirations);
            debug!(query = %query, "Cache entry expired");
        }
        CacheMetrics::bump(&self.metrics.misses);
        None
    }

    /// Live entry without touching recency or counters.
    pub fn peek(&self, query: &Query) -> Option<Arc<ResolutionResult>> {
        let now = Instant::now();
        self.lock()
            .peek(query)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| Arc::clone(&entry.result))
    }

    /// Stores `result` under `query` for its computed lifetime, counted from
    /// this call rather than from `result.resolved_at`. Results with a zero
    /// lifetime and timeouts are not stored. Returns whether it was kept.
    pub fn insert(&self, query: &Query, result: Arc<ResolutionResult>) -> bool {
        let Some(ttl) = self.ttl_for(&result) else {
            debug!(query = %query, status = %result.status, "Result not cacheable");
            return false;
        };

        let entry = CacheEntry::new(result, Instant::now() + Duration::from_secs(u64::from(ttl)));
        let displaced = self.lock().push(query.clone(), entry);

        CacheMetrics::bump(&self.metrics.insertions);
        if let Some((key, _)) = displaced {
            if &key != query {
                CacheMetrics::bump(&self.metrics.evictions);
                debug!(evicted = %key, "Cache evicted least recently used entry");
            }
        }

        debug!(query = %query, ttl = ttl, "Cache insert");
        true
    }

    /// Lifetime in seconds for `result`, or `None` when it must not be cached.
    pub fn ttl_for(&self, result: &ResolutionResult) -> Option<u32> {
        let ttl = match result.status {
            ResolutionStatus::Timeout => return None,
            status if status.is_negative() => self.negative_ttl,
            _ => result
                .min_ttl()
                .map_or(self.negative_ttl, |ttl| ttl.min(self.max_ttl)),
        };
        (ttl > 0).then_some(ttl)
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();

        let expired: Vec<Query> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(query, _)| query.clone())
            .collect();

        for query in &expired {
            entries.pop(query);
        }

        CacheMetrics::add(&self.metrics.swept, expired.len() as u64);
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

impl ResolutionCachePort for ResolutionCache {
    fn cache_size(&self) -> usize {
        self.len()
    }

    fn cache_metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.capacity)
    }
}
