use crate::dns::cache::ResolutionCache;
use async_trait::async_trait;
use dashmap::DashMap;
use ferrous_bridge_application::ports::DnsResolver;
use ferrous_bridge_domain::{Query, ResolutionResult};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

type InflightSender = Arc<watch::Sender<Option<Arc<ResolutionResult>>>>;
type InflightMap = DashMap<Query, InflightSender, FxBuildHasher>;

/// Clears the in-flight slot if the resolution task ends without publishing,
/// so waiters wake up instead of hanging.
struct InflightLeaderGuard {
    inflight: Arc<InflightMap>,
    key: Query,
    tx: InflightSender,
}

impl Drop for InflightLeaderGuard {
    fn drop(&mut self) {
        // Only our own entry; a newer leader may already own the key.
        if let Some((_, tx)) = self
            .inflight
            .remove_if(&self.key, |_, current| Arc::ptr_eq(current, &self.tx))
        {
            let _ = tx.send(None);
        }
    }
}

enum Slot {
    Cached(Arc<ResolutionResult>),
    Leader(InflightSender, watch::Receiver<Option<Arc<ResolutionResult>>>),
    Follower(watch::Receiver<Option<Arc<ResolutionResult>>>),
}

/// Cache lookup plus single-flight coalescing of identical concurrent queries.
///
/// The leader runs the inner resolution on a detached task. Callers that go
/// away only drop their receiver; the task still completes and fills the cache.
pub struct CachedResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Option<Arc<ResolutionCache>>,
    inflight: Arc<InflightMap>,
}

impl CachedResolver {
    pub fn new(inner: Arc<dyn DnsResolver>, cache: Option<Arc<ResolutionCache>>) -> Self {
        Self {
            inner,
            cache,
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    /// Number of queries currently being resolved.
    pub fn inflight_count(&self) -> usize {
        self.inflight.len()
    }

    fn check_cache(&self, query: &Query) -> Option<Arc<ResolutionResult>> {
        let hit = self.cache.as_ref()?.get(query)?;
        debug!(query = %query, status = %hit.status, "Cache HIT");
        Some(hit)
    }

    fn register_or_join_inflight(&self, query: &Query) -> Slot {
        match self.inflight.entry(query.clone()) {
            dashmap::Entry::Occupied(e) => Slot::Follower(e.get().subscribe()),
            dashmap::Entry::Vacant(e) => {
                // The previous leader stores before it unregisters, so a
                // vacant slot with a fresh cache entry means we just missed it.
                if let Some(hit) = self.cache.as_ref().and_then(|c| c.peek(query)) {
                    return Slot::Cached(hit);
                }
                let (tx, rx) = watch::channel(None);
                let tx = Arc::new(tx);
                e.insert(Arc::clone(&tx));
                Slot::Leader(tx, rx)
            }
        }
    }

    fn spawn_leader(&self, query: &Query, tx: InflightSender) {
        let inner = Arc::clone(&self.inner);
        let cache = self.cache.clone();
        let inflight = Arc::clone(&self.inflight);
        let key = query.clone();

        debug!(query = %query, "Cache MISS");

        tokio::spawn(async move {
            let guard = InflightLeaderGuard {
                inflight: Arc::clone(&inflight),
                key: key.clone(),
                tx: Arc::clone(&tx),
            };

            let result = inner.resolve(&key).await;

            if let Some(cache) = &cache {
                cache.insert(&key, Arc::clone(&result));
            }

            inflight.remove_if(&key, |_, current| Arc::ptr_eq(current, &tx));
            tx.send_replace(Some(result));
            drop(guard);
        });
    }

    async fn wait_for(
        query: &Query,
        mut rx: watch::Receiver<Option<Arc<ResolutionResult>>>,
    ) -> Arc<ResolutionResult> {
        loop {
            if let Some(result) = rx.borrow_and_update().clone() {
                return result;
            }
            if rx.changed().await.is_err() {
                // Sender gone: take a value published right before the drop,
                // otherwise the task died without an answer.
                return rx.borrow().clone().unwrap_or_else(|| {
                    debug!(query = %query, "In-flight resolution vanished");
                    Arc::new(ResolutionResult::serv_fail(query.clone()))
                });
            }
        }
    }
}

#[async_trait]
impl DnsResolver for CachedResolver {
    async fn resolve(&self, query: &Query) -> Arc<ResolutionResult> {
        if let Some(hit) = self.check_cache(query) {
            return hit;
        }

        let rx = match self.register_or_join_inflight(query) {
            Slot::Cached(hit) => return hit,
            Slot::Follower(rx) => {
                debug!(query = %query, "Joining in-flight resolution");
                rx
            }
            Slot::Leader(tx, rx) => {
                self.spawn_leader(query, tx);
                rx
            }
        };

        Self::wait_for(query, rx).await
    }
}
