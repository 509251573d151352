use ferrous_bridge_application::ports::CacheMetricsSnapshot;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

// align(64) keeps `hits` and `misses` on their own cache line.
#[derive(Default)]
#[repr(align(64))]
pub struct CacheMetrics {
    // Hot counters, touched on every lookup.
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    _hot_pad: [u64; 6],

    // Cold counters.
    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
    pub lazy_expirations: AtomicU64,
    pub swept: AtomicU64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, AtomicOrdering::Relaxed);
    }

    pub fn snapshot(&self, total_entries: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            total_entries,
            capacity,
            hits: self.hits.load(AtomicOrdering::Relaxed),
            misses: self.misses.load(AtomicOrdering::Relaxed),
            insertions: self.insertions.load(AtomicOrdering::Relaxed),
            evictions: self.evictions.load(AtomicOrdering::Relaxed),
            lazy_expirations: self.lazy_expirations.load(AtomicOrdering::Relaxed),
            swept: self.swept.load(AtomicOrdering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }
}
