use ferrous_bridge_application::ports::CacheMetricsSnapshot;
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct CacheStatsResponse {
    pub total_entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub expired: u64,
    pub hit_rate: f64,
}

impl From<CacheMetricsSnapshot> for CacheStatsResponse {
    fn from(s: CacheMetricsSnapshot) -> Self {
        Self {
            total_entries: s.total_entries,
            capacity: s.capacity,
            hits: s.hits,
            misses: s.misses,
            insertions: s.insertions,
            evictions: s.evictions,
            expired: s.lazy_expirations + s.swept,
            hit_rate: s.hit_rate,
        }
    }
}
