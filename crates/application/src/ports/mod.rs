mod cache_maintenance_port;
mod dns_cache_port;
mod dns_resolver;

pub use cache_maintenance_port::{CacheMaintenancePort, CacheSweepOutcome};
pub use dns_cache_port::{CacheMetricsSnapshot, ResolutionCachePort};
pub use dns_resolver::DnsResolver;
