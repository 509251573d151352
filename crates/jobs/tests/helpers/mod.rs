#![allow(dead_code)]
mod mock_cache;

pub use mock_cache::MockCacheMaintenancePort;
