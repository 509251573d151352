pub mod cache;
pub mod doh;
pub mod health;

pub use cache::CacheStatsResponse;
pub use doh::DohQuery;
pub use health::HealthResponse;
