pub mod balanced;
pub mod failover;
pub mod pool;
pub mod query;
pub mod strategy;

pub use balanced::BalancedStrategy;
pub use failover::FailoverStrategy;
pub use pool::PoolManager;
pub use query::{UpstreamExchange, WireExchange};
pub use strategy::{Strategy, UpstreamResult};
