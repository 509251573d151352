pub mod cache;
pub mod load_balancer;
pub mod resolver;
pub mod rules;
pub mod transport;

pub use cache::{CacheMetrics, ResolutionCache};
pub use load_balancer::{
    BalancedStrategy, FailoverStrategy, PoolManager, Strategy, UpstreamExchange, WireExchange,
};
pub use resolver::{CachedResolver, CoreResolver, ResolverBuilder, RetryPolicy, RuleResolver};
pub use rules::RuleTable;
