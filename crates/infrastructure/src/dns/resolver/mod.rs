pub mod builder;
pub mod cache_layer;
pub mod core;
pub mod rule_layer;

pub use builder::ResolverBuilder;
pub use cache_layer::CachedResolver;
pub use core::{CoreResolver, RetryPolicy};
pub use rule_layer::RuleResolver;
