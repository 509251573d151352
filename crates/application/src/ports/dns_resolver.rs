use async_trait::async_trait;
use ferrous_bridge_domain::{Query, ResolutionResult};
use std::sync::Arc;

/// Resolves a normalized query.
///
/// Never fails: NXDOMAIN, SERVFAIL and TIMEOUT are carried in
/// [`ResolutionResult::status`] so every caller can still answer its client.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &Query) -> Arc<ResolutionResult>;
}
