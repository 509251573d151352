use crate::dns::rules::RuleTable;
use async_trait::async_trait;
use ferrous_bridge_application::ports::DnsResolver;
use ferrous_bridge_domain::{Query, ResolutionResult};
use std::sync::Arc;
use tracing::debug;

/// Answers from the static rule table, delegating everything else.
pub struct RuleResolver {
    inner: Arc<dyn DnsResolver>,
    rules: Arc<RuleTable>,
}

impl RuleResolver {
    pub fn new(inner: Arc<dyn DnsResolver>, rules: Arc<RuleTable>) -> Self {
        Self { inner, rules }
    }
}

#[async_trait]
impl DnsResolver for RuleResolver {
    async fn resolve(&self, query: &Query) -> Arc<ResolutionResult> {
        if let Some(result) = self.rules.lookup(query) {
            debug!(query = %query, status = %result.status, "Answered from static rules");
            return Arc::new(result);
        }
        self.inner.resolve(query).await
    }
}
