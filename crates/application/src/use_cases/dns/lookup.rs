use crate::normalizer::{
    from_http_request, to_json_body, to_json_error_body, validate_callback, LookupParams,
};
use crate::ports::DnsResolver;
use ferrous_bridge_domain::{ResolutionStatus, ValidationError};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupReply {
    pub status: ResolutionStatus,
    pub body: String,
    /// Body is a `callback(...)` script rather than plain JSON.
    pub jsonp: bool,
}

/// JSON/JSONP lookup over the shared resolver.
pub struct LookupUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl LookupUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Validation happens before any resolution, so a rejected request never
    /// reaches the cache or the network.
    pub async fn execute(&self, params: &LookupParams) -> Result<LookupReply, ValidationError> {
        let callback = params.callback.as_deref();
        if let Some(cb) = callback {
            validate_callback(cb)?;
        }
        let query = from_http_request(params)?;

        let result = self.resolver.resolve(&query).await;
        debug!(
            domain = %query.name(),
            record_type = %query.record_type(),
            status = %result.status,
            "HTTP lookup resolved"
        );

        let body = match result.status {
            ResolutionStatus::Ok | ResolutionStatus::NxDomain => to_json_body(&result, callback)?,
            ResolutionStatus::ServFail | ResolutionStatus::Timeout => {
                to_json_error_body(&result, callback)?
            }
        };

        Ok(LookupReply {
            status: result.status,
            body,
            jsonp: callback.is_some(),
        })
    }
}
