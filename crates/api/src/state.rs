use ferrous_bridge_application::use_cases::{
    GetCacheStatsUseCase, HandleDnsQueryUseCase, LookupUseCase,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<LookupUseCase>,
    pub dns_query: Arc<HandleDnsQueryUseCase>,
    pub cache_stats: Arc<GetCacheStatsUseCase>,
}
