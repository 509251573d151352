#![allow(dead_code)]
mod mock_resolver;

pub use mock_resolver::MockDnsResolver;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use ferrous_bridge_api::{create_api_routes, AppState};
use ferrous_bridge_application::ports::{CacheMetricsSnapshot, ResolutionCachePort};
use ferrous_bridge_application::use_cases::{
    GetCacheStatsUseCase, HandleDnsQueryUseCase, LookupUseCase,
};
use ferrous_bridge_domain::config::HttpConfig;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

pub struct FixedCacheStats(pub CacheMetricsSnapshot);

impl ResolutionCachePort for FixedCacheStats {
    fn cache_size(&self) -> usize {
        self.0.total_entries
    }

    fn cache_metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.0.clone()
    }
}

pub fn create_test_app(resolver: Arc<MockDnsResolver>) -> Router {
    create_test_app_with(resolver, &HttpConfig::default())
}

pub fn create_test_app_with(resolver: Arc<MockDnsResolver>, http: &HttpConfig) -> Router {
    let stats = FixedCacheStats(CacheMetricsSnapshot {
        total_entries: 3,
        capacity: 100,
        hits: 6,
        misses: 2,
        insertions: 3,
        evictions: 0,
        lazy_expirations: 1,
        swept: 1,
        hit_rate: 75.0,
    });

    let state = AppState {
        lookup: Arc::new(LookupUseCase::new(resolver.clone())),
        dns_query: Arc::new(HandleDnsQueryUseCase::new(resolver)),
        cache_stats: Arc::new(GetCacheStatsUseCase::new(Arc::new(stats))),
    };
    create_api_routes(state, http)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response: Response<Body> = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, content_type, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let (status, content_type, body) = send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    (status, content_type, String::from_utf8(body).unwrap())
}
