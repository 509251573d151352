use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use ferrous_bridge_domain::config::HttpConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_api_routes(state: AppState, http: &HttpConfig) -> Router {
    let router = Router::new()
        .route(&http.lookup_path, get(handlers::lookup))
        .route(
            &http.doh_path,
            get(handlers::doh_get).post(handlers::doh_post),
        )
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if http.cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
