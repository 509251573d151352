use crate::{errors::ApiError, state::AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use ferrous_bridge_application::normalizer::LookupParams;
use ferrous_bridge_domain::ResolutionStatus;
use tracing::{debug, instrument};

const JSON: &str = "application/json";
const JAVASCRIPT: &str = "application/javascript";

/// `GET {lookup_path}?name=&type=&callback=`
#[instrument(skip(state, params), name = "api_lookup")]
pub async fn lookup(
    State(state): State<AppState>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let reply = state.lookup.execute(&params).await?;

    let status = match reply.status {
        ResolutionStatus::Ok | ResolutionStatus::NxDomain => StatusCode::OK,
        ResolutionStatus::ServFail => StatusCode::BAD_GATEWAY,
        ResolutionStatus::Timeout => StatusCode::GATEWAY_TIMEOUT,
    };
    let content_type = if reply.jsonp { JAVASCRIPT } else { JSON };

    debug!(status = %reply.status, jsonp = reply.jsonp, "Lookup answered");

    Ok((status, [(header::CONTENT_TYPE, content_type)], reply.body).into_response())
}
