use crate::{dto::DohQuery, errors::ApiError, state::AppState};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ferrous_bridge_application::use_cases::ReplyTransport;
use tracing::{debug, instrument};

const DNS_MESSAGE: &str = "application/dns-message";

/// RFC 8484 GET: the query travels base64url-encoded in `?dns=`.
#[instrument(skip(state, params), name = "api_doh_get")]
pub async fn doh_get(
    State(state): State<AppState>,
    params: Result<Query<DohQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let encoded = params
        .dns
        .ok_or_else(|| ApiError::BadRequest("missing 'dns' parameter".into()))?;

    let packet = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|e| ApiError::InvalidDnsMessage(format!("invalid base64url: {}", e)))?;

    answer(&state, &packet).await
}

/// RFC 8484 POST: the raw message is the request body.
#[instrument(skip(state, headers, body), name = "api_doh_post")]
pub async fn doh_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or_default();

    if !media_type.eq_ignore_ascii_case(DNS_MESSAGE) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "expected {}, got '{}'",
            DNS_MESSAGE, media_type
        )));
    }

    answer(&state, &body).await
}

async fn answer(state: &AppState, packet: &[u8]) -> Result<Response, ApiError> {
    let reply = state
        .dns_query
        .execute(packet, ReplyTransport::Https)
        .await
        .ok_or_else(|| ApiError::InvalidDnsMessage("undecodable DNS message".into()))?;

    let max_age = reply.min_ttl.unwrap_or(0);
    debug!(status = %reply.status, bytes = reply.bytes.len(), max_age, "DoH answered");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DNS_MESSAGE.to_string()),
            (header::CACHE_CONTROL, format!("max-age={}", max_age)),
        ],
        reply.bytes,
    )
        .into_response())
}
