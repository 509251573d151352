use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ferrous_bridge_domain::ValidationError;
use serde_json::json;

/// Client-side request errors. Always plain JSON, never JSONP-wrapped.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    BadRequest(String),
    InvalidDnsMessage(String),
    UnsupportedMediaType(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.kind(),
            ApiError::BadRequest(_) => "invalid_request",
            ApiError::InvalidDnsMessage(_) => "invalid_dns_message",
            ApiError::UnsupportedMediaType(_) => "unsupported_media_type",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::BadRequest(m)
            | ApiError::InvalidDnsMessage(m)
            | ApiError::UnsupportedMediaType(m) => m.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(json!({ "error": self.kind(), "message": self.message() })),
        )
            .into_response()
    }
}
