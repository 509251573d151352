//! Translation between transport payloads and the internal query model.
//!
//! - `wire`: DNS messages to [`Query`] and results back to wire bytes
//! - `http`: lookup query strings to [`Query`]
//! - `json`: results to JSON or JSONP bodies
//!
//! [`Query`]: ferrous_bridge_domain::Query

pub mod http;
pub mod json;
pub mod wire;

pub use http::{from_http_request, LookupParams};
pub use json::{to_json_body, to_json_error_body, validate_callback};
pub use wire::{
    error_response, from_wire, rcode_for, respond_to, to_wire_message, to_wire_response,
};
