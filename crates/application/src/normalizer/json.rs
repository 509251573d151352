use ferrous_bridge_domain::{ResolutionResult, ResolutionStatus, ValidationError};
use serde_json::{json, Value};

const MAX_CALLBACK_LEN: usize = 128;

/// Accepts identifiers made of ASCII letters, digits and underscores, not
/// starting with a digit. Anything else could inject script into the
/// JSONP body.
pub fn validate_callback(callback: &str) -> Result<(), ValidationError> {
    let valid = !callback.is_empty()
        && callback.len() <= MAX_CALLBACK_LEN
        && !callback.starts_with(|c: char| c.is_ascii_digit())
        && callback
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidCallback(callback.to_string()))
    }
}

fn records_json(result: &ResolutionResult) -> Value {
    Value::Array(
        result
            .records
            .iter()
            .map(|rr| {
                json!({
                    "name": rr.name,
                    "type": rr.record_type.to_string(),
                    "ttl": rr.ttl,
                    "data": rr.data.to_string(),
                })
            })
            .collect(),
    )
}

fn wrap(json: Value, callback: Option<&str>) -> Result<String, ValidationError> {
    match callback {
        Some(cb) => {
            validate_callback(cb)?;
            Ok(format!("{}({})", cb, json))
        }
        None => Ok(json.to_string()),
    }
}

/// JSON array of `{name, type, ttl, data}`, or `callback(<array>)`.
///
/// Negative results have no records and render as `[]`.
pub fn to_json_body(
    result: &ResolutionResult,
    callback: Option<&str>,
) -> Result<String, ValidationError> {
    wrap(records_json(result), callback)
}

/// Body for SERVFAIL and TIMEOUT results.
pub fn to_json_error_body(
    result: &ResolutionResult,
    callback: Option<&str>,
) -> Result<String, ValidationError> {
    let error = match result.status {
        ResolutionStatus::Timeout => "timeout",
        ResolutionStatus::NxDomain => "nxdomain",
        ResolutionStatus::ServFail | ResolutionStatus::Ok => "servfail",
    };
    let body = json!({
        "error": error,
        "name": result.query.name(),
        "type": result.query.record_type().to_string(),
    });
    wrap(body, callback)
}
