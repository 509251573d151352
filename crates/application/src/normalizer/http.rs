use ferrous_bridge_domain::validation::validate_domain_name;
use ferrous_bridge_domain::{Query, RecordType, ValidationError};
use serde::Deserialize;

/// Query-string parameters of the lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupParams {
    #[serde(alias = "domain")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub record_type: Option<String>,

    pub callback: Option<String>,
}

impl LookupParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }
}

/// Builds a [`Query`] from lookup parameters. The type defaults to A.
pub fn from_http_request(params: &LookupParams) -> Result<Query, ValidationError> {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ValidationError::MissingName)?;

    validate_domain_name(name)?;

    let record_type = match params.record_type.as_deref().map(str::trim) {
        None | Some("") => RecordType::A,
        Some(raw) => raw
            .parse::<RecordType>()
            .map_err(|_| ValidationError::InvalidType(raw.to_string()))?,
    };

    Ok(Query::new(name, record_type))
}
