use thiserror::Error;

use crate::config::ConfigError;

/// Malformed wire input. Listeners drop the packet on any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Message truncated")]
    Truncated,

    #[error("Unsupported record type: {0}")]
    UnsupportedType(u16),

    #[error("Malformed name compression pointer")]
    MalformedCompression,

    #[error("Invalid label in domain name")]
    InvalidLabel,

    #[error("RDATA length does not match record type {0}")]
    BadRdataLength(u16),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Label exceeds 63 bytes: {0}")]
    LabelTooLong(String),

    #[error("Empty label in name: {0}")]
    EmptyLabel(String),

    #[error("Name exceeds 255 bytes: {0}")]
    NameTooLong(String),

    #[error("Invalid escape sequence in name: {0}")]
    InvalidEscape(String),

    #[error("Character string exceeds 255 bytes")]
    StringTooLong,

    #[error("RDATA exceeds 65535 bytes")]
    RdataTooLong,
}

/// Malformed HTTP lookup parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing domain name parameter")]
    MissingName,

    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Invalid record type: {0}")]
    InvalidType(String),

    #[error("Invalid JSONP callback name: {0}")]
    InvalidCallback(String),
}

impl ValidationError {
    /// Stable machine-readable kind used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingName => "missing_name",
            ValidationError::InvalidName(_) => "invalid_name",
            ValidationError::InvalidType(_) => "invalid_type",
            ValidationError::InvalidCallback(_) => "invalid_callback",
        }
    }
}

/// Failure talking to a single upstream server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Upstream {server} timed out")]
    Timeout { server: String },

    #[error("I/O error talking to {server}: {message}")]
    Io { server: String, message: String },

    #[error("Malformed response from {server}: {source}")]
    Malformed {
        server: String,
        #[source]
        source: DecodeError,
    },

    #[error("Response from {server} does not match the query")]
    Mismatch { server: String },

    #[error("Upstream {server} answered with {rcode}")]
    Rcode { server: String, rcode: &'static str },

    #[error("No upstream servers configured")]
    NoServers,
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        DomainError::Config(err.to_string())
    }
}
