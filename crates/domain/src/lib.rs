//! Ferrous Bridge Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod resolution;
pub mod validation;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::Query;
pub use dns_record::{RecordClass, RecordData, RecordType, ResourceRecord};
pub use errors::{DecodeError, DomainError, EncodeError, UpstreamError, ValidationError};
pub use resolution::{ResolutionResult, ResolutionStatus};
pub use wire::{Edns, Flags, Opcode, Question, ResponseCode, WireMessage};
