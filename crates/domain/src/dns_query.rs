use crate::dns_record::{RecordClass, RecordType};
use std::fmt;
use std::sync::Arc;

/// Transport-independent question, also the resolution cache key.
///
/// The name is stored lowercase without a trailing dot, so `Example.TEST.`
/// and `example.test` are the same query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    name: Arc<str>,
    record_type: RecordType,
    class: RecordClass,
}

impl Query {
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self::with_class(name, record_type, RecordClass::IN)
    }

    pub fn with_class(name: &str, record_type: RecordType, class: RecordClass) -> Self {
        Self {
            name: normalize_name(name).into(),
            record_type,
            class,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn class(&self) -> RecordClass {
        self.class
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "." } else { &self.name };
        write!(f, "{} {} {}", name, self.class, self.record_type)
    }
}

pub fn normalize_name(name: &str) -> String {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    trimmed.to_ascii_lowercase()
}
