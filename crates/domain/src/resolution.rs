use crate::dns_query::Query;
use crate::dns_record::ResourceRecord;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStatus {
    Ok,
    NxDomain,
    ServFail,
    Timeout,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Ok => "OK",
            ResolutionStatus::NxDomain => "NXDOMAIN",
            ResolutionStatus::ServFail => "SERVFAIL",
            ResolutionStatus::Timeout => "TIMEOUT",
        }
    }

    /// Failures that are still a definitive answer for the name.
    pub fn is_negative(&self) -> bool {
        matches!(self, ResolutionStatus::NxDomain | ResolutionStatus::ServFail)
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one [`Query`]. Shared behind `Arc` once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub query: Query,
    pub records: Vec<ResourceRecord>,
    pub resolved_at: DateTime<Utc>,
    pub status: ResolutionStatus,
}

impl ResolutionResult {
    pub fn answered(query: Query, records: Vec<ResourceRecord>) -> Self {
        Self {
            query,
            records,
            resolved_at: Utc::now(),
            status: ResolutionStatus::Ok,
        }
    }

    pub fn failed(query: Query, status: ResolutionStatus) -> Self {
        Self {
            query,
            records: Vec::new(),
            resolved_at: Utc::now(),
            status,
        }
    }

    pub fn nx_domain(query: Query) -> Self {
        Self::failed(query, ResolutionStatus::NxDomain)
    }

    pub fn serv_fail(query: Query) -> Self {
        Self::failed(query, ResolutionStatus::ServFail)
    }

    pub fn timeout(query: Query) -> Self {
        Self::failed(query, ResolutionStatus::Timeout)
    }

    /// Smallest TTL across the answer records, `None` when there are none.
    pub fn min_ttl(&self) -> Option<u32> {
        self.records.iter().map(|r| r.ttl).min()
    }
}
