use async_trait::async_trait;
use ferrous_bridge_application::ports::DnsResolver;
use ferrous_bridge_domain::{
    Query, RecordData, RecordType, ResolutionResult, ResolutionStatus, ResourceRecord,
};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Resolver answering from a fixed table; unknown names are NXDOMAIN.
pub struct MockDnsResolver {
    answers: RwLock<HashMap<String, ResolutionStatusOrRecords>>,
    call_count: AtomicUsize,
}

#[derive(Clone)]
enum ResolutionStatusOrRecords {
    Records(Vec<ResourceRecord>),
    Status(ResolutionStatus),
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            answers: RwLock::new(HashMap::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_a(self, domain: &str, addr: Ipv4Addr, ttl: u32) -> Self {
        self.answers.write().unwrap().insert(
            domain.to_string(),
            ResolutionStatusOrRecords::Records(vec![ResourceRecord::new(
                domain,
                RecordType::A,
                ttl,
                RecordData::A(addr),
            )]),
        );
        self
    }

    pub fn with_records(self, domain: &str, records: Vec<ResourceRecord>) -> Self {
        self.answers
            .write()
            .unwrap()
            .insert(domain.to_string(), ResolutionStatusOrRecords::Records(records));
        self
    }

    pub fn with_status(self, domain: &str, status: ResolutionStatus) -> Self {
        self.answers
            .write()
            .unwrap()
            .insert(domain.to_string(), ResolutionStatusOrRecords::Status(status));
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &Query) -> Arc<ResolutionResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let entry = self.answers.read().unwrap().get(query.name()).cloned();
        let result = match entry {
            Some(ResolutionStatusOrRecords::Records(records)) => {
                ResolutionResult::answered(query.clone(), records)
            }
            Some(ResolutionStatusOrRecords::Status(status)) => {
                ResolutionResult::failed(query.clone(), status)
            }
            None => ResolutionResult::nx_domain(query.clone()),
        };
        Arc::new(result)
    }
}
