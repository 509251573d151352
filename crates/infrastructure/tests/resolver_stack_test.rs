mod helpers;

use ferrous_bridge_application::ports::ResolutionCachePort;
use ferrous_bridge_domain::config::{RulesConfig, StaticRecordRule, UpstreamConfig};
use ferrous_bridge_domain::{Query, RecordData, RecordType, ResolutionStatus, ResourceRecord};
use ferrous_bridge_infrastructure::dns::{PoolManager, ResolutionCache, ResolverBuilder, RuleTable};
use helpers::{MockAnswer, MockDnsServer};
use std::net::Ipv4Addr;
use std::sync::Arc;

struct Stack {
    resolver: Arc<dyn ferrous_bridge_application::ports::DnsResolver>,
    cache: Arc<ResolutionCache>,
    upstream: MockDnsServer,
}

async fn stack() -> Stack {
    let upstream = MockDnsServer::start(|query| {
        MockAnswer::Records(vec![ResourceRecord::new(
            query.name(),
            RecordType::A,
            300,
            RecordData::A(Ipv4Addr::new(203, 0, 113, 7)),
        )])
    })
    .await;

    let config = UpstreamConfig {
        servers: vec![upstream.addr().to_string()],
        attempt_timeout_ms: 500,
        ..UpstreamConfig::default()
    };

    let rules = RuleTable::from_config(&RulesConfig {
        file: None,
        blocked: vec!["*.ads.test".into()],
        records: vec![StaticRecordRule {
            domain: "router.lan".into(),
            record_type: "A".into(),
            value: "192.168.0.1".into(),
            ttl: 600,
        }],
    })
    .unwrap();

    let cache = Arc::new(ResolutionCache::new(100, 30, 3600));
    let resolver = ResolverBuilder::new(Arc::new(PoolManager::from_config(&config).unwrap()))
        .with_upstream_config(&config)
        .with_rules(Arc::new(rules))
        .with_cache(cache.clone())
        .build();

    Stack {
        resolver,
        cache,
        upstream,
    }
}

#[tokio::test]
async fn test_rules_answer_without_upstream_and_are_cached() {
    let stack = stack().await;

    let blocked = stack
        .resolver
        .resolve(&Query::new("banner.ads.test", RecordType::A))
        .await;
    assert_eq!(blocked.status, ResolutionStatus::NxDomain);

    let local = stack
        .resolver
        .resolve(&Query::new("router.lan", RecordType::A))
        .await;
    assert_eq!(
        local.records[0].data,
        RecordData::A(Ipv4Addr::new(192, 168, 0, 1))
    );

    assert_eq!(stack.upstream.udp_queries(), 0);
    assert_eq!(stack.cache.cache_size(), 2);
}

#[tokio::test]
async fn test_unmatched_names_go_upstream_once() {
    let stack = stack().await;
    let query = Query::new("example.org", RecordType::A);

    let first = stack.resolver.resolve(&query).await;
    let second = stack.resolver.resolve(&query).await;

    assert_eq!(first.status, ResolutionStatus::Ok);
    assert_eq!(
        first.records[0].data,
        RecordData::A(Ipv4Addr::new(203, 0, 113, 7))
    );
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(stack.upstream.udp_queries(), 1);
}
