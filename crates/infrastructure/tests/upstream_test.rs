mod helpers;

use ferrous_bridge_application::ports::DnsResolver;
use ferrous_bridge_domain::config::{UpstreamConfig, UpstreamStrategy};
use ferrous_bridge_domain::wire::ResponseCode;
use ferrous_bridge_domain::{
    Query, RecordData, RecordType, ResolutionStatus, ResourceRecord, UpstreamError,
};
use ferrous_bridge_infrastructure::dns::{
    CoreResolver, PoolManager, RetryPolicy, UpstreamExchange, WireExchange,
};
use helpers::{MockAnswer, MockDnsServer};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn a_record(name: &str, ttl: u32, ip: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(
        name,
        RecordType::A,
        ttl,
        RecordData::A(Ipv4Addr::from(ip)),
    )
}

fn upstream_config(servers: &[&MockDnsServer], strategy: UpstreamStrategy) -> UpstreamConfig {
    UpstreamConfig {
        servers: servers.iter().map(|s| s.addr().to_string()).collect(),
        strategy,
        attempt_timeout_ms: 200,
        query_timeout_ms: 2000,
        retries: 0,
        backoff_base_ms: 10,
        backoff_max_ms: 20,
    }
}

fn core_resolver(config: &UpstreamConfig) -> CoreResolver {
    let pool = PoolManager::from_config(config).unwrap();
    CoreResolver::new(Arc::new(pool), RetryPolicy::from_config(config))
}

#[tokio::test]
async fn test_exchange_returns_upstream_answer() {
    let server =
        MockDnsServer::fixed(MockAnswer::Records(vec![a_record("example.com", 300, [93, 184, 216, 34])]))
            .await;

    let response = WireExchange::new()
        .exchange(
            server.addr(),
            &Query::new("example.com", RecordType::A),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert!(response.flags.response);
    assert_eq!(response.answers.len(), 1);
    assert_eq!(
        response.answers[0].data,
        RecordData::A(Ipv4Addr::new(93, 184, 216, 34))
    );
    assert_eq!(server.udp_queries(), 1);
}

#[tokio::test]
async fn test_truncated_answer_is_retried_over_tcp() {
    let server =
        MockDnsServer::fixed(MockAnswer::Truncated(vec![a_record("big.test", 60, [10, 0, 0, 9])]))
            .await;

    let response = WireExchange::new()
        .exchange(
            server.addr(),
            &Query::new("big.test", RecordType::A),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert!(!response.flags.truncated);
    assert_eq!(response.answers.len(), 1);
    assert_eq!(server.udp_queries(), 1);
    assert_eq!(server.tcp_queries(), 1);
}

#[tokio::test]
async fn test_mismatched_id_is_never_accepted() {
    let server = MockDnsServer::fixed(MockAnswer::WrongId).await;

    let err = WireExchange::new()
        .exchange(
            server.addr(),
            &Query::new("example.com", RecordType::A),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "{:?}", err);
}

#[tokio::test]
async fn test_stray_datagram_does_not_fail_the_attempt() {
    let server =
        MockDnsServer::fixed(MockAnswer::StrayThen(vec![a_record("example.com", 60, [10, 1, 2, 3])]))
            .await;

    let response = WireExchange::new()
        .exchange(
            server.addr(),
            &Query::new("example.com", RecordType::A),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert_eq!(
        response.answers[0].data,
        RecordData::A(Ipv4Addr::new(10, 1, 2, 3))
    );
    assert_eq!(server.udp_queries(), 1);
}

#[tokio::test]
async fn test_refused_is_an_error() {
    let server = MockDnsServer::fixed(MockAnswer::Rcode(ResponseCode::Refused)).await;

    let err = WireExchange::new()
        .exchange(
            server.addr(),
            &Query::new("example.com", RecordType::A),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UpstreamError::Rcode {
            server: server.addr().to_string(),
            rcode: "REFUSED"
        }
    );
}

#[tokio::test]
async fn test_servfail_fails_over_to_next_server() {
    let broken = MockDnsServer::fixed(MockAnswer::Rcode(ResponseCode::ServFail)).await;
    let healthy =
        MockDnsServer::fixed(MockAnswer::Records(vec![a_record("example.com", 120, [1, 2, 3, 4])]))
            .await;

    let resolver = core_resolver(&upstream_config(&[&broken, &healthy], UpstreamStrategy::Failover));
    let result = resolver.resolve(&Query::new("example.com", RecordType::A)).await;

    assert_eq!(result.status, ResolutionStatus::Ok);
    assert_eq!(result.records.len(), 1);
    assert_eq!(broken.udp_queries(), 1);
    assert_eq!(healthy.udp_queries(), 1);
}

#[tokio::test]
async fn test_nxdomain_is_final() {
    let first = MockDnsServer::fixed(MockAnswer::NxDomain).await;
    let second =
        MockDnsServer::fixed(MockAnswer::Records(vec![a_record("gone.test", 120, [1, 2, 3, 4])]))
            .await;

    let resolver = core_resolver(&upstream_config(&[&first, &second], UpstreamStrategy::Failover));
    let result = resolver.resolve(&Query::new("gone.test", RecordType::A)).await;

    assert_eq!(result.status, ResolutionStatus::NxDomain);
    assert!(result.records.is_empty());
    assert_eq!(second.udp_queries(), 0);
}

#[tokio::test]
async fn test_nodata_is_final() {
    let first = MockDnsServer::fixed(MockAnswer::Records(vec![])).await;
    let second =
        MockDnsServer::fixed(MockAnswer::Records(vec![a_record("v4only.test", 120, [1, 2, 3, 4])]))
            .await;

    let resolver = core_resolver(&upstream_config(&[&first, &second], UpstreamStrategy::Failover));
    let result = resolver
        .resolve(&Query::new("v4only.test", RecordType::AAAA))
        .await;

    assert_eq!(result.status, ResolutionStatus::Ok);
    assert!(result.records.is_empty());
    assert_eq!(second.udp_queries(), 0);
}

#[tokio::test]
async fn test_round_robin_rotates_starting_server() {
    let records = vec![a_record("rr.test", 120, [1, 1, 1, 1])];
    let one = MockDnsServer::fixed(MockAnswer::Records(records.clone())).await;
    let two = MockDnsServer::fixed(MockAnswer::Records(records)).await;

    let resolver = core_resolver(&upstream_config(&[&one, &two], UpstreamStrategy::RoundRobin));
    for _ in 0..4 {
        let result = resolver.resolve(&Query::new("rr.test", RecordType::A)).await;
        assert_eq!(result.status, ResolutionStatus::Ok);
    }

    assert_eq!(one.udp_queries(), 2);
    assert_eq!(two.udp_queries(), 2);
}

#[tokio::test]
async fn test_retries_exhausted_on_servfail_gives_servfail() {
    let server = MockDnsServer::fixed(MockAnswer::Rcode(ResponseCode::ServFail)).await;
    let mut config = upstream_config(&[&server], UpstreamStrategy::Failover);
    config.retries = 2;

    let result = core_resolver(&config)
        .resolve(&Query::new("broken.test", RecordType::A))
        .await;

    assert_eq!(result.status, ResolutionStatus::ServFail);
    assert_eq!(server.udp_queries(), 3);
}

#[tokio::test]
async fn test_silent_upstream_gives_timeout() {
    let server = MockDnsServer::fixed(MockAnswer::Silent).await;
    let mut config = upstream_config(&[&server], UpstreamStrategy::Failover);
    config.attempt_timeout_ms = 50;
    config.retries = 1;

    let result = core_resolver(&config)
        .resolve(&Query::new("slow.test", RecordType::A))
        .await;

    assert_eq!(result.status, ResolutionStatus::Timeout);
    assert_eq!(server.udp_queries(), 2);
}

#[tokio::test]
async fn test_overall_deadline_bounds_retries() {
    let server = MockDnsServer::fixed(MockAnswer::Silent).await;
    let mut config = upstream_config(&[&server], UpstreamStrategy::Failover);
    config.attempt_timeout_ms = 100;
    config.query_timeout_ms = 250;
    config.retries = 20;

    let started = Instant::now();
    let result = core_resolver(&config)
        .resolve(&Query::new("slow.test", RecordType::A))
        .await;

    assert_eq!(result.status, ResolutionStatus::Timeout);
    assert!(started.elapsed() < Duration::from_secs(2));
}
