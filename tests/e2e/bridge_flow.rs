mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ferrous_bridge_domain::wire::{self, Question, ResponseCode, WireMessage};
use ferrous_bridge_domain::{RecordData, RecordType};
use helpers::{Bridge, MockUpstream, UdpFrontend};
use http_body_util::BodyExt;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tower::ServiceExt;

async fn get(bridge: &Bridge, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = bridge
        .router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, content_type, body)
}

#[tokio::test]
async fn test_udp_query_resolves_through_upstream() {
    let upstream = MockUpstream::start().await;
    let bridge = Bridge::new(upstream.addr());
    let frontend = UdpFrontend::start(bridge.dns_query.clone()).await;

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let request = WireMessage::query(0x1234, Question::new("example.test", RecordType::A));
    client
        .send_to(&wire::encode(&request).unwrap(), frontend.addr())
        .await
        .unwrap();

    let mut buf = vec![0u8; 4096];
    let (len, _) = tokio::time::timeout(Duration::from_secs(3), client.recv_from(&mut buf))
        .await
        .expect("no reply from the bridge")
        .unwrap();
    let reply = wire::decode(&buf[..len]).unwrap();

    assert_eq!(reply.id, 0x1234);
    assert!(reply.flags.response);
    assert_eq!(reply.flags.rcode, ResponseCode::NoError);
    assert_eq!(reply.questions, request.questions);
    assert_eq!(reply.answers.len(), 1);
    assert_eq!(reply.answers[0].ttl, 300);
    assert_eq!(
        reply.answers[0].data,
        RecordData::A(Ipv4Addr::new(93, 184, 216, 34))
    );
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_udp_and_http_share_the_cache() {
    let upstream = MockUpstream::start().await;
    let bridge = Bridge::new(upstream.addr());
    let frontend = UdpFrontend::start(bridge.dns_query.clone()).await;

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let request = WireMessage::query(7, Question::new("Example.Test", RecordType::A));
    client
        .send_to(&wire::encode(&request).unwrap(), frontend.addr())
        .await
        .unwrap();
    let mut buf = vec![0u8; 4096];
    tokio::time::timeout(Duration::from_secs(3), client.recv_from(&mut buf))
        .await
        .expect("no reply from the bridge")
        .unwrap();

    let (status, content_type, body) = get(&bridge, "/resolve?name=example.test&type=A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed[0]["data"], "93.184.216.34");
    assert_eq!(parsed[0]["ttl"], 300);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_jsonp_nxdomain_is_cached() {
    let upstream = MockUpstream::start().await;
    let bridge = Bridge::new(upstream.addr());

    for _ in 0..2 {
        let (status, content_type, body) =
            get(&bridge, "/resolve?name=nonexistent.test&type=A&callback=cb").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/javascript"));
        assert_eq!(String::from_utf8(body).unwrap(), "cb([])");
    }

    assert_eq!(upstream.calls(), 1);
    assert_eq!(bridge.cache.len(), 1);
}

#[tokio::test]
async fn test_invalid_callback_never_reaches_upstream() {
    let upstream = MockUpstream::start().await;
    let bridge = Bridge::new(upstream.addr());

    let (status, content_type, body) =
        get(&bridge, "/resolve?name=example.test&type=A&callback=cb();evil()").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains("invalid_callback"));
    assert!(!body.starts_with("cb"));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_doh_get_round_trip() {
    let upstream = MockUpstream::start().await;
    let bridge = Bridge::new(upstream.addr());

    let request = WireMessage::query(0, Question::new("example.test", RecordType::A));
    let encoded = URL_SAFE_NO_PAD.encode(wire::encode(&request).unwrap());

    let (status, content_type, body) = get(&bridge, &format!("/dns-query?dns={}", encoded)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/dns-message"));
    let reply = wire::decode(&body).unwrap();
    assert_eq!(reply.id, 0);
    assert_eq!(reply.answers.len(), 1);
    assert_eq!(reply.answers[0].ttl, 300);
}

#[tokio::test]
async fn test_stats_reflect_traffic() {
    let upstream = MockUpstream::start().await;
    let bridge = Bridge::new(upstream.addr());

    get(&bridge, "/resolve?name=example.test").await;
    get(&bridge, "/resolve?name=example.test").await;

    let (status, _, body) = get(&bridge, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains("\"total_entries\":1"), "{}", body);
    assert!(body.contains("\"insertions\":1"), "{}", body);
    assert_eq!(upstream.calls(), 1);
}
