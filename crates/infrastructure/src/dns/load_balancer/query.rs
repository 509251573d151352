use crate::dns::transport::tcp::TcpTransport;
use crate::dns::transport::udp::UdpTransport;
use crate::dns::transport::DnsTransport;
use async_trait::async_trait;
use ferrous_bridge_domain::dns_query::normalize_name;
use ferrous_bridge_domain::wire::{self, Question, ResponseCode, WireMessage};
use ferrous_bridge_domain::{Query, UpstreamError};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Sends one query to one server and returns its verified answer.
///
/// Implementations return `Ok` only for `NOERROR` and `NXDOMAIN`; every other
/// outcome is an error so the caller can move on to the next server.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &Query,
        timeout: Duration,
    ) -> Result<WireMessage, UpstreamError>;
}

/// Plain DNS over UDP, retried over TCP when the answer comes back truncated.
#[derive(Debug, Default)]
pub struct WireExchange;

impl WireExchange {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UpstreamExchange for WireExchange {
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &Query,
        timeout: Duration,
    ) -> Result<WireMessage, UpstreamError> {
        let deadline = Instant::now() + timeout;

        let request = WireMessage::query(
            fastrand::u16(..),
            Question {
                name: query.name().to_string(),
                record_type: query.record_type(),
                class: query.class(),
            },
        );
        let message_bytes = wire::encode(&request).map_err(|e| UpstreamError::Io {
            server: server.to_string(),
            message: e.to_string(),
        })?;

        // Unrelated datagrams are skipped until the deadline.
        let mut response = UdpTransport::new(server)
            .send_and_match(&message_bytes, timeout, |bytes| {
                parse_response(server, &request, bytes)
            })
            .await?;

        if response.flags.truncated {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(UpstreamError::Timeout {
                    server: server.to_string(),
                });
            }

            debug!(server = %server, query = %query, "Truncated UDP answer, retrying over TCP");
            let raw = TcpTransport::new(server)
                .send(&message_bytes, remaining)
                .await?;
            debug!(server = %server, protocol = raw.protocol_used, "Retry answered");
            response = parse_response(server, &request, &raw.bytes)?;
        }

        match response.flags.rcode {
            ResponseCode::NoError | ResponseCode::NxDomain => Ok(response),
            rcode => Err(UpstreamError::Rcode {
                server: server.to_string(),
                rcode: rcode.as_str(),
            }),
        }
    }
}

/// Decodes `bytes` and checks it answers `request`: same id, QR set, and the
/// question echoed back.
pub fn parse_response(
    server: SocketAddr,
    request: &WireMessage,
    bytes: &[u8],
) -> Result<WireMessage, UpstreamError> {
    let response = wire::decode(bytes).map_err(|source| UpstreamError::Malformed {
        server: server.to_string(),
        source,
    })?;

    let question_matches = match (request.questions.first(), response.questions.first()) {
        (Some(asked), Some(echoed)) => {
            normalize_name(&echoed.name) == normalize_name(&asked.name)
                && echoed.record_type == asked.record_type
                && echoed.class == asked.class
        }
        _ => false,
    };

    if response.id != request.id || !response.flags.response || !question_matches {
        debug!(
            server = %server,
            expected_id = request.id,
            received_id = response.id,
            "Upstream response does not match query"
        );
        return Err(UpstreamError::Mismatch {
            server: server.to_string(),
        });
    }

    Ok(response)
}
