use crate::normalizer::{error_response, from_wire, respond_to};
use crate::ports::DnsResolver;
use bytes::Bytes;
use ferrous_bridge_domain::wire::{self, Opcode, ResponseCode, WireMessage};
use ferrous_bridge_domain::{EncodeError, ResolutionResult, ResolutionStatus};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// How the encoded reply will travel back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTransport {
    /// Single datagram. The reply is capped at the client's EDNS0 size,
    /// itself bounded by `max_payload`.
    Udp { max_payload: usize },
    /// DNS-over-HTTPS body, no size ceiling.
    Https,
}

#[derive(Debug, Clone)]
pub struct DnsReply {
    pub bytes: Bytes,
    pub status: ResolutionStatus,
    /// Smallest answer TTL, used for HTTP cache headers.
    pub min_ttl: Option<u32>,
}

/// Runs one raw DNS message through decode, resolve and encode.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Returns `None` when the packet must be dropped without a reply:
    /// undecodable input, or a message that is itself a response.
    pub async fn execute(&self, packet: &[u8], transport: ReplyTransport) -> Option<DnsReply> {
        let start = Instant::now();

        let request = match wire::decode(packet) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, len = packet.len(), "Dropping undecodable DNS message");
                return None;
            }
        };

        if request.flags.response {
            debug!(id = request.id, "Dropping DNS message with QR set");
            return None;
        }

        if request.flags.opcode != Opcode::Query {
            return self.reject(&request, ResponseCode::NotImp);
        }

        let Some(query) = from_wire(&request) else {
            return self.reject(&request, ResponseCode::FormErr);
        };

        let result = self.resolver.resolve(&query).await;

        let limit = match transport {
            ReplyTransport::Udp { max_payload } => {
                Some(request.max_udp_payload().min(max_payload))
            }
            ReplyTransport::Https => None,
        };

        let bytes = match respond_to(&request, &result, limit) {
            Ok(bytes) => bytes,
            Err(e) => return self.encode_failure(&request, &result, e),
        };

        debug!(
            domain = %query.name(),
            record_type = %query.record_type(),
            status = %result.status,
            answers = result.records.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "DNS query handled"
        );

        Some(DnsReply {
            bytes,
            status: result.status,
            min_ttl: result.min_ttl(),
        })
    }

    fn reject(&self, request: &WireMessage, rcode: ResponseCode) -> Option<DnsReply> {
        debug!(id = request.id, rcode = %rcode, "Rejecting DNS message");
        let bytes = error_response(request, rcode).ok()?;
        Some(DnsReply {
            bytes,
            status: ResolutionStatus::ServFail,
            min_ttl: None,
        })
    }

    fn encode_failure(
        &self,
        request: &WireMessage,
        result: &ResolutionResult,
        error: EncodeError,
    ) -> Option<DnsReply> {
        warn!(
            domain = %result.query.name(),
            error = %error,
            "Failed to encode answer, replying SERVFAIL"
        );
        self.reject(request, ResponseCode::ServFail)
    }
}
