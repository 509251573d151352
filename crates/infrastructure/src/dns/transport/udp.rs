//! UDP transport for upstream queries (RFC 1035 §4.2.1).
//!
//! Messages are sent as-is with no framing. A response with TC set is
//! returned unchanged; the caller decides whether to retry over TCP.
//! Stray datagrams can be filtered out with [`UdpTransport::send_and_match`].

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_bridge_domain::UpstreamError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Largest datagram accepted from an upstream.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn io_error(&self, e: std::io::Error) -> UpstreamError {
        UpstreamError::Io {
            server: self.server_addr.to_string(),
            message: e.to_string(),
        }
    }

    fn timeout_error(&self) -> UpstreamError {
        UpstreamError::Timeout {
            server: self.server_addr.to_string(),
        }
    }
}

impl UdpTransport {
    /// Sends `message_bytes` once and reads replies until `accept` takes one
    /// or `timeout` runs out. Datagrams that `accept` rejects with
    /// [`UpstreamError::Mismatch`] are skipped; any other rejection ends the
    /// exchange.
    pub async fn send_and_match<T, F>(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
        mut accept: F,
    ) -> Result<T, UpstreamError>
    where
        F: FnMut(&[u8]) -> Result<T, UpstreamError> + Send,
        T: Send,
    {
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.io_error(e))?;
        // Connected sockets only deliver datagrams from the server.
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| self.io_error(e))?;

        let exchange = async {
            let bytes_sent = socket.send(message_bytes).await.map_err(|e| self.io_error(e))?;
            debug!(server = %self.server_addr, bytes_sent = bytes_sent, "UDP query sent");

            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            loop {
                let bytes_received = socket
                    .recv(&mut recv_buf)
                    .await
                    .map_err(|e| self.io_error(e))?;
                debug!(
                    server = %self.server_addr,
                    bytes_received = bytes_received,
                    "UDP response received"
                );

                match accept(&recv_buf[..bytes_received]) {
                    Err(UpstreamError::Mismatch { .. }) => {
                        debug!(server = %self.server_addr, "Ignoring unrelated UDP datagram");
                    }
                    outcome => return outcome,
                }
            }
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| self.timeout_error())?
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, UpstreamError> {
        let bytes = self
            .send_and_match(message_bytes, timeout, |bytes| Ok(bytes.to_vec()))
            .await?;

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }
}
