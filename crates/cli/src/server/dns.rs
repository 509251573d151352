use ferrous_bridge_application::use_cases::{HandleDnsQueryUseCase, ReplyTransport};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const RECV_BUFFER_SIZE: usize = 65_535;
const SOCKET_BUFFER_SIZE: usize = 512 * 1024;

/// UDP front-end. One receive loop, one task per datagram, so a slow
/// resolution never holds up the next packet.
pub struct DnsListener {
    socket: Arc<UdpSocket>,
    handler: Arc<HandleDnsQueryUseCase>,
    max_payload: usize,
}

impl DnsListener {
    pub fn bind(
        bind_addr: SocketAddr,
        handler: Arc<HandleDnsQueryUseCase>,
        max_payload: usize,
    ) -> anyhow::Result<Self> {
        let socket = create_udp_socket(bind_addr)?;
        info!(bind_address = %socket.local_addr()?, max_payload, "DNS listener bound");
        Ok(Self {
            socket: Arc::new(socket),
            handler,
            max_payload,
        })
    }

    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let mut recv_buf = vec![0u8; RECV_BUFFER_SIZE];

        loop {
            let (len, client) = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("DNS listener shutting down");
                    return Ok(());
                }
                received = self.socket.recv_from(&mut recv_buf) => match received {
                    Ok(r) => r,
                    Err(e) if is_transient(&e) => {
                        debug!(error = %e, "Transient UDP receive error");
                        continue;
                    }
                    Err(e) => {
                        error!(error = %e, "UDP receive error");
                        return Err(e.into());
                    }
                },
            };

            let packet = recv_buf[..len].to_vec();
            let socket = self.socket.clone();
            let handler = self.handler.clone();
            let transport = ReplyTransport::Udp {
                max_payload: self.max_payload,
            };

            tokio::spawn(async move {
                let Some(reply) = handler.execute(&packet, transport).await else {
                    return;
                };
                if let Err(e) = socket.send_to(&reply.bytes, client).await {
                    debug!(client = %client, error = %e, "Failed to send DNS reply");
                }
            });
        }
    }
}

/// ICMP port-unreachable from an earlier reply surfaces on the next
/// `recv_from` on some platforms.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
