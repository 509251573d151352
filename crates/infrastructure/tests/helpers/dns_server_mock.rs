#![allow(dead_code)]
use ferrous_bridge_domain::wire::{self, ResponseCode, WireMessage};
use ferrous_bridge_domain::{Query, ResourceRecord};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// What the mock upstream does with a query.
#[derive(Debug, Clone)]
pub enum MockAnswer {
    Records(Vec<ResourceRecord>),
    NxDomain,
    Rcode(ResponseCode),
    /// Never replies.
    Silent,
    /// Empty TC answer over UDP, full answer over TCP.
    Truncated(Vec<ResourceRecord>),
    /// Replies with a different transaction id.
    WrongId,
    /// A wrong-id datagram first, then the real answer. UDP only.
    StrayThen(Vec<ResourceRecord>),
}

type Handler = Arc<dyn Fn(&Query) -> MockAnswer + Send + Sync>;

/// Upstream DNS server on 127.0.0.1 speaking UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Query) -> MockAnswer + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = tcp.local_addr().unwrap();
        let udp = UdpSocket::bind(addr).await.unwrap();

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        udp_count.fetch_add(1, Ordering::SeqCst);
                        for reply in respond(&handler, &buf[..len], false) {
                            let _ = udp.send_to(&reply, peer).await;
                        }
                    }
                    accepted = tcp.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        tcp_count.fetch_add(1, Ordering::SeqCst);
                        let handler = Arc::clone(&handler);
                        tokio::spawn(async move {
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_err() {
                                return;
                            }
                            let mut request = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                            if stream.read_exact(&mut request).await.is_err() {
                                return;
                            }
                            if let Some(reply) = respond(&handler, &request, true).pop() {
                                let _ = stream.write_all(&(reply.len() as u16).to_be_bytes()).await;
                                let _ = stream.write_all(&reply).await;
                            }
                        });
                    }
                }
            }
        });

        Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Answers every query with `answer`.
    pub async fn fixed(answer: MockAnswer) -> Self {
        Self::start(move |_| answer.clone()).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn respond(handler: &Handler, packet: &[u8], over_tcp: bool) -> Vec<Vec<u8>> {
    let Ok(request) = wire::decode(packet) else {
        return Vec::new();
    };
    let Some(question) = request.questions.first() else {
        return Vec::new();
    };
    let query = Query::with_class(&question.name, question.record_type, question.class);

    let mut reply = WireMessage {
        id: request.id,
        flags: request.flags,
        questions: request.questions.clone(),
        ..WireMessage::default()
    };
    reply.flags.response = true;
    reply.flags.recursion_available = true;

    let mut replies = Vec::new();
    match handler(&query) {
        MockAnswer::Records(records) => reply.answers = records,
        MockAnswer::NxDomain => reply.flags.rcode = ResponseCode::NxDomain,
        MockAnswer::Rcode(rcode) => reply.flags.rcode = rcode,
        MockAnswer::Silent => return Vec::new(),
        MockAnswer::Truncated(records) => {
            if over_tcp {
                reply.answers = records;
            } else {
                reply.flags.truncated = true;
            }
        }
        MockAnswer::WrongId => reply.id = request.id.wrapping_add(1),
        MockAnswer::StrayThen(records) => {
            let mut stray = reply.clone();
            stray.id = request.id.wrapping_add(1);
            replies.push(stray);
            reply.answers = records;
        }
    }
    replies.push(reply);

    replies
        .iter()
        .filter_map(|m| wire::encode(m).ok().map(|b| b.to_vec()))
        .collect()
}
