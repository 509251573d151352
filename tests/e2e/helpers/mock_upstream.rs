use ferrous_bridge_domain::wire::{self, ResponseCode, WireMessage};
use ferrous_bridge_domain::{Query, RecordData, RecordType, ResourceRecord};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// UDP-only upstream with a fixed zone. Names outside the zone get NXDOMAIN.
pub struct MockUpstream {
    addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let mut zone: HashMap<Query, Vec<ResourceRecord>> = HashMap::new();
        zone.insert(
            Query::new("example.test", RecordType::A),
            vec![ResourceRecord::new(
                "example.test",
                RecordType::A,
                300,
                RecordData::A(Ipv4Addr::new(93, 184, 216, 34)),
            )],
        );
        Self::with_zone(zone).await
    }

    pub async fn with_zone(zone: HashMap<Query, Vec<ResourceRecord>>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    continue;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                if let Some(reply) = answer(&zone, &buf[..len]) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Self { addr, calls, task }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn answer(zone: &HashMap<Query, Vec<ResourceRecord>>, packet: &[u8]) -> Option<Vec<u8>> {
    let request = wire::decode(packet).ok()?;
    let question = request.questions.first()?;
    let query = Query::with_class(&question.name, question.record_type, question.class);

    let mut reply = WireMessage {
        id: request.id,
        flags: request.flags,
        questions: request.questions.clone(),
        ..WireMessage::default()
    };
    reply.flags.response = true;
    reply.flags.recursion_available = true;

    match zone.get(&query) {
        Some(records) => reply.answers = records.clone(),
        None => reply.flags.rcode = ResponseCode::NxDomain,
    }

    wire::encode(&reply).ok().map(|b| b.to_vec())
}
