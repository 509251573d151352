use axum::Router;
use ferrous_bridge_api::{create_api_routes, AppState};
use ferrous_bridge_application::ports::ResolutionCachePort;
use ferrous_bridge_application::use_cases::{
    GetCacheStatsUseCase, HandleDnsQueryUseCase, LookupUseCase, ReplyTransport,
};
use ferrous_bridge_domain::config::{CacheConfig, HttpConfig, UpstreamConfig};
use ferrous_bridge_infrastructure::dns::{PoolManager, ResolutionCache, ResolverBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Full resolver stack wired the way the binary wires it.
pub struct Bridge {
    pub cache: Arc<ResolutionCache>,
    pub dns_query: Arc<HandleDnsQueryUseCase>,
    pub router: Router,
}

impl Bridge {
    pub fn new(upstream: SocketAddr) -> Self {
        let upstream_config = UpstreamConfig {
            servers: vec![upstream.to_string()],
            attempt_timeout_ms: 500,
            query_timeout_ms: 2000,
            retries: 1,
            ..UpstreamConfig::default()
        };
        let pool = Arc::new(PoolManager::from_config(&upstream_config).unwrap());
        let cache = Arc::new(ResolutionCache::from_config(&CacheConfig::default()));

        let resolver = ResolverBuilder::new(pool)
            .with_upstream_config(&upstream_config)
            .with_cache(cache.clone())
            .build();

        let lookup = Arc::new(LookupUseCase::new(resolver.clone()));
        let dns_query = Arc::new(HandleDnsQueryUseCase::new(resolver));
        let cache_stats = Arc::new(GetCacheStatsUseCase::new(
            cache.clone() as Arc<dyn ResolutionCachePort>
        ));

        let state = AppState {
            lookup,
            dns_query: dns_query.clone(),
            cache_stats,
        };
        let router = create_api_routes(state, &HttpConfig::default());

        Self {
            cache,
            dns_query,
            router,
        }
    }
}

/// Minimal UDP front-end over the bridge: receive, spawn, reply.
pub struct UdpFrontend {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl UdpFrontend {
    pub async fn start(handler: Arc<HandleDnsQueryUseCase>) -> Self {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let addr = socket.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 65_535];
            loop {
                let Ok((len, client)) = socket.recv_from(&mut buf).await else {
                    continue;
                };
                let packet = buf[..len].to_vec();
                let socket = Arc::clone(&socket);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let transport = ReplyTransport::Udp { max_payload: 4096 };
                    if let Some(reply) = handler.execute(&packet, transport).await {
                        let _ = socket.send_to(&reply.bytes, client).await;
                    }
                });
            }
        });

        Self { addr, task }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for UdpFrontend {
    fn drop(&mut self) {
        self.task.abort();
    }
}
