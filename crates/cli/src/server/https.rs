use anyhow::{anyhow, Context};
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use hyper_util::service::TowerToHyperService;
use rustls::pki_types::CertificateDer;
use rustls::ServerConfig;
use socket2::{Domain, Socket, Type};
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

const ALPN_H2: &[u8] = b"h2";
const ALPN_HTTP11: &[u8] = b"http/1.1";

/// Builds the rustls server config from PEM files provisioned outside the
/// process. HTTP/2 is offered first, with HTTP/1.1 as fallback.
pub fn load_tls_config(cert_path: &str, key_path: &str) -> anyhow::Result<Arc<ServerConfig>> {
    let cert_file = File::open(cert_path)
        .with_context(|| format!("Failed to open certificate file '{}'", cert_path))?;
    let certs: Vec<CertificateDer<'static>> =
        rustls_pemfile::certs(&mut BufReader::new(cert_file))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to parse certificates")?;

    if certs.is_empty() {
        return Err(anyhow!("No certificates found in '{}'", cert_path));
    }

    let key_file =
        File::open(key_path).with_context(|| format!("Failed to open key file '{}'", key_path))?;
    let key = rustls_pemfile::private_key(&mut BufReader::new(key_file))
        .context("Failed to parse private key")?
        .ok_or_else(|| anyhow!("No private key found in '{}'", key_path))?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("Failed to build TLS config")?;
    config.alpn_protocols = vec![ALPN_H2.to_vec(), ALPN_HTTP11.to_vec()];

    Ok(Arc::new(config))
}

/// The HTTP router served over TLS.
pub struct HttpsListener {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    router: Router,
}

impl HttpsListener {
    pub async fn bind(
        addr: SocketAddr,
        tls_config: Arc<ServerConfig>,
        router: Router,
    ) -> anyhow::Result<Self> {
        let domain = if addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };
        let socket = Socket::new(domain, Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(1024)?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = TcpListener::from_std(std_listener)?;

        info!(bind_address = %listener.local_addr()?, "HTTPS listener bound");

        Ok(Self {
            listener,
            acceptor: TlsAcceptor::from(tls_config),
            router,
        })
    }

    /// Accepts until the token is cancelled. Connections already in flight
    /// finish on their own.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            let accepted = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("HTTPS listener shutting down");
                    return;
                }
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => {
                    let acceptor = self.acceptor.clone();
                    let router = self.router.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, peer, acceptor, router).await {
                            debug!(client = %peer, error = %e, "HTTPS connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Error accepting HTTPS connection");
                }
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    acceptor: TlsAcceptor,
    router: Router,
) -> anyhow::Result<()> {
    trace!(client = %peer, "New HTTPS connection");

    let tls_stream = acceptor
        .accept(stream)
        .await
        .context("TLS handshake failed")?;

    let io = TokioIo::new(tls_stream);
    let service = TowerToHyperService::new(router);

    if let Err(e) = ConnectionBuilder::new(TokioExecutor::new())
        .serve_connection_with_upgrades(io, service)
        .await
    {
        // Usually a client disconnect.
        debug!(client = %peer, error = %e, "HTTPS connection ended");
    }

    Ok(())
}
