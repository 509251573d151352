use clap::Parser;
use ferrous_bridge_domain::config::LogFormat;
use ferrous_bridge_domain::CliOverrides;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ferrous-bridge")]
#[command(version)]
#[command(about = "Ferrous Bridge - DNS to HTTP/JSON bridging proxy")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", env = "FERROUS_BRIDGE_CONFIG")]
    config: Option<String>,

    /// DNS (UDP) listener port
    #[arg(short = 'd', long, env = "FERROUS_BRIDGE_DNS_PORT")]
    dns_port: Option<u16>,

    /// HTTP listener port
    #[arg(short = 'w', long, env = "FERROUS_BRIDGE_HTTP_PORT")]
    http_port: Option<u16>,

    /// HTTPS listener port
    #[arg(long, env = "FERROUS_BRIDGE_HTTPS_PORT")]
    https_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, env = "FERROUS_BRIDGE_BIND")]
    bind: Option<String>,

    /// Upstream resolvers, comma separated (e.g. 8.8.8.8:53,1.1.1.1:53)
    #[arg(short = 'u', long, value_delimiter = ',', env = "FERROUS_BRIDGE_UPSTREAM")]
    upstream: Option<Vec<String>>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FERROUS_BRIDGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_parser = ["text", "json"], env = "FERROUS_BRIDGE_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        http_port: cli.http_port,
        https_port: cli.https_port,
        bind_address: cli.bind.clone(),
        upstream_servers: cli.upstream.clone(),
        log_level: cli.log_level.clone(),
        log_format: cli.log_format.as_deref().map(|f| match f {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Bridge v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();

    let services = di::BridgeServices::new(&config)?;
    let job_handles = services.start_jobs(&config, shutdown.clone()).await;

    let dns_addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.dns_port).parse()?;
    let dns_listener = server::DnsListener::bind(
        dns_addr,
        services.dns_query.clone(),
        config.server.max_udp_payload as usize,
    )?;
    let dns_shutdown = shutdown.clone();
    let dns_task = tokio::spawn(async move {
        if let Err(e) = dns_listener.run(dns_shutdown).await {
            error!(error = %e, "DNS listener error");
        }
    });

    let router = services.router(&config);

    let https_task = if config.server.https_enabled {
        let https_addr: SocketAddr =
            format!("{}:{}", config.server.bind_address, config.server.https_port).parse()?;
        let tls_config = server::load_tls_config(
            config.server.tls_cert_path.as_deref().unwrap_or_default(),
            config.server.tls_key_path.as_deref().unwrap_or_default(),
        )?;
        let https = server::HttpsListener::bind(https_addr, tls_config, router.clone()).await?;
        let https_shutdown = shutdown.clone();
        Some(tokio::spawn(async move {
            https.run(https_shutdown).await;
        }))
    } else {
        None
    };

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    let http_addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.http_port).parse()?;

    // Blocks until the shutdown token fires.
    server::start_web_server(http_addr, router, shutdown.clone()).await?;

    shutdown.cancel();
    let _ = dns_task.await;
    if let Some(task) = https_task {
        let _ = task.await;
    }
    for handle in job_handles {
        let _ = handle.await;
    }

    info!("Server shutdown complete");
    Ok(())
}
