use axum::Router;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_web_server(
    bind_addr: SocketAddr,
    app: Router,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    info!(
        bind_address = %bind_addr,
        url = format!("http://{}", bind_addr),
        "Starting HTTP listener"
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("HTTP listener started successfully");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP listener stopped");
    Ok(())
}
