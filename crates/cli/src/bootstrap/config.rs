use ferrous_bridge_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        dns_port = config.server.dns_port,
        http_port = config.server.http_port,
        https_enabled = config.server.https_enabled,
        bind = %config.server.bind_address,
        upstreams = config.upstream.servers.len(),
        "Configuration loaded"
    );

    Ok(config)
}
