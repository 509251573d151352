use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_https_port")]
    pub https_port: u16,

    #[serde(default)]
    pub https_enabled: bool,

    /// PEM certificate chain. Provisioned outside this process.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    #[serde(default)]
    pub tls_key_path: Option<String>,

    /// Ceiling applied to the payload size a client advertises via EDNS0.
    #[serde(default = "default_max_udp_payload")]
    pub max_udp_payload: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            dns_port: default_dns_port(),
            http_port: default_http_port(),
            https_port: default_https_port(),
            https_enabled: false,
            tls_cert_path: None,
            tls_key_path: None,
            max_udp_payload: default_max_udp_payload(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_dns_port() -> u16 {
    53
}

fn default_http_port() -> u16 {
    80
}

fn default_https_port() -> u16 {
    443
}

fn default_max_udp_payload() -> u16 {
    4096
}
