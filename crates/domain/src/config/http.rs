use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// JSON/JSONP lookup endpoint.
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,

    /// RFC 8484 DNS-over-HTTPS endpoint.
    #[serde(default = "default_doh_path")]
    pub doh_path: String,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            lookup_path: default_lookup_path(),
            doh_path: default_doh_path(),
            cors_enabled: true,
        }
    }
}

fn default_lookup_path() -> String {
    "/resolve".to_string()
}

fn default_doh_path() -> String {
    "/dns-query".to_string()
}

fn default_true() -> bool {
    true
}
