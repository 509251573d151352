use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Lifetime of NXDOMAIN, SERVFAIL and empty answers, in seconds.
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u32,

    /// Upper clamp on positive TTLs, in seconds.
    #[serde(default = "default_max_ttl")]
    pub max_ttl: u32,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            negative_ttl: default_negative_ttl(),
            max_ttl: default_max_ttl(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    10_000
}

fn default_negative_ttl() -> u32 {
    30
}

fn default_max_ttl() -> u32 {
    86_400
}

fn default_sweep_interval_secs() -> u64 {
    60
}
