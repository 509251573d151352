use serde::Deserialize;

/// `?dns=` parameter of a DNS-over-HTTPS GET (RFC 8484 §4.1).
#[derive(Deserialize, Debug, Default)]
pub struct DohQuery {
    pub dns: Option<String>,
}
