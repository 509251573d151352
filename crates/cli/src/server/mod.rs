pub mod dns;
pub mod https;
pub mod web;

pub use dns::DnsListener;
pub use https::{load_tls_config, HttpsListener};
pub use web::start_web_server;
