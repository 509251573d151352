//! Ferrous Bridge Application Layer
//!
//! Ports implemented by the infrastructure crate, the query normalizer that
//! translates between wire/HTTP requests and [`Query`], and the use cases the
//! listeners call into.
//!
//! [`Query`]: ferrous_bridge_domain::Query
pub mod normalizer;
pub mod ports;
pub mod use_cases;
