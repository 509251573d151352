//! Ferrous Bridge Infrastructure Layer
pub mod dns;
