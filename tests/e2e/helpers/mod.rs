#![allow(dead_code)]
mod bridge;
mod mock_upstream;

pub use bridge::{Bridge, UdpFrontend};
pub use mock_upstream::MockUpstream;
