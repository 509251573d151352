use super::balanced::BalancedStrategy;
use super::failover::FailoverStrategy;
use ferrous_bridge_domain::config::UpstreamStrategy;
use ferrous_bridge_domain::WireMessage;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct UpstreamResult {
    pub response: WireMessage,
    pub server: SocketAddr,
    pub latency_ms: u64,
}

/// Decides where each pass over the server list starts.
pub enum Strategy {
    Failover(FailoverStrategy),
    Balanced(BalancedStrategy),
}

impl Strategy {
    pub fn from_config(strategy: UpstreamStrategy) -> Self {
        match strategy {
            UpstreamStrategy::Failover => Strategy::Failover(FailoverStrategy::new()),
            UpstreamStrategy::RoundRobin => Strategy::Balanced(BalancedStrategy::new()),
        }
    }

    pub fn start_index(&self, server_count: usize) -> usize {
        match self {
            Strategy::Failover(s) => s.start_index(server_count),
            Strategy::Balanced(s) => s.start_index(server_count),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Failover(_) => "failover",
            Strategy::Balanced(_) => "round_robin",
        }
    }
}
