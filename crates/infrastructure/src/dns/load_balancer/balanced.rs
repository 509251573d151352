use std::sync::atomic::{AtomicUsize, Ordering};

/// Rotates the starting server on every pass.
#[derive(Debug, Default)]
pub struct BalancedStrategy {
    counter: AtomicUsize,
}

impl BalancedStrategy {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }

    pub fn start_index(&self, server_count: usize) -> usize {
        if server_count == 0 {
            return 0;
        }
        self.counter.fetch_add(1, Ordering::Relaxed) % server_count
    }
}
