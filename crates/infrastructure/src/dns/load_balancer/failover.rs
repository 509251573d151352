/// Every pass starts from the first configured server.
#[derive(Debug, Default)]
pub struct FailoverStrategy;

impl FailoverStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn start_index(&self, _server_count: usize) -> usize {
        0
    }
}
