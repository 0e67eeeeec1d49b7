//! Engine configuration.

/// Tuning for the processing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scoring calls a batch may have in flight at once. 1 processes the
    /// batch strictly in order, one candidate at a time.
    pub concurrency: usize,
    /// Buffer of the engine event channel; slow subscribers lag past it.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            event_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Set batch concurrency (builder pattern). Values below 1 mean 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.concurrency <= 1
    }
}
