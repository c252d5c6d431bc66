use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic resolution counter for one UI surface. A resolution remembers
/// the generation it started in and only publishes while it is still the
/// latest.
#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}
