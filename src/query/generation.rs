use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one request. Only the most recently issued token is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic request counter. Issuing a new generation supersedes every older one.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Supersedes any outstanding request without starting a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn newer_generation_supersedes_older() {
        let counter = GenerationCounter::new();
        let first = counter.begin();
        assert!(counter.is_current(first));
        let second = counter.begin();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        counter.invalidate();
        assert!(!counter.is_current(second));
    }

    #[test]
    fn tokens_can_be_checked_from_other_threads() {
        let counter = Arc::new(GenerationCounter::new());
        let ticket = counter.begin();
        let remote = counter.clone();
        let current = thread::spawn(move || remote.is_current(ticket))
            .join()
            .unwrap();
        assert!(current);
    }
}
