use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-feed counters for operational visibility. Never affect behavior.
#[derive(Clone, Default, Debug)]
pub struct FeedCounters {
    pub polls: Arc<AtomicU64>,
    pub accepted: Arc<AtomicU64>,
    pub rejected: Arc<AtomicU64>,
    pub evicted: Arc<AtomicU64>,
    pub qualifying: Arc<AtomicU64>,

    // failures
    pub source_errors: Arc<AtomicU64>,
    pub handler_panics: Arc<AtomicU64>,
}

/// Plain copy of `FeedCounters` at one instant.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub polls: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub evicted: u64,
    pub qualifying: u64,
    pub source_errors: u64,
    pub handler_panics: u64,
}

impl FeedCounters {
    pub(crate) fn add(counter: &AtomicU64, n: usize) {
        if n > 0 {
            counter.fetch_add(n as u64, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);

        CountersSnapshot {
            polls: load(&self.polls),
            accepted: load(&self.accepted),
            rejected: load(&self.rejected),
            evicted: load(&self.evicted),
            qualifying: load(&self.qualifying),
            source_errors: load(&self.source_errors),
            handler_panics: load(&self.handler_panics),
        }
    }
}
