use std::sync::Arc;

use corelib::models::{Event, FeedKind};
use engine::{AggregationState, FeedState, TrendEntry};
use parking_lot::RwLock;

use crate::counters::{CountersSnapshot, FeedCounters};

/// Read-only handle on one feed.
///
/// Every read takes the feed's read lock, so a reader never observes a buffer
/// mid-truncation or a count without its actor. Views stay valid after the
/// controller is torn down and then show the final state.
#[derive(Clone)]
pub struct FeedView {
    feed: FeedKind,
    state: Arc<RwLock<FeedState>>,
    counters: FeedCounters,
}

impl FeedView {
    pub(crate) fn new(state: Arc<RwLock<FeedState>>, counters: FeedCounters) -> Self {
        let feed = state.read().feed();
        Self {
            feed,
            state,
            counters,
        }
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    /// Newest-first events currently held by the feed.
    pub fn snapshot(&self) -> Vec<Event> {
        self.state.read().snapshot()
    }

    pub fn len(&self) -> usize {
        self.state.read().buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().buffer().is_empty()
    }

    pub fn latest(&self) -> Option<Event> {
        self.state.read().buffer().latest().cloned()
    }

    /// Ranked trending subjects under the feed's configured policy.
    pub fn trending(&self) -> Vec<TrendEntry> {
        self.state.read().trending()
    }

    /// Aggregation the trending view is derived from.
    pub fn aggregation(&self) -> AggregationState {
        self.state.read().aggregation().into_owned()
    }

    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }
}

impl std::fmt::Debug for FeedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedView")
            .field("feed", &self.feed)
            .field("len", &self.len())
            .finish()
    }
}
