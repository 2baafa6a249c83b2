use std::sync::Arc;

use corelib::models::{Event, FeedKind};
use engine::{IngestOutcome, TrendEntry};
use parking_lot::RwLock;
use tracing::error;

use crate::counters::FeedCounters;

/// What a feed looked like right after one ingest.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    pub feed: FeedKind,
    /// Events accepted in this batch, in arrival order.
    pub events: Vec<Event>,
    pub rejected: usize,
    pub outcome: IngestOutcome,
    pub trending: Vec<TrendEntry>,
}

/// Thread-safe callback receiving every update of a feed.
pub type UpdateHandler = Arc<dyn Fn(&FeedUpdate) + Send + Sync + 'static>;

/// Called when a handler panics.
pub type PanicHook = Arc<dyn Fn(FeedKind, &FeedUpdate) + Send + Sync + 'static>;

/// Handlers of one feed. Shared between the registry (which adds to it) and
/// the controller task (which notifies it).
#[derive(Default)]
pub(crate) struct HandlerSet {
    handlers: RwLock<Vec<UpdateHandler>>,
    on_panic: RwLock<Option<PanicHook>>,
}

impl HandlerSet {
    pub(crate) fn push(&self, handler: UpdateHandler) {
        self.handlers.write().push(handler);
    }

    pub(crate) fn set_panic_hook(&self, hook: Option<PanicHook>) {
        *self.on_panic.write() = hook;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    /// Runs every handler. Each run is wrapped in `catch_unwind` so one bad
    /// handler does not prevent the others from running.
    pub(crate) fn notify(&self, update: &FeedUpdate, counters: &FeedCounters) {
        // Clone the list so handlers may register further handlers.
        let handlers: Vec<UpdateHandler> = self.handlers.read().clone();

        for handler in handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(update);
            }));

            if result.is_err() {
                FeedCounters::add(&counters.handler_panics, 1);
                error!(feed = %update.feed, "feed update handler panicked");

                if let Some(hook) = self.on_panic.read().clone() {
                    let hooked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        hook(update.feed, update);
                    }));
                    if hooked.is_err() {
                        error!(feed = %update.feed, "handler panic hook panicked");
                    }
                }
            }
        }
    }
}
