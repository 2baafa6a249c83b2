//! Feed controller
//!
//! Owns one feed's `FeedState` and drives its `FeedSource` on a dedicated
//! task:
//!
//! Source → validate → FeedState (buffer + aggregator) → handlers
//!
//! Periodic sources are polled once per tick (missed ticks are skipped, the
//! first tick fires one interval after start). Push sources are polled again
//! as soon as they return, or one tick later after an error or an empty
//! batch. Ingest is synchronous under the feed's write lock;
//! there is at most one ingest in flight per feed.
//!
//! Lifecycle: `stop()` signals the task and waits for it, so no ingest happens
//! once it returns. Dropping a controller without stopping it aborts the task.

use std::sync::Arc;
use std::time::Duration;

use adapters::{Cadence, FeedSource, SourceError};
use common::logger::feed_span;
use corelib::models::{Event, FeedKind};
use engine::{FeedConfig, FeedState};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{Instrument, debug, error, info, warn};

use crate::counters::FeedCounters;
use crate::error::RegistryError;
use crate::handlers::{FeedUpdate, HandlerSet};
use crate::view::FeedView;

pub struct FeedController {
    feed: FeedKind,
    view: FeedView,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

/// State shared between the controller task and its views.
struct Shared {
    feed: FeedKind,
    state: Arc<RwLock<FeedState>>,
    counters: FeedCounters,
    handlers: Arc<HandlerSet>,
}

impl FeedController {
    /// Starts a controller with no update handlers.
    pub fn start<S>(source: S, cfg: &FeedConfig) -> Result<Self, RegistryError>
    where
        S: FeedSource + 'static,
    {
        Self::start_with_handlers(source, cfg, Arc::new(HandlerSet::default()))
    }

    pub(crate) fn start_with_handlers<S>(
        source: S,
        cfg: &FeedConfig,
        handlers: Arc<HandlerSet>,
    ) -> Result<Self, RegistryError>
    where
        S: FeedSource + 'static,
    {
        cfg.validate()?;

        let feed = source.feed();
        let state = Arc::new(RwLock::new(FeedState::new(feed, cfg)?));
        let counters = FeedCounters::default();

        let shared = Arc::new(Shared {
            feed,
            state: Arc::clone(&state),
            counters: counters.clone(),
            handlers,
        });

        let (stop_tx, stop_rx) = watch::channel(false);
        let every = cfg.tick_interval;

        info!(
            feed = %feed,
            every_ms = every.as_millis() as u64,
            capacity = cfg.capacity,
            aggregation = %cfg.aggregation,
            "feed controller starting"
        );

        let handle = tokio::spawn(run(source, shared, every, stop_rx).instrument(feed_span(feed.as_str())));

        Ok(Self {
            feed,
            view: FeedView::new(state, counters),
            stop_tx,
            handle: Some(handle),
        })
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn view(&self) -> FeedView {
        self.view.clone()
    }

    /// True while the task is alive (not stopped, source not exhausted).
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the task and waits for it. Idempotent.
    pub async fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        // The receiver is gone if the task already finished.
        let _ = self.stop_tx.send(true);

        if let Err(e) = handle.await {
            error!(feed = %self.feed, error = %e, "feed controller task failed");
        }

        info!(feed = %self.feed, "feed controller stopped");
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run<S: FeedSource>(
    mut source: S,
    shared: Arc<Shared>,
    every: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let cadence = source.cadence();
    let mut backoff = false;

    debug!(?cadence, "feed controller running");

    loop {
        let polled = tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            polled = poll(&mut source, &mut ticker, cadence, backoff) => polled,
        };

        FeedCounters::add(&shared.counters.polls, 1);

        match polled {
            Ok(Some(batch)) => {
                // An idle push source waits a tick instead of spinning.
                backoff = cadence == Cadence::Push && batch.is_empty();
                shared.ingest(batch);
            }
            Ok(None) => {
                info!(feed = %shared.feed, "feed source exhausted");
                break;
            }
            Err(e) => {
                // Push sources would otherwise spin on a persistent failure.
                backoff = true;
                FeedCounters::add(&shared.counters.source_errors, 1);
                warn!(feed = %shared.feed, error = %e, "feed source poll failed");
            }
        }
    }

    debug!(feed = %shared.feed, "feed controller loop exited");
}

async fn poll<S: FeedSource>(
    source: &mut S,
    ticker: &mut Interval,
    cadence: Cadence,
    backoff: bool,
) -> Result<Option<Vec<Event>>, SourceError> {
    if cadence == Cadence::Periodic || backoff {
        ticker.tick().await;
    } else {
        // A push source that is always ready must not starve `stop()`.
        tokio::task::yield_now().await;
    }
    source.next_batch().await
}

impl Shared {
    /// Validates and ingests one batch, then notifies handlers outside the lock.
    fn ingest(&self, batch: Vec<Event>) {
        if batch.is_empty() {
            return;
        }

        let update = {
            let mut state = self.state.write();

            let mut last = state.last_id();
            let mut accepted = Vec::with_capacity(batch.len());
            let mut rejected = 0;

            for event in batch {
                match event.validate(self.feed, last) {
                    Ok(()) => {
                        last = Some(event.id);
                        accepted.push(event);
                    }
                    Err(e) => {
                        rejected += 1;
                        warn!(feed = %self.feed, error = %e, "rejected malformed event");
                    }
                }
            }

            let outcome = state.ingest_batch(accepted.clone());

            FeedUpdate {
                feed: self.feed,
                events: accepted,
                rejected,
                outcome,
                trending: state.trending(),
            }
        };

        FeedCounters::add(&self.counters.accepted, update.outcome.appended);
        FeedCounters::add(&self.counters.rejected, update.rejected);
        FeedCounters::add(&self.counters.evicted, update.outcome.evicted);
        FeedCounters::add(&self.counters.qualifying, update.outcome.qualifying);

        debug!(
            feed = %self.feed,
            accepted = update.outcome.appended,
            rejected = update.rejected,
            evicted = update.outcome.evicted,
            trending = update.trending.len(),
            "feed batch ingested"
        );

        if update.outcome.appended > 0 && !self.handlers.is_empty() {
            self.handlers.notify(&update, &self.counters);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::ScriptedSource;
    use corelib::models::{EventKind, Payload};
    use tracing_test::traced_test;

    fn buy(id: u64, actor: &str) -> Event {
        Event::new(
            id,
            "WIF",
            actor,
            EventKind::Buy,
            Payload::Transaction {
                wallet_address: "addr".into(),
                emoji: "🐋".into(),
                amount: 1,
                value_usd: 1.0,
            },
            id,
        )
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn logs_lifecycle() {
        let cfg = FeedConfig::for_feed(FeedKind::Transactions).build().unwrap();
        let src = ScriptedSource::from_events(FeedKind::Transactions, vec![buy(1, "A"), buy(2, "B")]);

        let mut ctl = FeedController::start(src, &cfg).unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        ctl.stop().await;

        assert!(logs_contain("feed controller starting"));
        assert!(logs_contain("feed controller stopped"));
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_interval() {
        let cfg = FeedConfig::for_feed(FeedKind::Transactions).build().unwrap();
        let src = ScriptedSource::from_events(FeedKind::Transactions, vec![buy(1, "A")]);

        let mut ctl = FeedController::start(src, &cfg).unwrap();
        let view = ctl.view();

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(view.is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(view.len(), 1);

        ctl.stop().await;
    }
}
