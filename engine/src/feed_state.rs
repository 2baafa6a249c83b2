//! Everything one feed owns: its buffer, its aggregator and the policy used to
//! rank its trending subjects.

use std::borrow::Cow;

use corelib::models::{Event, EventId, FeedKind};
use tracing::trace;

use crate::aggregator::{ActivityAggregator, AggregationState};
use crate::config::{AggregationMode, FeedConfig};
use crate::error::ConfigError;
use crate::feed_buffer::FeedBuffer;
use crate::ranker::{TrendEntry, rank};

/// Summary of a single ingest call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    pub appended: usize,
    pub evicted: usize,
    /// Appended events whose kind feeds the aggregator.
    pub qualifying: usize,
}

#[derive(Debug, Clone)]
pub struct FeedState {
    feed: FeedKind,
    buffer: FeedBuffer,
    /// Only updated in `Cumulative` mode.
    aggregator: ActivityAggregator,
    aggregation: AggregationMode,
    trend_threshold: usize,
    trend_top_k: usize,
    last_id: Option<EventId>,
}

impl FeedState {
    pub fn new(feed: FeedKind, cfg: &FeedConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            feed,
            buffer: FeedBuffer::new(cfg.capacity)?,
            aggregator: ActivityAggregator::new(cfg.qualifying_kinds.clone()),
            aggregation: cfg.aggregation,
            trend_threshold: cfg.trend_threshold,
            trend_top_k: cfg.trend_top_k,
            last_id: None,
        })
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn ingest(&mut self, event: Event) -> IngestOutcome {
        self.ingest_batch(vec![event])
    }

    /// Appends a batch (batch order preserved at the head of the buffer) and
    /// credits qualifying events.
    pub fn ingest_batch(&mut self, events: Vec<Event>) -> IngestOutcome {
        if events.is_empty() {
            return IngestOutcome::default();
        }

        let mut qualifying = 0;
        for event in &events {
            if self.aggregator.is_qualifying(event.kind) {
                qualifying += 1;
            }
            if self.aggregation == AggregationMode::Cumulative {
                self.aggregator.record_if_qualifying(event);
            }
            self.last_id = self.last_id.max(Some(event.id));
        }

        let appended = events.len();
        let evicted = self.buffer.append_batch(events);

        trace!(feed = %self.feed, appended, evicted, qualifying, "feed state updated");

        IngestOutcome {
            appended,
            evicted,
            qualifying,
        }
    }

    /// Highest event id accepted so far.
    pub fn last_id(&self) -> Option<EventId> {
        self.last_id
    }

    pub fn buffer(&self) -> &FeedBuffer {
        &self.buffer
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.buffer.snapshot()
    }

    /// Aggregation the trending view is computed from.
    pub fn aggregation(&self) -> Cow<'_, AggregationState> {
        match self.aggregation {
            AggregationMode::Cumulative => Cow::Borrowed(self.aggregator.state()),
            AggregationMode::Windowed => Cow::Owned(AggregationState::from_events(
                self.buffer.iter_oldest_first(),
                self.aggregator.qualifying_kinds(),
            )),
        }
    }

    pub fn trending(&self) -> Vec<TrendEntry> {
        rank(&self.aggregation(), self.trend_threshold, self.trend_top_k)
    }

    pub fn aggregation_mode(&self) -> AggregationMode {
        self.aggregation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::{EventKind, Payload};

    fn trade(id: u64, actor: &str, subject: &str, kind: EventKind) -> Event {
        Event::new(
            id,
            subject,
            actor,
            kind,
            Payload::Transaction {
                wallet_address: "addr".into(),
                emoji: "🐋".into(),
                amount: 10,
                value_usd: 10.0,
            },
            id * 1_000,
        )
    }

    fn state(mode: AggregationMode, capacity: usize) -> FeedState {
        let cfg = FeedConfig::builder()
            .capacity(capacity)
            .aggregation(mode)
            .build()
            .unwrap();
        FeedState::new(FeedKind::Transactions, &cfg).unwrap()
    }

    #[test]
    fn cumulative_counts_survive_eviction() {
        let mut s = state(AggregationMode::Cumulative, 2);

        s.ingest(trade(1, "A", "SOL", EventKind::Buy));
        s.ingest(trade(2, "B", "SOL", EventKind::Buy));
        s.ingest(trade(3, "C", "BONK", EventKind::Sell));
        s.ingest(trade(4, "D", "BONK", EventKind::Sell));

        assert_eq!(s.aggregation_mode(), AggregationMode::Cumulative);

        // Both buys were evicted but the lifetime counter still remembers them.
        assert!(s.snapshot().iter().all(|e| e.kind == EventKind::Sell));
        assert_eq!(s.aggregation().count("SOL"), 2);
        assert_eq!(s.trending().len(), 1);
    }

    #[test]
    fn windowed_counts_decay_with_eviction() {
        let mut s = state(AggregationMode::Windowed, 3);

        s.ingest(trade(1, "A", "SOL", EventKind::Buy));
        s.ingest(trade(2, "B", "SOL", EventKind::Buy));
        assert_eq!(s.trending()[0].subject, "SOL");

        s.ingest(trade(3, "C", "WIF", EventKind::Sell));
        s.ingest(trade(4, "D", "WIF", EventKind::Sell));

        assert_eq!(s.aggregation_mode(), AggregationMode::Windowed);

        // Only B's buy is left inside the window.
        assert_eq!(s.aggregation().count("SOL"), 1);
        assert!(s.trending().is_empty());
    }

    #[test]
    fn outcome_reports_eviction_and_qualifying() {
        let mut s = state(AggregationMode::Windowed, 2);

        let out = s.ingest_batch(vec![
            trade(1, "A", "SOL", EventKind::Buy),
            trade(2, "B", "SOL", EventKind::Sell),
            trade(3, "C", "SOL", EventKind::Buy),
        ]);

        assert_eq!(
            out,
            IngestOutcome {
                appended: 3,
                evicted: 1,
                qualifying: 2
            }
        );
        assert_eq!(s.last_id(), Some(EventId(3)));
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut s = state(AggregationMode::Cumulative, 5);
        assert_eq!(s.ingest_batch(Vec::new()), IngestOutcome::default());
        assert_eq!(s.last_id(), None);
    }
}
