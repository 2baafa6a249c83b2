use async_trait::async_trait;
use corelib::models::{Event, FeedKind};
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::source::{Cadence, FeedSource, SourceError};

/// Push source fed through an mpsc channel; the seam a live socket reader
/// would write into.
///
/// Each poll waits for one event, then drains whatever else is already queued
/// so a burst lands as a single batch.
pub struct ChannelSource {
    feed: FeedKind,
    rx: Receiver<Event>,
    max_batch: usize,
}

impl ChannelSource {
    pub fn new(feed: FeedKind, rx: Receiver<Event>) -> Self {
        Self {
            feed,
            rx,
            max_batch: 64,
        }
    }

    /// Convenience: create the channel and the source together.
    pub fn channel(feed: FeedKind, capacity: usize) -> (Sender<Event>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self::new(feed, rx))
    }

    pub fn with_max_batch(mut self, n: usize) -> Self {
        self.max_batch = n.max(1);
        self
    }
}

#[async_trait]
impl FeedSource for ChannelSource {
    fn feed(&self) -> FeedKind {
        self.feed
    }

    fn cadence(&self) -> Cadence {
        Cadence::Push
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        let Some(first) = self.rx.recv().await else {
            // All senders dropped.
            return Ok(None);
        };

        let mut batch = vec![first];
        while batch.len() < self.max_batch {
            match self.rx.try_recv() {
                Ok(more) => batch.push(more),
                Err(_) => break,
            }
        }

        Ok(Some(batch))
    }
}
