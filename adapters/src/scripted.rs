use std::collections::VecDeque;

use async_trait::async_trait;
use corelib::models::{Event, FeedKind};

use crate::source::{Cadence, FeedSource, SourceError};

/// Hands out a fixed list of batches in order, then reports exhaustion.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    feed: FeedKind,
    cadence: Cadence,
    batches: VecDeque<Vec<Event>>,
}

impl ScriptedSource {
    pub fn new(feed: FeedKind, batches: Vec<Vec<Event>>) -> Self {
        Self {
            feed,
            cadence: Cadence::Periodic,
            batches: batches.into(),
        }
    }

    /// One event per tick.
    pub fn from_events(feed: FeedKind, events: Vec<Event>) -> Self {
        Self::new(feed, events.into_iter().map(|e| vec![e]).collect())
    }

    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    fn feed(&self) -> FeedKind {
        self.feed
    }

    fn cadence(&self) -> Cadence {
        self.cadence
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        Ok(self.batches.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::{EventKind, Payload};

    fn post(id: u64) -> Event {
        Event::new(
            id,
            "WIF",
            "@kol",
            EventKind::Post,
            Payload::Post {
                handle: "@kol".into(),
                content: "$WIF".into(),
                likes: 1,
                reposts: 1,
                replies: 1,
            },
            id,
        )
    }

    #[tokio::test]
    async fn hands_out_batches_in_order_then_exhausts() {
        let mut src = ScriptedSource::new(FeedKind::Posts, vec![vec![post(1), post(2)], vec![post(3)]])
            .with_cadence(Cadence::Push);
        assert_eq!(src.cadence(), Cadence::Push);
        assert_eq!(src.remaining(), 2);

        assert_eq!(src.next_batch().await.unwrap().unwrap().len(), 2);
        assert_eq!(src.remaining(), 1);

        assert_eq!(src.next_batch().await.unwrap().unwrap()[0].id.0, 3);
        assert_eq!(src.remaining(), 0);

        assert!(src.next_batch().await.unwrap().is_none());
    }
}
