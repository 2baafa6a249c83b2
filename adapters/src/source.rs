use async_trait::async_trait;
use corelib::models::{Event, FeedKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("line {line}: cannot decode event: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("source i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog has no {0}")]
    EmptyCatalog(&'static str),
}

/// How a controller should drive a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Poll once per tick of the feed's interval.
    Periodic,
    /// The source waits for its own events; poll again as soon as it returns.
    Push,
}

/// Anything that can produce events for one feed.
///
/// Synthetic, replayed and pushed events all come through this seam so the
/// engine is exercised the same way regardless of where events originate.
#[async_trait]
pub trait FeedSource: Send {
    /// Feed this source produces events for.
    fn feed(&self) -> FeedKind;

    fn cadence(&self) -> Cadence {
        Cadence::Periodic
    }

    /// Next batch of events, in the order they should appear at the head of
    /// the feed (a ranked batch lists rank 1 first).
    ///
    /// `Ok(None)` means the source is exhausted and will never produce again.
    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError>;
}

#[async_trait]
impl<S: FeedSource + ?Sized> FeedSource for Box<S> {
    fn feed(&self) -> FeedKind {
        (**self).feed()
    }

    fn cadence(&self) -> Cadence {
        (**self).cadence()
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        (**self).next_batch().await
    }
}

/// Monotonically increasing event ids, starting at 1.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
