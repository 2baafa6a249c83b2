use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FeedKind, Payload};
use crate::error::MalformedEvent;

/// Per-feed identifier, strictly increasing in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Buy,
    Sell,
    Post,
    Signal,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Buy => "buy",
            EventKind::Sell => "sell",
            EventKind::Post => "post",
            EventKind::Signal => "signal",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(EventKind::Buy),
            "sell" => Ok(EventKind::Sell),
            "post" => Ok(EventKind::Post),
            "signal" => Ok(EventKind::Signal),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// A single observation on one feed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Coin symbol the event is about.
    pub subject: String,
    /// Wallet, account or group that produced the event.
    pub actor: String,
    pub kind: EventKind,
    pub payload: Payload,
    pub observed_at_ms: u64,
}

impl Event {
    pub fn new(
        id: u64,
        subject: impl Into<String>,
        actor: impl Into<String>,
        kind: EventKind,
        payload: Payload,
        observed_at_ms: u64,
    ) -> Self {
        Self {
            id: EventId(id),
            subject: subject.into(),
            actor: actor.into(),
            kind,
            payload,
            observed_at_ms,
        }
    }

    /// Structural checks done at the source boundary.
    ///
    /// `last_id` is the id of the previous event accepted on the same feed.
    pub fn validate(&self, feed: FeedKind, last_id: Option<EventId>) -> Result<(), MalformedEvent> {
        if self.subject.trim().is_empty() {
            return Err(MalformedEvent::EmptySubject(self.id));
        }
        if self.actor.trim().is_empty() {
            return Err(MalformedEvent::EmptyActor(self.id));
        }
        if !feed.accepts(self.kind) {
            return Err(MalformedEvent::KindFeedMismatch {
                id: self.id,
                kind: self.kind,
                feed,
            });
        }
        match last_id {
            Some(last) if self.id <= last => Err(MalformedEvent::NonMonotonicId { id: self.id, last }),
            _ => Ok(()),
        }
    }
}
