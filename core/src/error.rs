use thiserror::Error;

use crate::models::{EventId, EventKind, FeedKind};

/// An event that must not reach a buffer or aggregator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEvent {
    #[error("event {0} has an empty subject")]
    EmptySubject(EventId),

    #[error("event {0} has an empty actor")]
    EmptyActor(EventId),

    #[error("event id {id} is not greater than last accepted id {last}")]
    NonMonotonicId { id: EventId, last: EventId },

    #[error("event {id} of kind {kind} does not belong to the {feed} feed")]
    KindFeedMismatch {
        id: EventId,
        kind: EventKind,
        feed: FeedKind,
    },
}
