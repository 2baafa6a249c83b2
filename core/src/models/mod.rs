mod event;
mod feed;
mod payload;

pub use event::{Event, EventId, EventKind};
pub use feed::FeedKind;
pub use payload::{Payload, SignalDirection};
