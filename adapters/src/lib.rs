pub mod channel;
pub mod replay;
pub mod scripted;
pub mod source;
pub mod synthetic;

pub use channel::ChannelSource;
pub use replay::ReplaySource;
pub use scripted::ScriptedSource;
pub use source::{Cadence, FeedSource, IdSequence, SourceError};
pub use synthetic::{Catalog, SyntheticPosts, SyntheticSignals, SyntheticTransactions};
