pub mod aggregator;
pub mod config;
pub mod error;
pub mod feed_buffer;
pub mod feed_state;
pub mod ranker;

pub use aggregator::{ActivityAggregator, AggregationState, SubjectActivity};
pub use config::{AggregationMode, FeedConfig, FeedConfigBuilder};
pub use error::ConfigError;
pub use feed_buffer::FeedBuffer;
pub use feed_state::{FeedState, IngestOutcome};
pub use ranker::{TrendEntry, rank};
