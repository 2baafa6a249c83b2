use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use corelib::models::{EventKind, FeedKind};

use crate::error::ConfigError;
use crate::feed_buffer::DEFAULT_CAPACITY;
use crate::ranker::{DEFAULT_TREND_THRESHOLD, DEFAULT_TREND_TOP_K};

pub const DEFAULT_TRANSACTIONS_TICK: Duration = Duration::from_millis(3_000);
pub const DEFAULT_POSTS_TICK: Duration = Duration::from_millis(5_000);
pub const DEFAULT_SIGNALS_TICK: Duration = Duration::from_millis(10_000);

/// How the trending view is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregationMode {
    /// Re-derive counts from the events currently held in the buffer, so a
    /// subject cools down once its qualifying events are evicted.
    #[default]
    Windowed,
    /// Keep a lifetime counter per subject; never decays.
    Cumulative,
}

impl AggregationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMode::Windowed => "windowed",
            AggregationMode::Cumulative => "cumulative",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windowed" | "window" => Ok(AggregationMode::Windowed),
            "cumulative" | "lifetime" => Ok(AggregationMode::Cumulative),
            other => Err(ConfigError::UnknownAggregationMode(other.to_string())),
        }
    }
}

/// Validated configuration of one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Maximum events kept in the feed buffer.
    pub capacity: usize,

    /// Cadence of the periodic source poll.
    pub tick_interval: Duration,

    /// Minimum distinct-actor count for a subject to trend.
    pub trend_threshold: usize,

    /// Maximum number of trending subjects reported.
    pub trend_top_k: usize,

    /// Event kinds that feed the aggregator.
    pub qualifying_kinds: BTreeSet<EventKind>,

    pub aggregation: AggregationMode,
}

impl FeedConfig {
    pub fn builder() -> FeedConfigBuilder {
        FeedConfigBuilder::default()
    }

    /// Checks a config that may have been assembled by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.qualifying_kinds.is_empty() {
            return Err(ConfigError::EmptyQualifyingKinds);
        }
        Ok(())
    }

    /// Builder preloaded with the cadence and qualifying kind of `feed`.
    ///
    /// Transactions trend on buys; posts and signals trend on the number of
    /// distinct accounts or groups mentioning a subject.
    pub fn for_feed(feed: FeedKind) -> FeedConfigBuilder {
        let (tick, kind) = match feed {
            FeedKind::Transactions => (DEFAULT_TRANSACTIONS_TICK, EventKind::Buy),
            FeedKind::Posts => (DEFAULT_POSTS_TICK, EventKind::Post),
            FeedKind::Signals => (DEFAULT_SIGNALS_TICK, EventKind::Signal),
        };

        FeedConfigBuilder::default()
            .tick_interval(tick)
            .qualifying_kinds([kind])
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_interval: DEFAULT_TRANSACTIONS_TICK,
            trend_threshold: DEFAULT_TREND_THRESHOLD,
            trend_top_k: DEFAULT_TREND_TOP_K,
            qualifying_kinds: BTreeSet::from([EventKind::Buy]),
            aggregation: AggregationMode::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedConfigBuilder {
    inner: FeedConfig,
}

impl FeedConfigBuilder {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.inner.capacity = capacity;
        self
    }

    pub fn tick_interval(mut self, every: Duration) -> Self {
        self.inner.tick_interval = every;
        self
    }

    pub fn trend_threshold(mut self, threshold: usize) -> Self {
        self.inner.trend_threshold = threshold;
        self
    }

    pub fn trend_top_k(mut self, k: usize) -> Self {
        self.inner.trend_top_k = k;
        self
    }

    pub fn qualifying_kinds(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
        self.inner.qualifying_kinds = kinds.into_iter().collect();
        self
    }

    pub fn aggregation(mut self, mode: AggregationMode) -> Self {
        self.inner.aggregation = mode;
        self
    }

    /// Fails fast on values the engine cannot run with.
    pub fn build(self) -> Result<FeedConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
