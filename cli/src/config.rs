use std::str::FromStr;

use anyhow::Context;
use corelib::models::FeedKind;
use engine::{AggregationMode, ConfigError, FeedConfig};

use crate::cli::Cli;

/// Settings shared by every feed of one run.
///
/// Read from `HOTFEED_*` variables first, then overridden by CLI flags. Per
/// feed cadence and qualifying kinds come from `FeedConfig::for_feed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Events kept per feed buffer.
    pub capacity: usize,

    /// Distinct actors a subject needs before it trends.
    pub trend_threshold: usize,

    /// Maximum trending subjects reported per feed.
    pub trend_top_k: usize,

    pub aggregation: AggregationMode,

    /// Base seed of the synthetic feeds. Each feed derives its own from it.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let feed = FeedConfig::default();
        Self {
            capacity: feed.capacity,
            trend_threshold: feed.trend_threshold,
            trend_top_k: feed.trend_top_k,
            aggregation: feed.aggregation,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            capacity: parse_var(&get, "HOTFEED_CAPACITY")?.unwrap_or(defaults.capacity),
            trend_threshold: parse_var(&get, "HOTFEED_TREND_THRESHOLD")?
                .unwrap_or(defaults.trend_threshold),
            trend_top_k: parse_var(&get, "HOTFEED_TREND_TOP_K")?.unwrap_or(defaults.trend_top_k),
            aggregation: parse_var(&get, "HOTFEED_AGGREGATION")?.unwrap_or(defaults.aggregation),
            seed: parse_var(&get, "HOTFEED_SEED")?,
        })
    }

    /// Flags win over the environment.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(capacity) = cli.capacity {
            self.capacity = capacity;
        }
        if let Some(threshold) = cli.trend_threshold {
            self.trend_threshold = threshold;
        }
        if let Some(k) = cli.trend_top_k {
            self.trend_top_k = k;
        }
        if let Some(mode) = cli.aggregation {
            self.aggregation = mode;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        self
    }

    pub fn feed_config(&self, feed: FeedKind) -> Result<FeedConfig, ConfigError> {
        FeedConfig::for_feed(feed)
            .capacity(self.capacity)
            .trend_threshold(self.trend_threshold)
            .trend_top_k(self.trend_top_k)
            .aggregation(self.aggregation)
            .build()
    }

    /// Distinct, reproducible seed per feed.
    pub fn feed_seed(&self, feed: FeedKind) -> Option<u64> {
        let offset = FeedKind::ALL.iter().position(|f| *f == feed).unwrap_or(0) as u64;
        self.seed.map(|s| s.wrapping_add(offset))
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = get(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .with_context(|| format!("invalid {key}={raw:?}"))
}
