use std::path::PathBuf;

use clap::Parser;
use corelib::models::FeedKind;
use engine::AggregationMode;

#[derive(Debug, Parser)]
#[clap(name = "hotfeed", version, about = "Live whale, post and signal feeds with trending subjects")]
pub struct Cli {
    /// Which feeds to run (comma-separated)
    #[clap(
        long,
        value_delimiter = ',',
        default_value = "transactions,posts,signals"
    )]
    pub feeds: Vec<FeedKind>,

    /// Events kept per feed (overrides HOTFEED_CAPACITY)
    #[clap(long)]
    pub capacity: Option<usize>,

    /// Distinct actors a subject needs to trend (overrides HOTFEED_TREND_THRESHOLD)
    #[clap(long)]
    pub trend_threshold: Option<usize>,

    /// Maximum trending subjects per feed (overrides HOTFEED_TREND_TOP_K)
    #[clap(long)]
    pub trend_top_k: Option<usize>,

    /// `windowed` or `cumulative` (overrides HOTFEED_AGGREGATION)
    #[clap(long)]
    pub aggregation: Option<AggregationMode>,

    /// Seed for the synthetic feeds (overrides HOTFEED_SEED)
    #[clap(long)]
    pub seed: Option<u64>,

    /// Replay a JSON-lines event log instead of running synthetic feeds
    #[clap(long)]
    pub replay: Option<PathBuf>,

    /// Feed the replayed events belong to
    #[clap(long, default_value = "transactions")]
    pub replay_feed: FeedKind,

    /// Interval of the periodic feed report; 0 disables it
    #[clap(long, default_value_t = 10_000)]
    pub report_every_ms: u64,

    /// Emit logs as JSON lines (implied by APP_ENV=production)
    #[clap(long)]
    pub json_logs: bool,
}
