use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EventKind;

/// The three independent event streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Whale wallet buys and sells.
    Transactions,
    /// Influencer posts.
    Posts,
    /// Group calls.
    Signals,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [FeedKind::Transactions, FeedKind::Posts, FeedKind::Signals];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Transactions => "transactions",
            FeedKind::Posts => "posts",
            FeedKind::Signals => "signals",
        }
    }

    /// Event kinds a source for this feed may emit.
    pub fn accepts(&self, kind: EventKind) -> bool {
        matches!(
            (self, kind),
            (FeedKind::Transactions, EventKind::Buy | EventKind::Sell)
                | (FeedKind::Posts, EventKind::Post)
                | (FeedKind::Signals, EventKind::Signal)
        )
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactions" | "tx" => Ok(FeedKind::Transactions),
            "posts" => Ok(FeedKind::Posts),
            "signals" | "calls" => Ok(FeedKind::Signals),
            other => Err(format!("unknown feed: {other}")),
        }
    }
}
