use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Up,
    Down,
}

/// Feed-specific fields carried next to the common event header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Transaction {
        wallet_address: String,
        emoji: String,
        /// Token units moved.
        amount: u64,
        value_usd: f64,
    },
    Post {
        handle: String,
        content: String,
        likes: u32,
        reposts: u32,
        replies: u32,
    },
    Signal {
        /// Position inside the batch the call was published in (1-based).
        rank: u8,
        /// Every group that made the call; the first one is the event actor.
        groups: Vec<String>,
        call_count: u32,
        direction: SignalDirection,
        change_pct: u32,
    },
}
