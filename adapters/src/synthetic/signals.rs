use async_trait::async_trait;
use common::time::now_ms;
use corelib::models::{Event, EventKind, FeedKind, Payload, SignalDirection};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Catalog, make_rng};
use crate::source::{FeedSource, IdSequence, SourceError};

/// Calls published per tick.
pub const CALLS_PER_TICK: usize = 3;
const MAX_GROUPS_PER_CALL: usize = 2;

/// A ranked batch of group calls per tick, each for a different coin.
pub struct SyntheticSignals {
    catalog: Catalog,
    rng: StdRng,
    ids: IdSequence,
}

impl SyntheticSignals {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_catalog(Catalog::default(), seed)
    }

    pub fn with_catalog(catalog: Catalog, seed: Option<u64>) -> Self {
        Self {
            catalog,
            rng: make_rng(seed),
            ids: IdSequence::new(),
        }
    }

    /// Up to `CALLS_PER_TICK` calls for distinct coins, ranked 1.. in order.
    pub fn generate(&mut self) -> Vec<Event> {
        let coins: Vec<String> = self
            .catalog
            .coins()
            .choose_multiple(&mut self.rng, CALLS_PER_TICK)
            .cloned()
            .collect();

        let now = now_ms();

        coins
            .into_iter()
            .enumerate()
            .map(|(idx, coin)| {
                let n_groups = self.rng.gen_range(1..=MAX_GROUPS_PER_CALL);
                let groups: Vec<String> = self
                    .catalog
                    .groups()
                    .choose_multiple(&mut self.rng, n_groups)
                    .cloned()
                    .collect();

                let direction = if self.rng.gen_bool(0.5) {
                    SignalDirection::Up
                } else {
                    SignalDirection::Down
                };

                Event::new(
                    self.ids.next_id(),
                    coin,
                    // The catalog guarantees at least one group.
                    groups.first().cloned().unwrap_or_default(),
                    EventKind::Signal,
                    Payload::Signal {
                        rank: (idx + 1) as u8,
                        groups,
                        call_count: self.rng.gen_range(20..120),
                        direction,
                        change_pct: self.rng.gen_range(5..55),
                    },
                    now,
                )
            })
            .collect()
    }
}

#[async_trait]
impl FeedSource for SyntheticSignals {
    fn feed(&self) -> FeedKind {
        FeedKind::Signals
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        Ok(Some(self.generate()))
    }
}
