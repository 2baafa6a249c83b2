use async_trait::async_trait;
use common::time::now_ms;
use corelib::models::{Event, EventKind, FeedKind, Payload};
use rand::Rng;
use rand::rngs::StdRng;

use super::{Catalog, make_rng};
use crate::source::{FeedSource, IdSequence, SourceError};

/// Probability that a generated whale transaction is a buy.
const BUY_PROBABILITY: f64 = 0.7;
const MAX_AMOUNT: u64 = 10_000_000;
const MAX_VALUE_USD: f64 = 20_000.0;

/// One random whale buy or sell per tick.
pub struct SyntheticTransactions {
    catalog: Catalog,
    rng: StdRng,
    ids: IdSequence,
}

impl SyntheticTransactions {
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

    pub fn generate(&mut self) -> Event {
        let whales = self.catalog.whales();
        let whale = &whales[self.rng.gen_range(0..whales.len())];

        let coins = self.catalog.coins();
        let coin = &coins[self.rng.gen_range(0..coins.len())];

        let kind = if self.rng.gen_bool(BUY_PROBABILITY) {
            EventKind::Buy
        } else {
            EventKind::Sell
        };

        let amount = self.rng.gen_range(0..MAX_AMOUNT);
        // Cents precision, like a rendered dollar value.
        let value_usd = (self.rng.gen_range(0.0..MAX_VALUE_USD) * 100.0).round() / 100.0;

        Event::new(
            self.ids.next_id(),
            coin.clone(),
            whale.name.clone(),
            kind,
            Payload::Transaction {
                wallet_address: whale.address.clone(),
                emoji: whale.emoji.clone(),
                amount,
                value_usd,
            },
            now_ms(),
        )
    }
}

#[async_trait]
impl FeedSource for SyntheticTransactions {
    fn feed(&self) -> FeedKind {
        FeedKind::Transactions
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        Ok(Some(vec![self.generate()]))
    }
}
