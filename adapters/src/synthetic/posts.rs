use async_trait::async_trait;
use common::time::now_ms;
use corelib::models::{Event, EventKind, FeedKind, Payload};
use rand::Rng;
use rand::rngs::StdRng;

use super::{Catalog, make_rng};
use crate::source::{FeedSource, IdSequence, SourceError};

const TEMPLATES: [&str; 5] = [
    "Just loaded up on ${coin} - this meme coin has serious potential! #Solana",
    "The AI coins on Solana are heating up. ${coin} is my top pick right now.",
    "${coin} showing strong momentum. Targets: 2x from here.",
    "Why I'm bullish on ${coin}: Strong community + low MC = potential moonshot.",
    "${coin} breakout incoming. Accumulating at these levels.",
];

/// One random influencer post per tick.
pub struct SyntheticPosts {
    catalog: Catalog,
    rng: StdRng,
    ids: IdSequence,
}

impl SyntheticPosts {
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
        let influencers = self.catalog.influencers();
        let author = &influencers[self.rng.gen_range(0..influencers.len())];

        let coins = self.catalog.coins();
        let coin = &coins[self.rng.gen_range(0..coins.len())];

        let template = TEMPLATES[self.rng.gen_range(0..TEMPLATES.len())];

        Event::new(
            self.ids.next_id(),
            coin.clone(),
            author.name.clone(),
            EventKind::Post,
            Payload::Post {
                handle: format!("@{}", author.handle),
                content: template.replace("{coin}", coin),
                likes: self.rng.gen_range(500..5_500),
                reposts: self.rng.gen_range(100..1_100),
                replies: self.rng.gen_range(50..350),
            },
            now_ms(),
        )
    }
}

#[async_trait]
impl FeedSource for SyntheticPosts {
    fn feed(&self) -> FeedKind {
        FeedKind::Posts
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Event>>, SourceError> {
        Ok(Some(vec![self.generate()]))
    }
}
