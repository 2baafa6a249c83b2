//! Randomized sources standing in for real whale, influencer and group feeds.

mod catalog;
mod posts;
mod signals;
mod transactions;

pub use catalog::{Catalog, Influencer, Whale};
pub use posts::SyntheticPosts;
pub use signals::SyntheticSignals;
pub use transactions::SyntheticTransactions;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seeded runs are reproducible; unseeded runs draw from OS entropy.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
