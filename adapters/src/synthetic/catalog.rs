use crate::source::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whale {
    pub name: String,
    pub address: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Influencer {
    pub name: String,
    pub handle: String,
}

/// Pools the synthetic sources pick actors and subjects from.
///
/// Every pool is non-empty; `Catalog::new` enforces it.
#[derive(Debug, Clone)]
pub struct Catalog {
    whales: Vec<Whale>,
    influencers: Vec<Influencer>,
    coins: Vec<String>,
    groups: Vec<String>,
}

impl Catalog {
    pub fn new(
        whales: Vec<Whale>,
        influencers: Vec<Influencer>,
        coins: Vec<String>,
        groups: Vec<String>,
    ) -> Result<Self, SourceError> {
        if whales.is_empty() {
            return Err(SourceError::EmptyCatalog("whales"));
        }
        if influencers.is_empty() {
            return Err(SourceError::EmptyCatalog("influencers"));
        }
        if coins.is_empty() {
            return Err(SourceError::EmptyCatalog("coins"));
        }
        if groups.is_empty() {
            return Err(SourceError::EmptyCatalog("groups"));
        }

        Ok(Self {
            whales,
            influencers,
            coins,
            groups,
        })
    }

    pub fn whales(&self) -> &[Whale] {
        &self.whales
    }

    pub fn influencers(&self) -> &[Influencer] {
        &self.influencers
    }

    pub fn coins(&self) -> &[String] {
        &self.coins
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

fn whale(name: &str, address: &str, emoji: &str) -> Whale {
    Whale {
        name: name.into(),
        address: address.into(),
        emoji: emoji.into(),
    }
}

fn influencer(name: &str, handle: &str) -> Influencer {
    Influencer {
        name: name.into(),
        handle: handle.into(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            whales: vec![
                whale("Ansem", "AVAZvHLR2PcWpDf8BXY4rVxNHYRBytycHkcB5z5QNXYm", "🚀"),
                whale("Murad", "5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1", "🐋"),
                whale("Frank", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", "🦈"),
                whale("Cupsey", "DfMxre4cKmvogbLrPigxmibVTTQDuzjdXojWzjCXXhzj", "🐳"),
                whale("Orangie", "2ojv9BAiHUrvsm9gxDe7fJSzbNZSJcxZvf8dqmWGHG8S", "🍊"),
            ],
            influencers: vec![
                influencer("Ansem", "blknoiz06"),
                influencer("Murad", "MustStopMurad"),
                influencer("Cobie", "cobie"),
                influencer("Hsaka", "HsakaTrades"),
                influencer("Mert", "0xMert_"),
            ],
            coins: ["BONK", "MYRO", "WIF", "POPCAT", "SILLY", "NOS", "BORK"]
                .into_iter()
                .map(String::from)
                .collect(),
            groups: [
                "Alpha Sharks",
                "Solana Calls",
                "Whale Watch",
                "Moon Group",
                "Crypto Signals",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}
