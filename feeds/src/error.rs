use corelib::models::FeedKind;
use engine::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("feed {0} is already running")]
    AlreadyRegistered(FeedKind),

    #[error("feed {0} is not registered")]
    UnknownFeed(FeedKind),

    #[error("invalid feed configuration: {0}")]
    Config(#[from] ConfigError),
}
