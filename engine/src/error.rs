use thiserror::Error;

/// Invalid feed configuration. Raised at construction, never at call time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("feed buffer capacity must be at least 1")]
    ZeroCapacity,

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("at least one qualifying event kind is required")]
    EmptyQualifyingKinds,

    #[error("unknown aggregation mode: {0}")]
    UnknownAggregationMode(String),
}
