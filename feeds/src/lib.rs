//! Per-feed controllers and the registry that owns them.
//!
//! A controller drives one `FeedSource` on its own task, validates every event
//! at the boundary, folds accepted events into the feed's `FeedState` and
//! notifies registered handlers. Consumers only ever see a `FeedView`.

pub mod controller;
pub mod counters;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod view;

pub use controller::FeedController;
pub use counters::{CountersSnapshot, FeedCounters};
pub use error::RegistryError;
pub use handlers::{FeedUpdate, PanicHook, UpdateHandler};
pub use registry::FeedRegistry;
pub use view::FeedView;
