use std::collections::BTreeMap;
use std::sync::Arc;

use adapters::FeedSource;
use corelib::models::FeedKind;
use engine::FeedConfig;
use tracing::info;

use crate::controller::FeedController;
use crate::error::RegistryError;
use crate::handlers::{FeedUpdate, HandlerSet, PanicHook, UpdateHandler};
use crate::view::FeedView;

/// Process-wide owner of the feed controllers.
///
/// Feeds are started and torn down explicitly; there is no hidden global
/// state. Handlers may be registered before or after a feed starts.
#[derive(Default)]
pub struct FeedRegistry {
    controllers: BTreeMap<FeedKind, FeedController>,
    /// One handler set per feed, kept across restarts of that feed.
    handlers: BTreeMap<FeedKind, Arc<HandlerSet>>,
    /// Optional callback invoked when a handler panics.
    on_handler_panic: Option<PanicHook>,
}

impl FeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a callback to be invoked whenever a handler panics.
    pub fn with_panic_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(FeedKind, &FeedUpdate) + Send + Sync + 'static,
    {
        let hook: PanicHook = Arc::new(f);
        for set in self.handlers.values() {
            set.set_panic_hook(Some(Arc::clone(&hook)));
        }
        self.on_handler_panic = Some(hook);
        self
    }

    fn handler_set(&mut self, feed: FeedKind) -> Arc<HandlerSet> {
        let hook = self.on_handler_panic.clone();
        let set = self.handlers.entry(feed).or_insert_with(|| {
            let set = HandlerSet::default();
            set.set_panic_hook(hook);
            Arc::new(set)
        });
        Arc::clone(set)
    }

    /// Register a handler for every update of `feed`.
    pub fn register_handler(&mut self, feed: FeedKind, handler: UpdateHandler) {
        self.handler_set(feed).push(handler);
    }

    /// Starts a controller for the source's feed. One controller per feed.
    pub fn start<S>(&mut self, source: S, cfg: &FeedConfig) -> Result<FeedView, RegistryError>
    where
        S: FeedSource + 'static,
    {
        let feed = source.feed();
        if self.controllers.contains_key(&feed) {
            return Err(RegistryError::AlreadyRegistered(feed));
        }

        let handlers = self.handler_set(feed);
        let controller = FeedController::start_with_handlers(source, cfg, handlers)?;
        let view = controller.view();

        self.controllers.insert(feed, controller);
        info!(feed = %feed, running = self.controllers.len(), "feed registered");

        Ok(view)
    }

    pub fn view(&self, feed: FeedKind) -> Option<FeedView> {
        self.controllers.get(&feed).map(FeedController::view)
    }

    pub fn feeds(&self) -> Vec<FeedKind> {
        self.controllers.keys().copied().collect()
    }

    pub fn is_running(&self, feed: FeedKind) -> bool {
        self.controllers
            .get(&feed)
            .is_some_and(FeedController::is_running)
    }

    /// Stops one feed and unregisters it. The returned view shows its final
    /// state.
    pub async fn stop(&mut self, feed: FeedKind) -> Result<FeedView, RegistryError> {
        let mut controller = self
            .controllers
            .remove(&feed)
            .ok_or(RegistryError::UnknownFeed(feed))?;

        controller.stop().await;
        Ok(controller.view())
    }

    /// Stops every feed.
    pub async fn teardown(&mut self) {
        let feeds = self.feeds();
        for (_, mut controller) in std::mem::take(&mut self.controllers) {
            controller.stop().await;
        }
        info!(?feeds, "feed registry torn down");
    }
}
