use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use adapters::ScriptedSource;
use corelib::models::{Event, EventKind, FeedKind, Payload};
use engine::FeedConfig;
use feeds::{FeedRegistry, FeedUpdate, RegistryError};
use parking_lot::Mutex;
use tokio::time::sleep;

const TICK: Duration = Duration::from_millis(500);

fn post(id: u64, handle: &str, coin: &str) -> Event {
    Event::new(
        id,
        coin,
        handle,
        EventKind::Post,
        Payload::Post {
            handle: handle.into(),
            content: format!("${coin} to the moon"),
            likes: 1_000,
            reposts: 200,
            replies: 60,
        },
        id,
    )
}

fn posts_cfg() -> FeedConfig {
    FeedConfig::for_feed(FeedKind::Posts)
        .tick_interval(TICK)
        .build()
        .unwrap()
}

fn posts_source(n: u64) -> ScriptedSource {
    let events = (1..=n).map(|id| post(id, &format!("@kol{id}"), "BONK")).collect();
    ScriptedSource::from_events(FeedKind::Posts, events)
}

#[tokio::test(start_paused = true)]
async fn one_controller_per_feed() {
    let mut registry = FeedRegistry::new();

    registry.start(posts_source(3), &posts_cfg()).unwrap();
    let err = registry.start(posts_source(3), &posts_cfg()).unwrap_err();

    assert!(matches!(err, RegistryError::AlreadyRegistered(FeedKind::Posts)));
    assert_eq!(registry.feeds(), vec![FeedKind::Posts]);

    registry.teardown().await;
}

#[tokio::test(start_paused = true)]
async fn stopping_an_unknown_feed_fails() {
    let mut registry = FeedRegistry::new();

    let err = registry.stop(FeedKind::Signals).await.unwrap_err();
    assert!(matches!(err, RegistryError::UnknownFeed(FeedKind::Signals)));
}

#[tokio::test(start_paused = true)]
async fn invalid_config_is_reported_and_nothing_registered() {
    let mut registry = FeedRegistry::new();
    let bad = FeedConfig {
        tick_interval: Duration::ZERO,
        ..posts_cfg()
    };

    let err = registry.start(posts_source(1), &bad).unwrap_err();
    assert!(matches!(err, RegistryError::Config(_)), "{err}");
    assert!(registry.feeds().is_empty());
}

#[tokio::test(start_paused = true)]
async fn handlers_see_every_update() {
    let mut registry = FeedRegistry::new();
    let seen: Arc<Mutex<Vec<FeedUpdate>>> = Arc::default();

    let sink = Arc::clone(&seen);
    registry.register_handler(
        FeedKind::Posts,
        Arc::new(move |update: &FeedUpdate| sink.lock().push(update.clone())),
    );

    let view = registry.start(posts_source(3), &posts_cfg()).unwrap();
    sleep(TICK * 3 + Duration::from_millis(50)).await;

    let seen = seen.lock().clone();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|u| u.feed == FeedKind::Posts && u.events.len() == 1));

    // Two distinct accounts is enough to trend.
    assert!(seen[0].trending.is_empty());
    assert_eq!(seen[1].trending[0].subject, "BONK");
    assert_eq!(seen[2].trending[0].count, 3);

    assert_eq!(view.trending(), seen[2].trending);

    registry.teardown().await;
}

fn explode(_: &FeedUpdate) {
    panic!("handler bug");
}

#[tokio::test(start_paused = true)]
async fn panicking_handler_is_isolated() {
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let hook_counter = Arc::clone(&hook_calls);

    let mut registry = FeedRegistry::new().with_panic_hook(move |feed, _update| {
        assert_eq!(feed, FeedKind::Posts);
        hook_counter.fetch_add(1, Ordering::SeqCst);
    });

    let healthy_calls = Arc::new(AtomicUsize::new(0));
    let healthy = Arc::clone(&healthy_calls);

    registry.register_handler(FeedKind::Posts, Arc::new(explode));
    registry.register_handler(
        FeedKind::Posts,
        Arc::new(move |_: &FeedUpdate| {
            healthy.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let view = registry.start(posts_source(2), &posts_cfg()).unwrap();
    sleep(TICK * 2 + Duration::from_millis(50)).await;

    assert_eq!(healthy_calls.load(Ordering::SeqCst), 2);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 2);
    assert_eq!(view.counters().handler_panics, 2);

    // The feed keeps going.
    assert_eq!(view.len(), 2);
    assert!(registry.is_running(FeedKind::Posts));

    registry.teardown().await;
}

#[tokio::test(start_paused = true)]
async fn stop_returns_final_view_and_frees_the_slot() {
    let mut registry = FeedRegistry::new();

    registry.start(posts_source(10), &posts_cfg()).unwrap();
    sleep(TICK * 2 + Duration::from_millis(50)).await;

    let last = registry.stop(FeedKind::Posts).await.unwrap();
    assert_eq!(last.len(), 2);
    assert!(registry.view(FeedKind::Posts).is_none());

    sleep(TICK * 5).await;
    assert_eq!(last.len(), 2);

    // Same feed can be started again.
    let fresh = registry.start(posts_source(1), &posts_cfg()).unwrap();
    assert!(fresh.is_empty());

    registry.teardown().await;
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_every_feed() {
    let mut registry = FeedRegistry::new();

    let tx_events = (1..=10)
        .map(|id| {
            Event::new(
                id,
                "WIF",
                format!("whale{id}"),
                EventKind::Buy,
                Payload::Transaction {
                    wallet_address: format!("addr{id}"),
                    emoji: "🐳".into(),
                    amount: 10,
                    value_usd: 12.5,
                },
                id,
            )
        })
        .collect();
    let tx_cfg = FeedConfig::for_feed(FeedKind::Transactions)
        .tick_interval(TICK)
        .build()
        .unwrap();

    let posts = registry.start(posts_source(10), &posts_cfg()).unwrap();
    let txs = registry
        .start(ScriptedSource::from_events(FeedKind::Transactions, tx_events), &tx_cfg)
        .unwrap();

    sleep(TICK + Duration::from_millis(50)).await;
    registry.teardown().await;

    assert!(registry.feeds().is_empty());
    assert!(!registry.is_running(FeedKind::Posts));

    let (p, t) = (posts.len(), txs.len());
    sleep(TICK * 5).await;
    assert_eq!((posts.len(), txs.len()), (p, t));
    assert_eq!((p, t), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn panicking_panic_hook_does_not_stop_the_feed() {
    let mut registry = FeedRegistry::new().with_panic_hook(|_, _| panic!("hook bug"));
    registry.register_handler(FeedKind::Posts, Arc::new(explode));

    let view = registry.start(posts_source(3), &posts_cfg()).unwrap();
    sleep(TICK * 3 + Duration::from_millis(50)).await;

    assert_eq!(view.len(), 3);
    assert_eq!(view.counters().handler_panics, 3);
    assert!(registry.is_running(FeedKind::Posts));

    registry.teardown().await;
}
