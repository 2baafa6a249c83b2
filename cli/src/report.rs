use std::time::Duration;

use common::logger::child_span;
use corelib::models::FeedKind;
use engine::TrendEntry;
use feeds::FeedView;
use tracing::info;

/// What the actors of a feed are called in banners.
pub fn actor_noun(feed: FeedKind) -> &'static str {
    match feed {
        FeedKind::Transactions => "whales",
        FeedKind::Posts => "accounts",
        FeedKind::Signals => "groups",
    }
}

/// One-line trending banner, `None` when nothing trends.
pub fn banner(feed: FeedKind, trending: &[TrendEntry]) -> Option<String> {
    if trending.is_empty() {
        return None;
    }

    let noun = actor_noun(feed);
    let coins: Vec<String> = trending
        .iter()
        .map(|t| format!("{} ({} {noun})", t.subject, t.count))
        .collect();

    Some(format!("🔥 Hot Coins: {}", coins.join(", ")))
}

/// Logs a status line per feed every `every` until aborted.
pub async fn report_loop(views: Vec<FeedView>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // First tick is immediate.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        for view in &views {
            let span = child_span("report");
            span.record("feed", view.feed().as_str());
            let _g = span.enter();

            let counters = view.counters();
            let trending = banner(view.feed(), &view.trending());

            info!(
                buffered = view.len(),
                accepted = counters.accepted,
                rejected = counters.rejected,
                evicted = counters.evicted,
                source_errors = counters.source_errors,
                handler_panics = counters.handler_panics,
                trending = trending.as_deref().unwrap_or("-"),
                "feed report"
            );
        }
    }
}
