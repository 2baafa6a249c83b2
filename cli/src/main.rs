mod cli;
mod config;
mod report;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use adapters::{ReplaySource, SyntheticPosts, SyntheticSignals, SyntheticTransactions};
use anyhow::Context;
use clap::Parser;
use common::logger::{TraceId, child_span, init_logger, root_span};
use corelib::models::FeedKind;
use feeds::{FeedRegistry, FeedUpdate, FeedView};
use parking_lot::Mutex;
use tracing::{Instrument, debug, error, info};

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_logger("hotfeed", is_production || cli.json_logs);

    let cfg = AppConfig::from_env()?.with_overrides(&cli);
    let trace_id = TraceId::default();

    run(cli, cfg).instrument(root_span("hotfeed", &trace_id)).await
}

async fn run(cli: Cli, cfg: AppConfig) -> anyhow::Result<()> {
    info!(?cfg, "Starting hotfeed...");

    let mut registry = FeedRegistry::new().with_panic_hook(|feed, update| {
        error!(feed = %feed, events = update.events.len(), "trending handler panicked");
    });

    let views = start_feeds(&mut registry, &cli, &cfg)?;

    let reporter = (cli.report_every_ms > 0).then(|| {
        let every = Duration::from_millis(cli.report_every_ms);
        tokio::spawn(report::report_loop(views.clone(), every).instrument(child_span("reporter")))
    });

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("Shutdown signal received");
        }
        _ = wait_until_idle(&registry) => {
            info!("all feeds exhausted");
        }
    }

    if let Some(reporter) = reporter {
        reporter.abort();
    }
    registry.teardown().await;

    for view in &views {
        info!(
            feed = %view.feed(),
            buffered = view.len(),
            counters = ?view.counters(),
            "final feed state"
        );
    }

    Ok(())
}

/// Starts either one replay feed or the selected synthetic feeds.
fn start_feeds(registry: &mut FeedRegistry, cli: &Cli, cfg: &AppConfig) -> anyhow::Result<Vec<FeedView>> {
    if let Some(path) = &cli.replay {
        let feed = cli.replay_feed;
        register_banner(registry, feed);

        let source = ReplaySource::open(feed, path)
            .with_context(|| format!("failed to open replay log {}", path.display()))?;
        let view = registry.start(source, &cfg.feed_config(feed)?)?;

        info!(feed = %feed, path = %path.display(), "replaying event log");
        return Ok(vec![view]);
    }

    // Duplicates on the command line collapse to one controller.
    let selected: BTreeSet<FeedKind> = cli.feeds.iter().copied().collect();
    let mut views = Vec::with_capacity(selected.len());

    for feed in selected {
        register_banner(registry, feed);

        let feed_cfg = cfg.feed_config(feed)?;
        let seed = cfg.feed_seed(feed);

        let view = match feed {
            FeedKind::Transactions => registry.start(SyntheticTransactions::new(seed), &feed_cfg)?,
            FeedKind::Posts => registry.start(SyntheticPosts::new(seed), &feed_cfg)?,
            FeedKind::Signals => registry.start(SyntheticSignals::new(seed), &feed_cfg)?,
        };
        views.push(view);
    }

    Ok(views)
}

/// Logs accepted events, and the trending banner whenever it changes.
fn register_banner(registry: &mut FeedRegistry, feed: FeedKind) {
    let last: Arc<Mutex<Option<String>>> = Arc::default();

    registry.register_handler(
        feed,
        Arc::new(move |update: &FeedUpdate| {
            for event in &update.events {
                debug!(
                    feed = %update.feed,
                    id = %event.id,
                    kind = %event.kind,
                    subject = %event.subject,
                    actor = %event.actor,
                    "event"
                );
            }

            let banner = report::banner(update.feed, &update.trending);
            let mut last = last.lock();
            if *last == banner {
                return;
            }

            match &banner {
                Some(text) => info!(feed = %update.feed, "{text}"),
                None => info!(feed = %update.feed, "nothing trending"),
            }
            *last = banner;
        }),
    );
}

/// Resolves once no controller is running (every source exhausted).
async fn wait_until_idle(registry: &FeedRegistry) {
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    loop {
        ticker.tick().await;
        if registry.feeds().iter().all(|f| !registry.is_running(*f)) {
            return;
        }
    }
}
