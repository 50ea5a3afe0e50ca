//! Counters binary
//!
//! Replays the click script of the counters page against a store and prints
//! every rendered frame.

use anyhow::Context;
use counters::{CounterEnvironment, CounterId, CounterStore, CounterView, CountersConfig};
use tally_core::environment::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counters=debug,tally_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CountersConfig::from_env();
    tracing::info!(?config, "Starting counters");

    let store = CounterStore::with_state(
        config.initial_state(),
        CounterEnvironment::new(SystemClock),
    );
    let mut view = CounterView::new();
    let mut revisions = store.subscribe();

    // Handles are created once, before any click, like mounted components.
    let handles = store.handles().await;
    println!("{}\n", view.render(&store.counters().await));

    for handle in &handles {
        println!(">>> + on counter {}", handle.id());
        handle.increment().await?;
        render_if_changed(&store, &mut view, &mut revisions).await;
    }

    for handle in &handles {
        println!(">>> - on counter {}", handle.id());
        handle.decrement().await?;
        render_if_changed(&store, &mut view, &mut revisions).await;
    }

    let missing = CounterId::new(99);
    println!(">>> update counter {missing}");
    if let Err(error) = store.update_counter(missing, 1).await {
        println!("rejected: {error}");
    }
    render_if_changed(&store, &mut view, &mut revisions).await;

    store
        .shutdown(config.shutdown_timeout())
        .await
        .context("store did not shut down cleanly")?;

    println!(
        "Total recomputed {} times over the session",
        view.total_recomputations()
    );
    Ok(())
}

async fn render_if_changed(
    store: &CounterStore<SystemClock>,
    view: &mut CounterView,
    revisions: &mut tokio::sync::watch::Receiver<u64>,
) {
    if revisions.has_changed().unwrap_or(false) {
        revisions.borrow_and_update();
        let frame = view.render(&store.counters().await);
        let changed: Vec<String> = frame.changed_ids().map(|id| id.to_string()).collect();
        tracing::debug!(changed = ?changed, "Rendered frame");
        println!("{frame}\n");
    }
}
