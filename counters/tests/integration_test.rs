//! Integration tests for the counter store
//!
//! These follow the counters page end to end: handles stand in for the
//! rendered counter components and the view renders the total.

use counters::{
    CounterCollection, CounterEnvironment, CounterError, CounterId, CounterStore, CounterView,
    Error,
};
use tally_testing::{FixedClock, test_clock};

fn store() -> CounterStore<FixedClock> {
    CounterStore::new(CounterEnvironment::new(test_clock()))
}

fn id(n: u32) -> CounterId {
    CounterId::new(n)
}

#[tokio::test]
async fn test_initial_state_totals_zero() {
    let store = store();

    assert_eq!(store.counters().await, CounterCollection::from_values([0, 0, 0]));
    assert_eq!(store.total().await, 0);
}

#[tokio::test]
async fn test_increment_first_counter() -> Result<(), Error> {
    let store = store();

    store.increment(id(1)).await?;

    assert_eq!(store.counters().await, CounterCollection::from_values([1, 0, 0]));
    assert_eq!(store.total().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_increment_every_counter_then_decrement_every_counter() -> Result<(), Error> {
    let store = store();

    for n in 1..=3 {
        store.increment(id(n)).await?;
    }
    assert_eq!(store.counters().await, CounterCollection::from_values([1, 1, 1]));
    assert_eq!(store.total().await, 3);

    for n in 1..=3 {
        store.decrement(id(n)).await?;
    }
    assert_eq!(store.counters().await, CounterCollection::from_values([0, 0, 0]));
    assert_eq!(store.total().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_unknown_id_leaves_state_untouched() -> Result<(), Error> {
    let store = store();
    store.increment(id(2)).await?;
    let before = store.counters().await;

    let result = store.update_counter(id(99), 1).await;

    assert_eq!(result, Err(Error::Counter(CounterError::IdNotFound(id(99)))));
    assert_eq!(store.counters().await, before);
    assert_eq!(store.total().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_page_click_script() -> Result<(), Error> {
    let store = store();
    let mut view = CounterView::new();
    let handles = store.handles().await;

    let frame = view.render(&store.counters().await);
    assert_eq!(frame.rows.len(), 3);
    assert_eq!(frame.to_string().lines().last(), Some("Total count: 0"));

    let mut totals = Vec::new();
    for handle in &handles {
        handle.increment().await?;
        totals.push(view.render(&store.counters().await).total);
    }
    for handle in &handles {
        handle.decrement().await?;
        totals.push(view.render(&store.counters().await).total);
    }

    assert_eq!(totals, vec![1, 2, 3, 2, 1, 0]);
    Ok(())
}

#[tokio::test]
async fn test_handles_created_before_updates_do_not_lose_updates() -> Result<(), Error> {
    let store = store();
    let first = store.handle(id(1));
    let second = store.handle(id(2));

    first.increment().await?;
    first.increment().await?;
    second.decrement().await?;
    first.decrement().await?;

    assert_eq!(store.counters().await, CounterCollection::from_values([1, -1, 0]));
    assert_eq!(first.value().await, Some(1));
    assert_eq!(second.value().await, Some(-1));
    Ok(())
}

#[tokio::test]
async fn test_explicit_values_from_current_display() -> Result<(), Error> {
    let store = store();
    let third = store.handle(id(3));

    let shown = third.value().await.unwrap_or_default();
    third.set(shown + 1).await?;
    store.increment(id(1)).await?;
    let shown = third.value().await.unwrap_or_default();
    third.set(shown + 1).await?;

    assert_eq!(store.counters().await, CounterCollection::from_values([1, 0, 2]));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_clicks_on_different_counters() {
    let store = store();

    let clicks: Vec<_> = (0..30)
        .map(|i| {
            let handle = store.handle(id(i % 3 + 1));
            tokio::spawn(async move { handle.increment().await })
        })
        .collect();

    for click in clicks {
        assert!(matches!(click.await, Ok(Ok(_))));
    }

    assert_eq!(store.counters().await, CounterCollection::from_values([10, 10, 10]));
    assert_eq!(store.total().await, 30);
}

#[tokio::test]
async fn test_reset_after_clicks() -> Result<(), Error> {
    let store = store();
    store.update_counter(id(1), 5).await?;
    store.decrement(id(3)).await?;

    let counters = store.reset().await?;

    assert_eq!(counters, CounterCollection::initial());
    assert_eq!(store.snapshot().await.last_error(), None);
    Ok(())
}

#[tokio::test]
async fn test_view_rerenders_only_touched_rows() -> Result<(), Error> {
    let store = store();
    let mut view = CounterView::new();
    view.render(&store.counters().await);

    store.increment(id(2)).await?;
    let frame = view.render(&store.counters().await);

    assert_eq!(frame.changed_ids().collect::<Vec<_>>(), vec![id(2)]);
    Ok(())
}

#[tokio::test]
async fn test_total_survives_large_values_that_cancel() -> Result<(), Error> {
    let store = store();

    store.update_counter(id(1), i64::MAX).await?;
    store.update_counter(id(2), 1).await?;
    store.update_counter(id(3), -1).await?;

    assert_eq!(store.total().await, i64::MAX);
    Ok(())
}
