//! # Counters
//!
//! Three independent counters and their running total, built on the Tally
//! store architecture.
//!
//! - [`CounterCollection`] is the immutable, structurally shared collection.
//!   [`CounterCollection::update`] replaces a single entry by id.
//! - [`compute_total`] is the pure derived total. [`TotalMemo`] caches it
//!   per collection value.
//! - [`CounterReducer`] applies [`CounterAction`]s to [`CounterState`].
//! - [`CounterStore`] is the single authoritative owner. Views talk to it
//!   through [`CounterHandle`]s and re-render on [`CounterStore::subscribe`].
//!
//! Updating an unknown id is a recoverable error
//! ([`CounterError::IdNotFound`]). The collection is left unchanged and the
//! store keeps accepting actions.
//!
//! Counter actions are pure state transitions: [`CounterReducer`] returns no
//! effects, so the runtime's effect execution, `settle` and the
//! `ShutdownTimeout` path stay idle here. Shutdown only stops new actions.
//!
//! ## Example
//!
//! ```no_run
//! use counters::{CounterEnvironment, CounterId, CounterStore};
//! use tally_core::environment::SystemClock;
//!
//! # async fn example() -> Result<(), counters::Error> {
//! let store = CounterStore::new(CounterEnvironment::new(SystemClock));
//!
//! store.increment(CounterId::new(1)).await?;
//! store.update_counter(CounterId::new(2), 5).await?;
//! assert_eq!(store.total().await, 6);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub mod store;
pub mod total;
pub mod types;
pub mod view;

pub use config::{CountersConfig, MAX_COUNTERS};
pub use error::{CounterError, Error};
pub use reducer::{CounterAction, CounterEnvironment, CounterReducer, CounterState};
pub use store::{CounterHandle, CounterRuntime, CounterStore};
pub use total::{TotalMemo, compute_total};
pub use types::{CollectionKey, Counter, CounterCollection, CounterId, SEED_SIZE};
pub use view::{CounterView, Frame, Row};

/// The seed collection `[{1,0},{2,0},{3,0}]`
#[must_use]
pub fn initial_state() -> CounterCollection {
    CounterCollection::initial()
}

/// Returns `collection` with counter `id` set to `value`
///
/// # Errors
///
/// Returns [`CounterError::IdNotFound`] if no counter has this id.
pub fn update_counter(
    collection: &CounterCollection,
    id: CounterId,
    value: i64,
) -> Result<CounterCollection, CounterError> {
    collection.update(id, value)
}
