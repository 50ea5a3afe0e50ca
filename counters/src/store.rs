//! The counter store: the single owner of counter state.
//!
//! [`CounterStore`] wraps the generic runtime [`Store`] with the counter
//! reducer and exposes the counter operations as typed async methods.
//! [`CounterHandle`] is what a view keeps per rendered counter. It holds only
//! the id, so a handle created before any update still acts on current state.

use crate::error::Error;
use crate::reducer::{CounterAction, CounterEnvironment, CounterReducer, CounterState};
use crate::types::{CounterCollection, CounterId};
use std::time::Duration;
use tally_core::environment::Clock;
use tally_runtime::{Store, StoreError};
use tokio::sync::watch;

/// The runtime store specialised for counters
pub type CounterRuntime<C> =
    Store<CounterState, CounterAction, CounterEnvironment<C>, CounterReducer<C>>;

/// Authoritative counter state with controlled update entry points
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct CounterStore<C: Clock> {
    runtime: CounterRuntime<C>,
}

impl<C> CounterStore<C>
where
    C: Clock + Clone + 'static,
{
    /// Creates a store seeded with [`CounterState::initial`]
    #[must_use]
    pub fn new(environment: CounterEnvironment<C>) -> Self {
        Self::with_state(CounterState::initial(), environment)
    }

    /// Creates a store with the given initial state
    #[must_use]
    pub fn with_state(state: CounterState, environment: CounterEnvironment<C>) -> Self {
        Self {
            runtime: Store::new(state, CounterReducer::new(), environment),
        }
    }

    /// Sets counter `id` to `value` and returns the new collection
    ///
    /// # Errors
    ///
    /// - [`Error::Counter`] if `id` is unknown; the collection is unchanged
    /// - [`Error::Store`] if the store is shutting down
    pub async fn update_counter(&self, id: CounterId, value: i64) -> Result<CounterCollection, Error> {
        self.dispatch(CounterAction::UpdateCounter { id, value }).await
    }

    /// Increments counter `id` from its current value
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::update_counter`].
    pub async fn increment(&self, id: CounterId) -> Result<CounterCollection, Error> {
        self.dispatch(CounterAction::Increment { id }).await
    }

    /// Decrements counter `id` from its current value
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::update_counter`].
    pub async fn decrement(&self, id: CounterId) -> Result<CounterCollection, Error> {
        self.dispatch(CounterAction::Decrement { id }).await
    }

    /// Sets every counter to 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store is shutting down.
    pub async fn reset(&self) -> Result<CounterCollection, Error> {
        self.dispatch(CounterAction::Reset).await
    }

    /// Sends `action` and returns the collection it produced
    ///
    /// The outcome is read in the same critical section as the update, so it
    /// always belongs to this action.
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::update_counter`].
    pub async fn dispatch(&self, action: CounterAction) -> Result<CounterCollection, Error> {
        Ok(self.runtime.send_and_read(action, CounterState::outcome).await??)
    }

    /// The current collection
    pub async fn counters(&self) -> CounterCollection {
        self.runtime.state(|state| state.counters().clone()).await
    }

    /// The current total
    pub async fn total(&self) -> i64 {
        self.runtime.state(CounterState::total).await
    }

    /// A copy of the whole state
    pub async fn snapshot(&self) -> CounterState {
        self.runtime.state(Clone::clone).await
    }

    /// A handle bound to counter `id`
    ///
    /// The id is not checked here. Operations through a handle for an unknown
    /// id fail with [`CounterError::IdNotFound`](crate::CounterError::IdNotFound).
    #[must_use]
    pub fn handle(&self, id: CounterId) -> CounterHandle<C> {
        CounterHandle {
            id,
            store: self.clone(),
        }
    }

    /// One handle per counter, in display order
    pub async fn handles(&self) -> Vec<CounterHandle<C>> {
        let ids: Vec<CounterId> = self.runtime.state(|state| state.counters().ids().collect()).await;
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    /// Change notification: bumped after every processed action
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.runtime.subscribe()
    }

    /// Stops accepting actions
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when `timeout` elapses.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.runtime.shutdown(timeout).await
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn runtime(&self) -> &CounterRuntime<C> {
        &self.runtime
    }
}

/// Per-counter handle held by a view
///
/// Carries no value snapshot: every operation is resolved by the store
/// against current state.
#[derive(Debug, Clone)]
pub struct CounterHandle<C: Clock> {
    id: CounterId,
    store: CounterStore<C>,
}

impl<C> CounterHandle<C>
where
    C: Clock + Clone + 'static,
{
    /// The counter this handle controls
    #[must_use]
    pub const fn id(&self) -> CounterId {
        self.id
    }

    /// Current value, or `None` if the id is unknown
    pub async fn value(&self) -> Option<i64> {
        let id = self.id;
        self.store
            .runtime
            .state(|state| state.counters().value_of(id))
            .await
    }

    /// The "+" control
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::update_counter`].
    pub async fn increment(&self) -> Result<CounterCollection, Error> {
        self.store.increment(self.id).await
    }

    /// The "−" control
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::update_counter`].
    pub async fn decrement(&self) -> Result<CounterCollection, Error> {
        self.store.decrement(self.id).await
    }

    /// Sets this counter to `value`
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::update_counter`].
    pub async fn set(&self, value: i64) -> Result<CounterCollection, Error> {
        self.store.update_counter(self.id, value).await
    }
}
