//! Reducer logic for the counter collection.
//!
//! Every action is resolved against the state the store hands in, never
//! against a value the caller captured earlier. `Increment` and `Decrement`
//! read the current value under the store's write lock, so two intents for
//! different counters can never overwrite each other.

use crate::error::CounterError;
use crate::types::{CounterCollection, CounterId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};

/// Counter state
///
/// Fields are read-only from outside the crate. Only [`CounterReducer`]
/// replaces the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterState {
    counters: CounterCollection,
    last_error: Option<CounterError>,
    last_changed_at: Option<DateTime<Utc>>,
}

impl CounterState {
    /// Creates a state holding `counters`
    #[must_use]
    pub const fn new(counters: CounterCollection) -> Self {
        Self {
            counters,
            last_error: None,
            last_changed_at: None,
        }
    }

    /// State seeded with [`CounterCollection::initial`]
    #[must_use]
    pub fn initial() -> Self {
        Self::new(CounterCollection::initial())
    }

    /// The current collection
    #[must_use]
    pub const fn counters(&self) -> &CounterCollection {
        &self.counters
    }

    /// Error recorded by the last action, if it was rejected
    #[must_use]
    pub const fn last_error(&self) -> Option<CounterError> {
        self.last_error
    }

    /// When a value last changed
    #[must_use]
    pub const fn last_changed_at(&self) -> Option<DateTime<Utc>> {
        self.last_changed_at
    }

    /// Sum of all counter values
    #[must_use]
    pub fn total(&self) -> i64 {
        self.counters.total()
    }

    /// Outcome of the last action: the collection, or the error that rejected it
    ///
    /// # Errors
    ///
    /// Returns the recorded [`CounterError`] if the last action was rejected.
    pub fn outcome(&self) -> Result<CounterCollection, CounterError> {
        match self.last_error {
            Some(error) => Err(error),
            None => Ok(self.counters.clone()),
        }
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Counter actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    /// Set counter `id` to `value`
    ///
    /// The caller computes `value` from what it currently displays.
    UpdateCounter {
        /// Counter to update
        id: CounterId,
        /// New value
        value: i64,
    },
    /// Increment counter `id` by 1 from its current value
    Increment {
        /// Counter to increment
        id: CounterId,
    },
    /// Decrement counter `id` by 1 from its current value
    Decrement {
        /// Counter to decrement
        id: CounterId,
    },
    /// Set every counter to 0
    Reset,
}

/// Counter environment
#[derive(Debug, Clone)]
pub struct CounterEnvironment<C: Clock> {
    /// Clock used to stamp changes
    pub clock: C,
}

impl<C: Clock> CounterEnvironment<C> {
    /// Create a new counter environment with the given clock
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }
}

/// Counter reducer
///
/// Generic over the Clock type C to work with any clock implementation.
#[derive(Debug, Clone, Copy)]
pub struct CounterReducer<C> {
    _phantom: std::marker::PhantomData<C>,
}

impl<C> CounterReducer<C> {
    /// Create a new counter reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C> Default for CounterReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CounterReducer<C> {
    fn apply(state: &mut CounterState, counters: CounterCollection, env: &CounterEnvironment<C>) {
        if counters.key() != state.counters.key() {
            state.last_changed_at = Some(env.clock.now());
            tracing::debug!(total = counters.total(), "Counters changed");
        }
        state.counters = counters;
        state.last_error = None;
    }

    fn reject(state: &mut CounterState, error: CounterError) {
        tracing::warn!(%error, "Rejected counter update");
        metrics::counter!("counters.update.not_found").increment(1);
        state.last_error = Some(error);
    }
}

impl<C: Clock> Reducer for CounterReducer<C> {
    type State = CounterState;
    type Action = CounterAction;
    type Environment = CounterEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let next = match action {
            CounterAction::UpdateCounter { id, value } => state.counters.update(id, value),
            CounterAction::Increment { id } => state.counters.adjust(id, 1),
            CounterAction::Decrement { id } => state.counters.adjust(id, -1),
            CounterAction::Reset => Ok(state.counters.reset()),
        };

        match next {
            Ok(counters) => Self::apply(state, counters, env),
            Err(error) => Self::reject(state, error),
        }

        // Pure state machine - no side effects
        smallvec![Effect::None]
    }
}
