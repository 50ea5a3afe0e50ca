//! Domain types for the counter collection.
//!
//! A [`CounterCollection`] is an ordered, immutable value. Every change
//! produces a new collection that shares all untouched entries with its
//! predecessor, so a view can tell which rows changed with a pointer
//! comparison and can skip re-rendering the rest.

use crate::error::CounterError;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of counters in the seed collection
pub const SEED_SIZE: usize = 3;

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of a counter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterId(u32);

impl CounterId {
    /// Creates a `CounterId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single identified counter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Unique, stable identifier
    pub id: CounterId,
    /// Current value
    pub value: i64,
}

impl Counter {
    /// Creates a new counter
    #[must_use]
    pub const fn new(id: CounterId, value: i64) -> Self {
        Self { id, value }
    }

    /// Returns a copy of this counter holding `value`
    #[must_use]
    pub const fn with_value(&self, value: i64) -> Self {
        Self { id: self.id, value }
    }
}

/// Identity of a collection value, used as a memoization key.
///
/// Every independently constructed collection and every update that changes a
/// value gets a fresh key. Updates that change nothing keep the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollectionKey(u64);

impl CollectionKey {
    fn fresh() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ordered collection of counters with unique ids
///
/// Equality compares counters only. Two collections with the same counters
/// in the same order are equal even if their keys differ.
#[derive(Clone, Debug)]
pub struct CounterCollection {
    counters: Vec<Arc<Counter>>,
    key: CollectionKey,
}

impl CounterCollection {
    /// The seed collection: counters 1 to 3, all at zero
    #[must_use]
    pub fn initial() -> Self {
        Self::from_values([0; SEED_SIZE])
    }

    /// A collection with no counters
    #[must_use]
    pub fn empty() -> Self {
        Self::from_values([])
    }

    /// Builds a collection from values in display order
    ///
    /// Ids are assigned sequentially starting at 1, so they are unique by
    /// construction.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let counters = values
            .into_iter()
            .zip(1..)
            .map(|(value, id)| Arc::new(Counter::new(CounterId::new(id), value)))
            .collect();

        Self {
            counters,
            key: CollectionKey::fresh(),
        }
    }

    /// Returns a collection where counter `id` holds `value`
    ///
    /// Order and every other entry are preserved. Untouched entries are shared
    /// with `self`. Writing the value already present returns a collection
    /// with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::IdNotFound`] if no counter has this id. `self`
    /// is left as it was.
    pub fn update(&self, id: CounterId, value: i64) -> Result<Self, CounterError> {
        let index = self.position(id).ok_or(CounterError::IdNotFound(id))?;
        let current = &self.counters[index];
        if current.value == value {
            return Ok(self.clone());
        }

        let mut counters = self.counters.clone();
        counters[index] = Arc::new(current.with_value(value));

        Ok(Self {
            counters,
            key: CollectionKey::fresh(),
        })
    }

    /// Returns a collection where counter `id` moved by `delta` from its current value
    ///
    /// Saturates at the bounds of `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::IdNotFound`] if no counter has this id.
    pub fn adjust(&self, id: CounterId, delta: i64) -> Result<Self, CounterError> {
        let current = self.get(id).ok_or(CounterError::IdNotFound(id))?;
        self.update(id, current.value.saturating_add(delta))
    }

    /// Returns a collection where every counter is zero
    ///
    /// Counters already at zero keep their entry.
    #[must_use]
    pub fn reset(&self) -> Self {
        if self.counters.iter().all(|counter| counter.value == 0) {
            return self.clone();
        }

        let counters = self
            .counters
            .iter()
            .map(|counter| {
                if counter.value == 0 {
                    Arc::clone(counter)
                } else {
                    Arc::new(counter.with_value(0))
                }
            })
            .collect();

        Self {
            counters,
            key: CollectionKey::fresh(),
        }
    }

    /// Returns the counter with this id
    #[must_use]
    pub fn get(&self, id: CounterId) -> Option<&Counter> {
        self.entry(id).map(|counter| &**counter)
    }

    /// Returns the shared entry for this id
    ///
    /// Compare entries with [`Arc::ptr_eq`] to detect whether a counter was
    /// replaced between two collections.
    #[must_use]
    pub fn entry(&self, id: CounterId) -> Option<&Arc<Counter>> {
        self.counters.iter().find(|counter| counter.id == id)
    }

    /// Returns the value of the counter with this id
    #[must_use]
    pub fn value_of(&self, id: CounterId) -> Option<i64> {
        self.get(id).map(|counter| counter.value)
    }

    /// All entries in display order
    #[must_use]
    pub fn entries(&self) -> &[Arc<Counter>] {
        &self.counters
    }

    /// Iterates counters in display order
    pub fn iter(&self) -> impl Iterator<Item = &Counter> {
        self.counters.iter().map(|counter| &**counter)
    }

    /// Ids in display order
    pub fn ids(&self) -> impl Iterator<Item = CounterId> {
        self.counters.iter().map(|counter| counter.id)
    }

    /// Number of counters
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether the collection has no counters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Identity of this collection value
    #[must_use]
    pub const fn key(&self) -> CollectionKey {
        self.key
    }

    /// Sum of all values
    #[must_use]
    pub fn total(&self) -> i64 {
        crate::total::compute_total(self)
    }

    fn position(&self, id: CounterId) -> Option<usize> {
        self.counters.iter().position(|counter| counter.id == id)
    }
}

impl Default for CounterCollection {
    /// Same as [`CounterCollection::initial`]
    fn default() -> Self {
        Self::initial()
    }
}

impl PartialEq for CounterCollection {
    fn eq(&self, other: &Self) -> bool {
        self.counters == other.counters
    }
}

impl Eq for CounterCollection {}

impl Serialize for CounterCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
