//! The derived total and its memoization.

use crate::types::{CollectionKey, CounterCollection};

/// Sum of every counter value
///
/// Pure: never mutates `collection`. Returns 0 for an empty collection.
///
/// Values are summed in `i128`, so the result does not depend on counter
/// order. Only a true sum outside `i64` is clamped to `i64::MIN`/`i64::MAX`.
#[must_use]
pub fn compute_total(collection: &CounterCollection) -> i64 {
    let sum: i128 = collection
        .iter()
        .map(|counter| i128::from(counter.value))
        .sum();
    i64::try_from(sum).unwrap_or(if sum > 0 { i64::MAX } else { i64::MIN })
}

/// Cached total keyed on [`CollectionKey`]
///
/// Recomputes only when handed a collection whose key differs from the last
/// one it saw.
#[derive(Debug, Clone, Default)]
pub struct TotalMemo {
    cached: Option<(CollectionKey, i64)>,
    recomputations: u64,
}

impl TotalMemo {
    /// Creates an empty memo
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cached: None,
            recomputations: 0,
        }
    }

    /// Total of `collection`, reusing the cached value if the key matches
    pub fn total(&mut self, collection: &CounterCollection) -> i64 {
        let key = collection.key();
        match self.cached {
            Some((cached_key, total)) if cached_key == key => total,
            _ => {
                let total = compute_total(collection);
                self.cached = Some((key, total));
                self.recomputations += 1;
                tracing::trace!(total, recomputations = self.recomputations, "Recomputed total");
                total
            },
        }
    }

    /// How many times the total was actually computed
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
