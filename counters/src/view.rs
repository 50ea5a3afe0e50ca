//! Minimal text view over a counter collection.
//!
//! Stands in for a UI layer: it renders one row per counter and the running
//! total, and it tracks which rows actually changed since the previous frame
//! the way a memoized component would.

use crate::total::TotalMemo;
use crate::types::{CounterCollection, CounterId};
use std::fmt;
use std::sync::Arc;

/// One rendered counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Counter id
    pub id: CounterId,
    /// Displayed value
    pub value: i64,
    /// Whether the entry differs from the previous frame
    pub changed: bool,
}

/// One rendered screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Counter rows in display order
    pub rows: Vec<Row>,
    /// Running total
    pub total: i64,
}

impl Frame {
    /// Ids of the rows that changed since the previous frame
    pub fn changed_ids(&self) -> impl Iterator<Item = CounterId> {
        self.rows.iter().filter(|row| row.changed).map(|row| row.id)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "[-] {} [+]", row.value)?;
        }
        write!(f, "Total count: {}", self.total)
    }
}

/// Stateful renderer holding the previous frame's collection and a total memo
#[derive(Debug, Default)]
pub struct CounterView {
    memo: TotalMemo,
    previous: Option<CounterCollection>,
}

impl CounterView {
    /// Creates a view that has rendered nothing yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            memo: TotalMemo::new(),
            previous: None,
        }
    }

    /// Renders `counters`
    ///
    /// A row is marked changed unless its entry is the very same allocation
    /// as in the previously rendered collection. The total is recomputed only
    /// when the collection key changed.
    pub fn render(&mut self, counters: &CounterCollection) -> Frame {
        let rows = counters
            .entries()
            .iter()
            .map(|entry| Row {
                id: entry.id,
                value: entry.value,
                changed: self
                    .previous
                    .as_ref()
                    .and_then(|previous| previous.entry(entry.id))
                    .is_none_or(|previous| !Arc::ptr_eq(previous, entry)),
            })
            .collect();

        let total = self.memo.total(counters);
        self.previous = Some(counters.clone());

        Frame { rows, total }
    }

    /// How many times the total was recomputed across all renders
    #[must_use]
    pub const fn total_recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}
