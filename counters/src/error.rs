//! Error types for the counter collection.

use crate::types::CounterId;
use serde::Serialize;
use tally_runtime::StoreError;
use thiserror::Error;

/// Domain error raised by counter updates
///
/// Recoverable: the collection is left unchanged and the store keeps
/// accepting actions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CounterError {
    /// The update targeted an id that is not in the collection
    #[error("Counter {0} not found")]
    IdNotFound(CounterId),
}

/// Errors returned by [`CounterStore`](crate::CounterStore) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The action was applied and rejected by the reducer
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// The store did not accept the action
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_not_found_names_the_id() {
        let error = CounterError::IdNotFound(CounterId::new(99));
        assert_eq!(error.to_string(), "Counter 99 not found");
    }

    #[test]
    fn store_errors_convert() {
        let error: Error = StoreError::ShutdownInProgress.into();
        assert_eq!(error.to_string(), "Store is shutting down");
    }
}
