//! # Tally Testing
//!
//! Testing utilities and helpers for Tally reducers.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use tally_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(CounterReducer::new())
//!     .with_env(CounterEnvironment::new(test_clock()))
//!     .given_state(CounterState::initial())
//!     .when_action(CounterAction::Increment { id: CounterId::new(1) })
//!     .then_state(|state| assert_eq!(state.total(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tally_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tally_testing::mocks::FixedClock;
    /// use tally_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// The instant returned by [`test_clock`]
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        // 2025-01-01T00:00:00Z
        DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock, test_epoch};
pub use reducer_test::{ReducerTest, assertions};
