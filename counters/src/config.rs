//! Configuration for the counters binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unset, unparsable or out-of-range variables fall back to the default.

use crate::reducer::CounterState;
use crate::types::{CounterCollection, SEED_SIZE};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Largest accepted `COUNTERS_COUNT`
pub const MAX_COUNTERS: usize = 1024;

/// Counters configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountersConfig {
    /// Number of counters to seed (`COUNTERS_COUNT`, default 3)
    pub counters: usize,
    /// Starting value of every counter (`COUNTERS_INITIAL_VALUE`, default 0)
    pub initial_value: i64,
    /// Shutdown timeout in milliseconds (`COUNTERS_SHUTDOWN_TIMEOUT_MS`, default 1000)
    pub shutdown_timeout_ms: u64,
}

impl CountersConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            counters: parse_var(&lookup, "COUNTERS_COUNT")
                .filter(|&count| within_ceiling(count))
                .unwrap_or(defaults.counters),
            initial_value: parse_var(&lookup, "COUNTERS_INITIAL_VALUE")
                .unwrap_or(defaults.initial_value),
            shutdown_timeout_ms: parse_var(&lookup, "COUNTERS_SHUTDOWN_TIMEOUT_MS")
                .unwrap_or(defaults.shutdown_timeout_ms),
        }
    }

    /// Set the number of seeded counters.
    #[must_use]
    pub const fn with_counters(mut self, counters: usize) -> Self {
        self.counters = counters;
        self
    }

    /// Set the starting value of every counter.
    #[must_use]
    pub const fn with_initial_value(mut self, value: i64) -> Self {
        self.initial_value = value;
        self
    }

    /// Set the shutdown timeout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Timeouts beyond u64 milliseconds are not meaningful
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// The shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// The seed collection described by this configuration.
    #[must_use]
    pub fn seed(&self) -> CounterCollection {
        CounterCollection::from_values(std::iter::repeat_n(self.initial_value, self.counters))
    }

    /// The initial store state described by this configuration.
    #[must_use]
    pub fn initial_state(&self) -> CounterState {
        CounterState::new(self.seed())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "Ignoring unparsable configuration value");
    }
    parsed
}

fn within_ceiling(count: usize) -> bool {
    if count > MAX_COUNTERS {
        tracing::warn!(
            count,
            max = MAX_COUNTERS,
            "Ignoring COUNTERS_COUNT above the ceiling"
        );
        return false;
    }
    true
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            counters: SEED_SIZE,
            initial_value: 0,
            shutdown_timeout_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_seed() {
        let config = CountersConfig::from_lookup(lookup(&[]));

        assert_eq!(config, CountersConfig::default());
        assert_eq!(config.seed(), CounterCollection::initial());
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn reads_overrides() {
        let config = CountersConfig::from_lookup(lookup(&[
            ("COUNTERS_COUNT", "5"),
            ("COUNTERS_INITIAL_VALUE", " -2 "),
            ("COUNTERS_SHUTDOWN_TIMEOUT_MS", "250"),
        ]));

        assert_eq!(config.seed(), CounterCollection::from_values([-2; 5]));
        assert_eq!(config.initial_state().total(), -10);
        assert_eq!(config.shutdown_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn ignores_unparsable_values() {
        let config = CountersConfig::from_lookup(lookup(&[("COUNTERS_COUNT", "three")]));

        assert_eq!(config.counters, SEED_SIZE);
    }

    #[test]
    fn ignores_counts_above_ceiling() {
        let config = CountersConfig::from_lookup(lookup(&[("COUNTERS_COUNT", "9999999999999")]));
        assert_eq!(config.counters, SEED_SIZE);

        let config = CountersConfig::from_lookup(lookup(&[("COUNTERS_COUNT", "1024")]));
        assert_eq!(config.counters, MAX_COUNTERS);
    }

    #[test]
    fn builders_override_fields() {
        let config = CountersConfig::default()
            .with_counters(2)
            .with_initial_value(7)
            .with_shutdown_timeout(Duration::from_millis(5));

        assert_eq!(config.seed(), CounterCollection::from_values([7, 7]));
        assert_eq!(config.shutdown_timeout_ms, 5);
    }
}
