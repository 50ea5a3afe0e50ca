//! Property tests for the pure collection operations

use counters::{CounterCollection, CounterId, TotalMemo, compute_total, update_counter};
use proptest::prelude::*;
use std::sync::Arc;

fn values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000_000_i64..1_000_000, 0..8)
}

fn values_and_index() -> impl Strategy<Value = (Vec<i64>, usize)> {
    prop::collection::vec(-1_000_000_i64..1_000_000, 1..8)
        .prop_flat_map(|values| {
            let len = values.len();
            (Just(values), 0..len)
        })
}

fn id_at(index: usize) -> CounterId {
    CounterId::new(u32::try_from(index + 1).unwrap_or(u32::MAX))
}

proptest! {
    #[test]
    fn update_sets_only_the_target((values, index) in values_and_index(), new_value in any::<i64>()) {
        let before = CounterCollection::from_values(values.clone());
        let after = update_counter(&before, id_at(index), new_value)?;

        let mut expected = values;
        expected[index] = new_value;
        prop_assert_eq!(after.iter().map(|c| c.value).collect::<Vec<_>>(), expected);
        prop_assert_eq!(after.ids().collect::<Vec<_>>(), before.ids().collect::<Vec<_>>());
    }

    #[test]
    fn update_shares_every_other_entry((values, index) in values_and_index(), new_value in any::<i64>()) {
        let before = CounterCollection::from_values(values);
        let after = before.update(id_at(index), new_value)?;

        for (position, (old, new)) in before.entries().iter().zip(after.entries()).enumerate() {
            if position != index {
                prop_assert!(Arc::ptr_eq(old, new));
            }
        }
    }

    #[test]
    fn update_is_idempotent((values, index) in values_and_index(), new_value in any::<i64>()) {
        let before = CounterCollection::from_values(values);

        let once = before.update(id_at(index), new_value)?;
        let twice = before.update(id_at(index), new_value)?;
        let again = once.update(id_at(index), new_value)?;

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.key(), again.key());
    }

    #[test]
    fn unknown_ids_are_rejected(values in values(), extra in 1_usize..100) {
        let before = CounterCollection::from_values(values.clone());

        prop_assert!(before.update(id_at(values.len() + extra - 1), 1).is_err());
    }

    #[test]
    fn total_is_the_sum(values in values()) {
        let counters = CounterCollection::from_values(values.clone());

        prop_assert_eq!(compute_total(&counters), values.iter().sum::<i64>());
    }

    #[test]
    fn total_matches_wide_sum(values in prop::collection::vec(any::<i64>(), 0..8)) {
        let counters = CounterCollection::from_values(values.clone());
        let wide: i128 = values.iter().copied().map(i128::from).sum();
        let expected = i64::try_from(wide).unwrap_or(if wide > 0 { i64::MAX } else { i64::MIN });

        prop_assert_eq!(compute_total(&counters), expected);
    }

    #[test]
    fn total_does_not_depend_on_order(values in prop::collection::vec(any::<i64>(), 0..8)) {
        let forward = CounterCollection::from_values(values.clone());
        let backward = CounterCollection::from_values(values.into_iter().rev());

        prop_assert_eq!(compute_total(&forward), compute_total(&backward));
    }

    #[test]
    fn memo_agrees_with_direct_total((values, index) in values_and_index(), deltas in prop::collection::vec(-5_i64..5, 1..20)) {
        let mut memo = TotalMemo::new();
        let mut counters = CounterCollection::from_values(values);

        for delta in deltas {
            counters = counters.adjust(id_at(index), delta)?;
            prop_assert_eq!(memo.total(&counters), compute_total(&counters));
        }
    }

    #[test]
    fn sequential_updates_to_different_ids_both_land(values in prop::collection::vec(-100_i64..100, 2..8), a in any::<i16>(), b in any::<i16>()) {
        let base = CounterCollection::from_values(values);
        let first = id_at(0);
        let second = id_at(base.len() - 1);

        let current = base.update(first, i64::from(a))?;
        let current = current.update(second, i64::from(b))?;

        prop_assert_eq!(current.value_of(first), Some(i64::from(a)));
        prop_assert_eq!(current.value_of(second), Some(i64::from(b)));
    }
}
