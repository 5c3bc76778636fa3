// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Instant Grouping

use marble_engine::operator::{group_by_instant, to_arguments, EventRecord};
use marble_engine::MarbleEvent;
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Any event on one of four inputs, times drawn from a small range so that
/// collisions are common
fn record() -> impl Strategy<Value = EventRecord<u8>> {
    let event = prop_oneof![
        4 => (0i64..6, any::<u8>()).prop_map(|(time, v)| MarbleEvent::value(time, v)),
        1 => (0i64..6).prop_map(MarbleEvent::<u8>::start),
        1 => (0i64..6).prop_map(MarbleEvent::<u8>::closed),
        1 => Just(MarbleEvent::Noop),
        1 => (0i64..6, 0i64..6, any::<u8>()).prop_map(|(time, old, v)| {
            MarbleEvent::moved(marble_engine::ValueEvent::new(time, v), old)
        }),
    ];
    (0usize..4, event).prop_map(|(input, event)| EventRecord::new(input, event))
}

fn batch() -> impl Strategy<Value = Vec<EventRecord<u8>>> {
    prop::collection::vec(record(), 0..40)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Grouping neither drops nor invents records
    #[test]
    fn prop_grouping_is_a_permutation(records in batch()) {
        let groups = group_by_instant(records.clone());
        let flattened: Vec<_> = groups.into_iter().flatten().collect();

        prop_assert_eq!(flattened.len(), records.len());
        for record in &records {
            let expected = records.iter().filter(|r| *r == record).count();
            let actual = flattened.iter().filter(|r| *r == record).count();
            prop_assert_eq!(expected, actual);
        }
    }

    /// Property: Untimed records keep their positions
    #[test]
    fn prop_untimed_positions_preserved(records in batch()) {
        let flattened: Vec<_> = group_by_instant(records.clone()).into_iter().flatten().collect();

        for (before, after) in records.iter().zip(&flattened) {
            prop_assert_eq!(before.event.is_timed(), after.event.is_timed());
            if !before.event.is_timed() {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// Property: Timed records come out in non-decreasing time order
    #[test]
    fn prop_timed_records_sorted(records in batch()) {
        let times: Vec<_> = group_by_instant(records)
            .into_iter()
            .flatten()
            .filter_map(|r| r.event.time())
            .collect();

        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Property: A group is one untimed record or timed records sharing a time
    #[test]
    fn prop_groups_are_instants(records in batch()) {
        for group in group_by_instant(records) {
            prop_assert!(!group.is_empty());
            let times: Vec<_> = group.iter().map(|r| r.event.time()).collect();
            if times.iter().any(Option::is_none) {
                prop_assert_eq!(group.len(), 1);
            } else {
                prop_assert!(times.iter().all(|t| *t == times[0]));
            }
        }
    }

    /// Property: No input appears twice in one group
    #[test]
    fn prop_one_record_per_input(records in batch()) {
        for group in group_by_instant(records) {
            let mut inputs: Vec<usize> = group.iter().map(|r| r.input).collect();
            inputs.sort_unstable();
            inputs.dedup();
            prop_assert_eq!(inputs.len(), group.len());
        }
    }

    /// Property: Adjacent timed groups share a time only when the later one
    /// starts with an input the earlier one already holds
    #[test]
    fn prop_adjacent_timed_groups_split_on_repeat(records in batch()) {
        let groups = group_by_instant(records);
        for pair in groups.windows(2) {
            let (left, right) = (pair[0][0].event.time(), pair[1][0].event.time());
            if let (Some(left), Some(right)) = (left, right) {
                if left == right {
                    let opener = pair[1][0].input;
                    prop_assert!(pair[0].iter().any(|r| r.input == opener));
                }
            }
        }
    }

    /// Property: Argument vectors are positional and as short as possible
    #[test]
    fn prop_arguments_positional(records in batch()) {
        for group in group_by_instant(records) {
            let max_input = group.iter().map(|r| r.input).max();
            let inputs: Vec<usize> = group.iter().map(|r| r.input).collect();
            let args = to_arguments(group);

            prop_assert_eq!(Some(args.len()), max_input.map(|i| i + 1));
            prop_assert!(args.last().map_or(false, Option::is_some));
            for (slot, arg) in args.iter().enumerate() {
                prop_assert_eq!(arg.is_some(), inputs.contains(&slot));
            }
        }
    }
}
