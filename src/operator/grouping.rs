// Copyright (c) 2025 - Cowboy AI, Inc.
//! Instant Grouping
//!
//! Turns a flushed batch of input records into per-instant argument vectors.
//!
//! ```text
//! buffered:  A:V(3)  B:V(1)  A:Noop  B:V(3)  A:V(1)
//! sorted:    B:V(1)  A:V(1)  A:Noop  A:V(3)  B:V(3)
//! groups:   [B:V(1)  A:V(1)] [A:Noop] [A:V(3)  B:V(3)]
//! args:     [V(1), V(1)]     [Noop]   [V(3), V(3)]
//! ```
//!
//! Timed records are stably sorted by time among the timed positions of the
//! batch; untimed records keep their positions. A group is a run of
//! consecutive timed records sharing one time, holding at most one record per
//! input. A second same-time record from an input opens the next group, so
//! `(ab)` on one input yields two instants at that time. Every untimed record
//! forms its own group.

use crate::event::{MarbleEvent, Time};

/// One ingested event tagged with the position of the input that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord<T> {
    pub input: usize,
    pub event: MarbleEvent<T>,
}

impl<T> EventRecord<T> {
    pub fn new(input: usize, event: MarbleEvent<T>) -> Self {
        Self { input, event }
    }
}

/// Sparse per-input arguments of one instant; `None` means the input did not fire
pub type ArgumentVector<T> = Vec<Option<MarbleEvent<T>>>;

/// Order records by instant and split them into groups
pub fn group_by_instant<T>(records: Vec<EventRecord<T>>) -> Vec<Vec<EventRecord<T>>> {
    let sorted = sort_timed_in_place(records);

    let mut groups: Vec<Vec<EventRecord<T>>> = Vec::new();
    let mut open: Option<Time> = None;

    for record in sorted {
        let joins_open = match groups.last() {
            Some(group) => !group.iter().any(|r| r.input == record.input),
            None => false,
        };
        match record.event.time() {
            Some(time) if open == Some(time) && joins_open => {
                if let Some(group) = groups.last_mut() {
                    group.push(record);
                }
            }
            Some(time) => {
                open = Some(time);
                groups.push(vec![record]);
            }
            None => {
                open = None;
                groups.push(vec![record]);
            }
        }
    }

    groups
}

/// Stable sort of the timed records; untimed records stay where they were
fn sort_timed_in_place<T>(records: Vec<EventRecord<T>>) -> Vec<EventRecord<T>> {
    let timed_slots: Vec<bool> = records.iter().map(|r| r.event.is_timed()).collect();

    let (mut timed, untimed): (Vec<_>, Vec<_>) =
        records.into_iter().partition(|r| r.event.is_timed());
    timed.sort_by_key(|r| r.event.time());

    let mut timed = timed.into_iter();
    let mut untimed = untimed.into_iter();
    timed_slots
        .into_iter()
        .filter_map(|is_timed| if is_timed { timed.next() } else { untimed.next() })
        .collect()
}

/// Build the sparse argument vector of one group
///
/// The vector is as long as the highest contributing input position plus one.
/// Groups from [`group_by_instant`] hold one record per input; should a
/// hand-built group hold two, the later record wins the slot.
pub fn to_arguments<T>(group: Vec<EventRecord<T>>) -> ArgumentVector<T> {
    let len = group.iter().map(|r| r.input + 1).max().unwrap_or(0);
    let mut args: ArgumentVector<T> = std::iter::repeat_with(|| None).take(len).collect();
    for record in group {
        args[record.input] = Some(record.event);
    }
    args
}
