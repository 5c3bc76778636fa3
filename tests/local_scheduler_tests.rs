// Copyright (c) 2025 - Cowboy AI, Inc.

//! Integration tests for operators deferred onto a tokio `LocalSet`
//!
//! These tests verify the complete flow:
//! 1. Emissions schedule a flush with `spawn_local` instead of combining
//! 2. Chained operators each defer their own flush
//! 3. A failing flush is logged and dropped, and the next flush delivers

use std::rc::Rc;

use marble_engine::{
    operators::{map, try_map},
    testing::{EmittableTimeline, Recorder},
    Bounds, LocalTaskScheduler, MarbleError, MarbleEvent, MarbleInput, OperatorOptions,
    Subscribable, SyncOperator,
};
use pretty_assertions::assert_eq;
use tokio::task::LocalSet;

/// Lets every spawned local task, and the tasks they spawn, run
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

struct Pipeline {
    input: EmittableTimeline<i32>,
    doubled: SyncOperator<i32, i32>,
    shifted: SyncOperator<i32, i32>,
}

/// Doubles values, rejecting negative ones, then adds one
fn pipeline() -> Pipeline {
    let input = EmittableTimeline::new("numbers", Bounds::DEFAULT);
    let doubled = try_map(
        |values: &[Option<i32>]| match values.iter().flatten().next() {
            Some(v) if *v < 0 => Err(MarbleError::Generic(format!("negative value {v}"))),
            Some(v) => Ok(v * 2),
            None => Ok(0),
        },
        OperatorOptions::new(
            vec![MarbleInput::timeline(input.clone())],
            Rc::new(LocalTaskScheduler::new()),
        )
        .with_name("double"),
    );
    let shifted = map(
        |values: &[Option<i32>]| values.iter().flatten().sum::<i32>() + 1,
        OperatorOptions::new(vec![doubled.as_input()], Rc::new(LocalTaskScheduler::new())),
    );

    Pipeline {
        input,
        doubled,
        shifted,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_chain_delivers_through_local_tasks() {
    LocalSet::new()
        .run_until(async {
            let p = pipeline();
            let recorder = Recorder::new();
            let _sub = p.shifted.subscribe(recorder.callback());

            p.input.emit(MarbleEvent::value(1, 3));
            p.input.emit(MarbleEvent::value(2, 4));

            // Nothing is combined until the spawned flush runs
            assert_eq!(p.doubled.pending_records(), 2);
            assert!(recorder.is_empty());

            settle().await;

            assert_eq!(p.doubled.pending_records(), 0);
            assert_eq!(
                recorder.events(),
                vec![MarbleEvent::value(1, 7), MarbleEvent::value(2, 9)]
            );
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_failed_local_flush_is_dropped_and_next_flush_delivers() {
    LocalSet::new()
        .run_until(async {
            let p = pipeline();
            let direct = Recorder::new();
            let downstream = Recorder::new();
            let _direct = p.doubled.subscribe(direct.callback());
            let _downstream = p.shifted.subscribe(downstream.callback());

            p.input.emit(MarbleEvent::value(1, 5));
            p.input.emit(MarbleEvent::value(2, -1));
            settle().await;

            // The whole failing flush is discarded, including its good group
            assert!(direct.is_empty());
            assert!(downstream.is_empty());
            assert!(p.doubled.is_active());

            p.input.emit(MarbleEvent::value(3, 6));
            settle().await;

            assert_eq!(direct.events(), vec![MarbleEvent::value(3, 12)]);
            assert_eq!(downstream.events(), vec![MarbleEvent::value(3, 13)]);
        })
        .await;
}
