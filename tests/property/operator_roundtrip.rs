// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Operators Fed Through Real Inputs

use std::rc::Rc;

use marble_engine::{
    operators::identity,
    testing::{EmittableTimeline, Recorder},
    Bounds, BoundsStrategy, MarbleEvent, MarbleInput, OperatorOptions, QueueScheduler,
    Subscribable, Time, ValueEvent, WidestBounds,
};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// One step of a scripted input: a timed event advancing the clock by a
/// small delta (zero included, so equal times are common) or an untimed event
#[derive(Debug, Clone)]
enum Step {
    Start(Time),
    Value(Time),
    Closed(Time),
    Noop,
    Move(Time, Time),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => (0i64..3).prop_map(Step::Start),
        4 => (0i64..3).prop_map(Step::Value),
        1 => (0i64..3).prop_map(Step::Closed),
        1 => Just(Step::Noop),
        1 => (0i64..30, 0i64..30).prop_map(|(time, old)| Step::Move(time, old)),
    ]
}

/// Timed steps only, as emitted by each input of a multi-input operator
fn timed_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => (0i64..3).prop_map(Step::Start),
        4 => (0i64..3).prop_map(Step::Value),
        1 => (0i64..3).prop_map(Step::Closed),
    ]
}

/// Builds the events of one input. Timed events have non-decreasing times
/// and every payload names its input and position.
fn script(input: usize, steps: &[Step]) -> Vec<MarbleEvent<(usize, usize)>> {
    let mut clock = 0;
    steps
        .iter()
        .enumerate()
        .map(|(seq, step)| match step {
            Step::Start(delta) => {
                clock += delta;
                MarbleEvent::start(clock)
            }
            Step::Value(delta) => {
                clock += delta;
                MarbleEvent::value(clock, (input, seq))
            }
            Step::Closed(delta) => {
                clock += delta;
                MarbleEvent::closed(clock)
            }
            Step::Noop => MarbleEvent::Noop,
            Step::Move(time, old) => MarbleEvent::moved(ValueEvent::new(*time, (input, seq)), *old),
        })
        .collect()
}

/// Subscribes identity over `scripts.len()` timelines, emits each script in
/// turn and returns what one flush delivered
fn run_identity(scripts: &[Vec<MarbleEvent<(usize, usize)>>]) -> Vec<MarbleEvent<(usize, usize)>> {
    let timelines: Vec<EmittableTimeline<(usize, usize)>> = (0..scripts.len())
        .map(|i| EmittableTimeline::new(format!("in{i}"), Bounds::new(0, 30)))
        .collect();
    let scheduler = QueueScheduler::new();
    let operator = identity(OperatorOptions::new(
        timelines.iter().cloned().map(|t| MarbleInput::timeline(t)).collect(),
        Rc::new(scheduler.clone()),
    ));
    let recorder = Recorder::new();
    let _sub = operator.subscribe(recorder.callback());

    for (timeline, events) in timelines.iter().zip(scripts) {
        for event in events {
            timeline.emit(event.clone());
        }
    }
    assert!(scheduler.pending() <= 1);
    scheduler.run_until_idle().unwrap();
    recorder.events()
}

fn windows() -> impl Strategy<Value = Vec<(Time, Time)>> {
    prop::collection::vec((0i64..50, 0i64..50).prop_map(|(a, b)| (a.min(b), a.max(b))), 0..6)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Identity over one input re-emits the input exactly, equal
    /// times and untimed events included
    #[test]
    fn prop_identity_roundtrip_one_input(steps in prop::collection::vec(step(), 0..24)) {
        let events = script(0, &steps);
        let output = run_identity(&[events.clone()]);

        prop_assert_eq!(output, events);
    }

    /// Property: Identity over several inputs re-emits every event, ordered
    /// by time and keeping each input's own order
    #[test]
    fn prop_identity_roundtrip_many_inputs(
        steps in prop::collection::vec(prop::collection::vec(timed_step(), 0..10), 1..4)
    ) {
        let scripts: Vec<_> = steps
            .iter()
            .enumerate()
            .map(|(input, steps)| script(input, steps))
            .collect();
        let output = run_identity(&scripts);

        let mut expected: Vec<MarbleEvent<(usize, usize)>> = scripts.iter().flatten().cloned().collect();
        expected.sort_by_key(|event| event.time());
        prop_assert_eq!(&output, &expected);

        let times: Vec<Option<Time>> = output.iter().map(MarbleEvent::time).collect();
        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
        for input in 0..scripts.len() {
            let seqs: Vec<usize> = output
                .iter()
                .filter_map(MarbleEvent::as_value)
                .filter(|v| v.value.0 == input)
                .map(|v| v.value.1)
                .collect();
            prop_assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Property: Widest bounds cover every timeline input exactly
    #[test]
    fn prop_widest_bounds_cover_inputs(windows in windows()) {
        let inputs: Vec<MarbleInput<u8>> = windows
            .iter()
            .map(|(start, end)| MarbleInput::timeline(EmittableTimeline::new("t", Bounds::new(*start, *end))))
            .collect();

        let bounds = WidestBounds::default().bounds(&inputs);

        match (windows.iter().map(|w| w.0).min(), windows.iter().map(|w| w.1).max()) {
            (Some(start), Some(end)) => prop_assert_eq!(bounds, Bounds::new(start, end)),
            _ => prop_assert_eq!(bounds, Bounds::DEFAULT),
        }
    }
}
