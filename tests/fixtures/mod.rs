// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for marble-engine
//!
//! Shared wiring for integration tests: emittable timelines, a deterministic
//! scheduler, and a combinator that records what it was called with.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use marble_engine::{
    testing::EmittableTimeline, Bounds, Combinator, MarbleEvent, MarbleInput, MarbleResult,
    OperatorOptions, QueueScheduler, SyncOperator,
};

pub type Args = Vec<Option<MarbleEvent<&'static str>>>;
pub type CallLog = Rc<RefCell<Vec<Args>>>;

/// Combinator logging every argument vector it receives and echoing its events
pub struct SpyCombinator {
    calls: CallLog,
}

impl Combinator<&'static str, &'static str> for SpyCombinator {
    fn combine(
        &self,
        events: &[Option<MarbleEvent<&'static str>>],
        _bounds: Bounds,
    ) -> MarbleResult<Vec<MarbleEvent<&'static str>>> {
        self.calls.borrow_mut().push(events.to_vec());
        Ok(events.iter().flatten().cloned().collect())
    }

    fn name(&self) -> &str {
        "spy"
    }
}

/// `count` timelines named `in0`, `in1`, ... with the default window
pub fn timelines(count: usize) -> Vec<EmittableTimeline<&'static str>> {
    (0..count)
        .map(|i| EmittableTimeline::new(format!("in{i}"), Bounds::DEFAULT))
        .collect()
}

pub fn inputs_of(timelines: &[EmittableTimeline<&'static str>]) -> Vec<MarbleInput<&'static str>> {
    timelines
        .iter()
        .map(|timeline| MarbleInput::timeline(timeline.clone()))
        .collect()
}

/// Spy operator over `timelines`, flushed by a fresh queue scheduler
pub fn spy_operator(
    timelines: &[EmittableTimeline<&'static str>],
) -> (SyncOperator<&'static str, &'static str>, QueueScheduler, CallLog) {
    let scheduler = QueueScheduler::new();
    let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
    let operator = SyncOperator::new(
        SpyCombinator {
            calls: Rc::clone(&calls),
        },
        OperatorOptions::new(inputs_of(timelines), Rc::new(scheduler.clone())),
    );
    (operator, scheduler, calls)
}
