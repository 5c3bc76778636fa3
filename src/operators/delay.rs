// Copyright (c) 2025 - Cowboy AI, Inc.
//! Delay Combinator
//!
//! Shifts every timed event later by a fixed amount. Shifted times never
//! pass the operator's bounds end. Untimed events (`Noop`, `Move`) pass
//! through unchanged.
//!
//! ```text
//! input:  ^-(a)-(b)--------X
//! delay(20)
//! output: ^-----(a)-(b)----X
//! ```

use crate::config::OperatorOptions;
use crate::errors::MarbleResult;
use crate::event::{MarbleEvent, Time};
use crate::operator::{Combinator, SyncOperator};
use crate::timeline::Bounds;

/// Combinator shifting timed events by `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayCombinator {
    delay: Time,
}

impl DelayCombinator {
    pub fn new(delay: Time) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Time {
        self.delay
    }
}

impl<T: Clone> Combinator<T, T> for DelayCombinator {
    fn combine(
        &self,
        events: &[Option<MarbleEvent<T>>],
        bounds: Bounds,
    ) -> MarbleResult<Vec<MarbleEvent<T>>> {
        Ok(events
            .iter()
            .flatten()
            .map(|event| match event.time() {
                Some(time) => event
                    .clone()
                    .with_time(bounds.clamp_end(time.saturating_add(self.delay))),
                None => event.clone(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "delay"
    }

    fn kind(&self) -> &str {
        "(a) => (delayed) a"
    }

    fn description(&self) -> &str {
        "Delays input events"
    }
}

/// Delay operator; every input of `options` is delayed independently
pub fn delay<T: Clone + 'static>(delay: Time, options: OperatorOptions<T>) -> SyncOperator<T, T> {
    SyncOperator::new(DelayCombinator::new(delay), options)
}
