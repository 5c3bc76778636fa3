// Copyright (c) 2025 - Cowboy AI, Inc.
//! Map Combinator
//!
//! Per instant:
//!
//! - every non-value event is forwarded as its own output, in input order
//! - if at least one input fired a value, the user function receives the
//!   sparse value vector and one output value is emitted at the latest value
//!   time of the instant, clamped to the operator's bounds end
//!
//! ```text
//! letters: ^----(a)---(b)---X
//! numbers: ^----(1)---(2)---X
//! output:  ^----(a1)--(b2)--X
//! ```
//!
//! A relocated value (`Move`) is forwarded as a `Move` of the mapped value.

use std::rc::Rc;

use crate::config::OperatorOptions;
use crate::errors::MarbleResult;
use crate::event::{MarbleEvent, ValueEvent};
use crate::operator::{Combinator, SyncOperator};
use crate::timeline::Bounds;

type MapFn<I, O> = Rc<dyn Fn(&[Option<I>]) -> MarbleResult<O>>;

/// Combinator applying a function to the values of each instant
pub struct MapCombinator<I, O> {
    map_fn: MapFn<I, O>,
}

impl<I, O> Clone for MapCombinator<I, O> {
    fn clone(&self) -> Self {
        Self {
            map_fn: Rc::clone(&self.map_fn),
        }
    }
}

impl<I: Clone + 'static, O: 'static> MapCombinator<I, O> {
    /// Combinator with an infallible function
    pub fn new<F>(map_fn: F) -> Self
    where
        F: Fn(&[Option<I>]) -> O + 'static,
    {
        Self::try_new(move |values: &[Option<I>]| Ok(map_fn(values)))
    }

    /// Combinator with a fallible function; an error aborts the flush
    pub fn try_new<F>(map_fn: F) -> Self
    where
        F: Fn(&[Option<I>]) -> MarbleResult<O> + 'static,
    {
        Self {
            map_fn: Rc::new(map_fn),
        }
    }

    fn forward(&self, event: &MarbleEvent<I>, slot: usize) -> MarbleResult<Option<MarbleEvent<O>>> {
        let forwarded = match event {
            MarbleEvent::Value(_) => None,
            MarbleEvent::Noop => Some(MarbleEvent::Noop),
            MarbleEvent::Start { time } => Some(MarbleEvent::start(*time)),
            MarbleEvent::Closed { time } => Some(MarbleEvent::closed(*time)),
            MarbleEvent::Move { event, old_time } => {
                let mut values = vec![None; slot + 1];
                values[slot] = Some(event.value.clone());
                let mapped = (self.map_fn)(&values)?;
                Some(MarbleEvent::moved(ValueEvent::new(event.time, mapped), *old_time))
            }
        };
        Ok(forwarded)
    }
}

impl<I: Clone + 'static, O: 'static> Combinator<I, O> for MapCombinator<I, O> {
    fn combine(
        &self,
        events: &[Option<MarbleEvent<I>>],
        bounds: Bounds,
    ) -> MarbleResult<Vec<MarbleEvent<O>>> {
        let mut outputs = Vec::new();
        for (slot, event) in events.iter().enumerate() {
            if let Some(event) = event {
                outputs.extend(self.forward(event, slot)?);
            }
        }

        let values: Vec<Option<I>> = events
            .iter()
            .map(|event| {
                event
                    .as_ref()
                    .and_then(MarbleEvent::as_value)
                    .map(|value| value.value.clone())
            })
            .collect();

        let latest = events
            .iter()
            .flatten()
            .filter_map(MarbleEvent::as_value)
            .map(|value| value.time)
            .max();

        if let Some(latest) = latest {
            let output = (self.map_fn)(&values)?;
            outputs.push(MarbleEvent::value(bounds.clamp_end(latest), output));
        }

        Ok(outputs)
    }

    fn name(&self) -> &str {
        "map"
    }

    fn description(&self) -> &str {
        "Maps the input events to the output events"
    }
}

/// Map operator over `options.inputs`
pub fn map<I, O, F>(map_fn: F, options: OperatorOptions<I>) -> SyncOperator<I, O>
where
    I: Clone + 'static,
    O: 'static,
    F: Fn(&[Option<I>]) -> O + 'static,
{
    SyncOperator::new(MapCombinator::new(map_fn), options)
}

/// Map operator with a fallible function
pub fn try_map<I, O, F>(map_fn: F, options: OperatorOptions<I>) -> SyncOperator<I, O>
where
    I: Clone + 'static,
    O: 'static,
    F: Fn(&[Option<I>]) -> MarbleResult<O> + 'static,
{
    SyncOperator::new(MapCombinator::try_new(map_fn), options)
}
