// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operator inputs
//!
//! An operator observes an ordered list of inputs. Each input is either a
//! plain source or a timeline; only timelines contribute to bounds.

use std::fmt;
use std::rc::Rc;

use crate::cancellable::Cancellable;
use crate::event::MarbleEvent;
use crate::source::{Callback, MarbleSource, Subscribable};
use crate::timeline::MarbleTimeline;

/// One input of an operator
pub enum MarbleInput<T> {
    /// Source without bounds
    Source(Rc<dyn MarbleSource<T>>),
    /// Source exposing bounds
    Timeline(Rc<dyn MarbleTimeline<T>>),
}

impl<T> MarbleInput<T> {
    /// Wrap a plain source
    pub fn source(source: impl MarbleSource<T> + 'static) -> Self {
        MarbleInput::Source(Rc::new(source))
    }

    /// Wrap a timeline
    pub fn timeline(timeline: impl MarbleTimeline<T> + 'static) -> Self {
        MarbleInput::Timeline(Rc::new(timeline))
    }

    /// The timeline capability, if this input has one
    pub fn as_timeline(&self) -> Option<&dyn MarbleTimeline<T>> {
        match self {
            MarbleInput::Timeline(timeline) => Some(timeline.as_ref()),
            MarbleInput::Source(_) => None,
        }
    }

    /// Display name of the input
    pub fn name(&self) -> &str {
        match self {
            MarbleInput::Source(source) => source.name(),
            MarbleInput::Timeline(timeline) => timeline.name(),
        }
    }

    /// Type signature label of the input
    pub fn kind(&self) -> &str {
        match self {
            MarbleInput::Source(source) => source.kind(),
            MarbleInput::Timeline(timeline) => timeline.kind(),
        }
    }

    /// Description of the input
    pub fn description(&self) -> &str {
        match self {
            MarbleInput::Source(source) => source.description(),
            MarbleInput::Timeline(timeline) => timeline.description(),
        }
    }
}

impl<T> Subscribable<MarbleEvent<T>> for MarbleInput<T> {
    fn subscribe(&self, callback: Callback<MarbleEvent<T>>) -> Box<dyn Cancellable> {
        match self {
            MarbleInput::Source(source) => source.subscribe(callback),
            MarbleInput::Timeline(timeline) => timeline.subscribe(callback),
        }
    }
}

impl<T> Clone for MarbleInput<T> {
    fn clone(&self) -> Self {
        match self {
            MarbleInput::Source(source) => MarbleInput::Source(Rc::clone(source)),
            MarbleInput::Timeline(timeline) => MarbleInput::Timeline(Rc::clone(timeline)),
        }
    }
}

impl<T> fmt::Debug for MarbleInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarbleInput::Source(_) => write!(f, "MarbleInput::Source({})", self.name()),
            MarbleInput::Timeline(_) => write!(f, "MarbleInput::Timeline({})", self.name()),
        }
    }
}
