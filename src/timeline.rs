// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timelines - sources with a logical time window
//!
//! Bounds describe the extent of a timeline for scaling and rendering. They
//! never influence how events are combined.

use serde::{Deserialize, Serialize};

use crate::event::{Time, ValueEvent};
use crate::source::MarbleSource;

/// Logical time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub start: Time,
    pub end: Time,
}

impl Bounds {
    /// Window used when nothing better is known
    pub const DEFAULT: Bounds = Bounds { start: 0, end: 100 };

    /// Create a window
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Smallest window covering both
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Window covered by both; may be empty (`start > end`)
    pub fn intersection(self, other: Bounds) -> Bounds {
        Bounds {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        }
    }

    /// Clamp `time` to at most `end`
    pub fn clamp_end(self, time: Time) -> Time {
        time.min(self.end)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A source exposing its logical time window
pub trait MarbleTimeline<T>: MarbleSource<T> {
    /// Logical time window of this timeline
    fn bounds(&self) -> Bounds;
}

/// A timeline whose emitted values can be relocated
pub trait MarbleTimelineInput<T>: MarbleTimeline<T> {
    /// Relocate a previously emitted value to `time`
    ///
    /// Subscribers observe a `Move` event carrying the value at `time` and its
    /// previous time.
    fn move_event(&self, event: ValueEvent<T>, time: Time);
}
