// Copyright (c) 2025 - Cowboy AI, Inc.
//! Marble Source Events
//!
//! A marble diagram is a discrete stream of time-stamped events. Every event a
//! source emits is one of five variants:
//!
//! ```text
//! Time:   0    10    20    30    40
//! Events: ^----(a)---(b)---(c)---X
//!         │     │                │
//!       Start  Value           Closed
//! ```
//!
//! - `Noop` acknowledges an instant without a semantic outcome
//! - `Start` (re)initializes a stream at a logical time
//! - `Closed` terminates a stream; a later `Start` may restart it
//! - `Value` carries a payload observed at a logical time
//! - `Move` relocates a previously emitted value to a new time
//!
//! Only `Start`, `Closed` and `Value` carry an observable time. `Noop` and
//! `Move` are untimed and are never grouped with other events.

use serde::{Deserialize, Serialize};

/// Logical time label. Not a clock reading.
pub type Time = i64;

/// Discriminant of a [`MarbleEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarbleEventKind {
    Noop,
    Start,
    Closed,
    Value,
    Move,
}

/// A payload observed at a logical time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueEvent<T> {
    /// Logical time of the observation
    pub time: Time,
    /// Observed payload
    pub value: T,
}

impl<T> ValueEvent<T> {
    /// Create a value event
    pub fn new(time: Time, value: T) -> Self {
        Self { time, value }
    }
}

/// Event emitted by a marble source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarbleEvent<T> {
    /// Instant acknowledged without an outcome
    Noop,

    /// Stream (re)initialization
    Start {
        /// Logical time of the start
        time: Time,
    },

    /// Terminal marker
    Closed {
        /// Logical time of the close
        time: Time,
    },

    /// Payload at a logical time
    Value(ValueEvent<T>),

    /// A value relocated from `old_time` to `event.time`
    Move {
        /// The value at its new time
        event: ValueEvent<T>,
        /// Time the value was previously emitted at
        old_time: Time,
    },
}

impl<T> MarbleEvent<T> {
    /// Create a `Start` event
    pub fn start(time: Time) -> Self {
        MarbleEvent::Start { time }
    }

    /// Create a `Closed` event
    pub fn closed(time: Time) -> Self {
        MarbleEvent::Closed { time }
    }

    /// Create a `Value` event
    pub fn value(time: Time, value: T) -> Self {
        MarbleEvent::Value(ValueEvent::new(time, value))
    }

    /// Create a `Move` event relocating `event` from `old_time`
    pub fn moved(event: ValueEvent<T>, old_time: Time) -> Self {
        MarbleEvent::Move { event, old_time }
    }

    /// Discriminant of this event
    pub fn kind(&self) -> MarbleEventKind {
        match self {
            MarbleEvent::Noop => MarbleEventKind::Noop,
            MarbleEvent::Start { .. } => MarbleEventKind::Start,
            MarbleEvent::Closed { .. } => MarbleEventKind::Closed,
            MarbleEvent::Value(_) => MarbleEventKind::Value,
            MarbleEvent::Move { .. } => MarbleEventKind::Move,
        }
    }

    /// Observable time of the event
    ///
    /// `None` for the untimed variants (`Noop`, `Move`).
    pub fn time(&self) -> Option<Time> {
        match self {
            MarbleEvent::Start { time } | MarbleEvent::Closed { time } => Some(*time),
            MarbleEvent::Value(event) => Some(event.time),
            MarbleEvent::Noop | MarbleEvent::Move { .. } => None,
        }
    }

    /// Whether the event carries an observable time
    pub fn is_timed(&self) -> bool {
        self.time().is_some()
    }

    /// Borrow the value event, if this is a `Value`
    pub fn as_value(&self) -> Option<&ValueEvent<T>> {
        match self {
            MarbleEvent::Value(event) => Some(event),
            _ => None,
        }
    }

    /// Return the same event re-stamped at `time`
    ///
    /// Untimed events are returned unchanged.
    pub fn with_time(self, time: Time) -> Self {
        match self {
            MarbleEvent::Start { .. } => MarbleEvent::Start { time },
            MarbleEvent::Closed { .. } => MarbleEvent::Closed { time },
            MarbleEvent::Value(event) => MarbleEvent::value(time, event.value),
            untimed @ (MarbleEvent::Noop | MarbleEvent::Move { .. }) => untimed,
        }
    }
}
