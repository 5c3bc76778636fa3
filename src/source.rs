// Copyright (c) 2025 - Cowboy AI, Inc.

//! Push-based sources of marble events
//!
//! A [`Subscribable`] pushes values to registered callbacks until the returned
//! [`Cancellable`] is cancelled. A [`MarbleSource`] is a subscribable stream of
//! [`MarbleEvent`]s with descriptive metadata.
//!
//! ```rust,ignore
//! let sub = source.subscribe(Rc::new(|event: &MarbleEvent<i32>| {
//!     println!("{:?}", event);
//! }));
//!
//! // ... later
//! sub.cancel();
//! ```

use std::rc::Rc;

use crate::cancellable::Cancellable;
use crate::event::MarbleEvent;

/// Callback registered with a [`Subscribable`]
pub type Callback<T> = Rc<dyn Fn(&T)>;

/// Callback receiving marble events of payload `T`
pub type SourceCallback<T> = Callback<MarbleEvent<T>>;

/// Push-based observation
///
/// Each call to `subscribe` creates an independent subscription; cancelling
/// one never affects another.
pub trait Subscribable<T> {
    /// Register `callback` for every future value
    fn subscribe(&self, callback: Callback<T>) -> Box<dyn Cancellable>;
}

/// A stream of marble events with descriptive metadata
pub trait MarbleSource<T>: Subscribable<MarbleEvent<T>> {
    /// Display name
    fn name(&self) -> &str;

    /// Type signature label, e.g. `"(a) => (delayed) a"`
    fn kind(&self) -> &str;

    /// Human readable description
    fn description(&self) -> &str;
}

/// Descriptive metadata shared by sources and operators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: String,
    pub kind: String,
    pub description: String,
}

impl SourceMetadata {
    /// Metadata with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the type signature label
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
