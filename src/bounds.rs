// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounds Strategies
//!
//! A bounds strategy computes the logical time window of an operator from its
//! inputs. Strategies are pure functions of the inputs at call time and are
//! pluggable through [`BoundsStrategy`].
//!
//! # Available Strategies
//!
//! - [`WidestBounds`] - smallest window covering every timeline input (default)
//! - [`IntersectionBounds`] - window shared by every timeline input
//! - [`FirstInputBounds`] - window of the first timeline input
//!
//! Each strategy falls back to its configured default window when no input is
//! a timeline.
//!
//! ```rust,ignore
//! let strategy = WidestBounds::new(Bounds::new(0, 100));
//! // timelines with {1,12}, {4,10}, {3,6}
//! assert_eq!(strategy.bounds(&inputs), Bounds::new(1, 12));
//! ```

use crate::input::MarbleInput;
use crate::timeline::Bounds;

/// Computes a time window from a set of inputs
pub trait BoundsStrategy<T> {
    /// Window for `inputs`
    fn bounds(&self, inputs: &[MarbleInput<T>]) -> Bounds;
}

fn timeline_bounds<T>(inputs: &[MarbleInput<T>]) -> impl Iterator<Item = Bounds> + '_ {
    inputs
        .iter()
        .filter_map(MarbleInput::as_timeline)
        .map(|timeline| timeline.bounds())
}

/// Widest window among timeline inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidestBounds {
    default_bounds: Bounds,
}

impl WidestBounds {
    /// Strategy falling back to `default_bounds`
    pub fn new(default_bounds: Bounds) -> Self {
        Self { default_bounds }
    }
}

impl Default for WidestBounds {
    fn default() -> Self {
        Self::new(Bounds::DEFAULT)
    }
}

impl<T> BoundsStrategy<T> for WidestBounds {
    fn bounds(&self, inputs: &[MarbleInput<T>]) -> Bounds {
        timeline_bounds(inputs)
            .reduce(Bounds::union)
            .unwrap_or(self.default_bounds)
    }
}

/// Window shared by all timeline inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionBounds {
    default_bounds: Bounds,
}

impl IntersectionBounds {
    /// Strategy falling back to `default_bounds`
    pub fn new(default_bounds: Bounds) -> Self {
        Self { default_bounds }
    }
}

impl Default for IntersectionBounds {
    fn default() -> Self {
        Self::new(Bounds::DEFAULT)
    }
}

impl<T> BoundsStrategy<T> for IntersectionBounds {
    fn bounds(&self, inputs: &[MarbleInput<T>]) -> Bounds {
        timeline_bounds(inputs)
            .reduce(Bounds::intersection)
            .unwrap_or(self.default_bounds)
    }
}

/// Window of the first timeline input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstInputBounds {
    default_bounds: Bounds,
}

impl FirstInputBounds {
    /// Strategy falling back to `default_bounds`
    pub fn new(default_bounds: Bounds) -> Self {
        Self { default_bounds }
    }
}

impl Default for FirstInputBounds {
    fn default() -> Self {
        Self::new(Bounds::DEFAULT)
    }
}

impl<T> BoundsStrategy<T> for FirstInputBounds {
    fn bounds(&self, inputs: &[MarbleInput<T>]) -> Bounds {
        timeline_bounds(inputs)
            .next()
            .unwrap_or(self.default_bounds)
    }
}
