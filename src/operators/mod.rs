// Copyright (c) 2025 - Cowboy AI, Inc.

//! Marble Combinators
//!
//! Concrete combinators built on the synchronization engine.
//!
//! # Available Operators
//!
//! - [`map`] / [`try_map`] - compute one value per instant from the values
//!   that fired in it
//! - [`identity`] - forward every input event unchanged
//! - [`delay`] - shift timed events later, clamped to the operator's bounds
//!
//! # Example
//!
//! ```rust,ignore
//! use marble_engine::operators::map;
//!
//! let sum = map(
//!     |values: &[Option<i32>]| values.iter().flatten().sum::<i32>(),
//!     OperatorOptions::new(inputs, scheduler),
//! );
//! ```

pub mod delay;
pub mod identity;
pub mod map;

pub use delay::{delay, DelayCombinator};
pub use identity::{identity, IdentityCombinator};
pub use map::{map, try_map, MapCombinator};
