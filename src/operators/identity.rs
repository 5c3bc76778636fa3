// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identity combinator: forwards every event of an instant unchanged,
//! in input order.

use crate::config::OperatorOptions;
use crate::errors::MarbleResult;
use crate::event::MarbleEvent;
use crate::operator::{Combinator, SyncOperator};
use crate::timeline::Bounds;

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCombinator;

impl<T: Clone> Combinator<T, T> for IdentityCombinator {
    fn combine(
        &self,
        events: &[Option<MarbleEvent<T>>],
        _bounds: Bounds,
    ) -> MarbleResult<Vec<MarbleEvent<T>>> {
        Ok(events.iter().flatten().cloned().collect())
    }

    fn name(&self) -> &str {
        "identity"
    }

    fn kind(&self) -> &str {
        "(a) => a"
    }

    fn description(&self) -> &str {
        "Forwards input events unchanged"
    }
}

pub fn identity<T: Clone + 'static>(options: OperatorOptions<T>) -> SyncOperator<T, T> {
    SyncOperator::new(IdentityCombinator, options)
}
