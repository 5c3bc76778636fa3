// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime adapter
//!
//! A runtime bundles an operator with the inputs and the output a host
//! (such as a [`Renderer`](crate::renderer::Renderer)) should observe.

use crate::input::MarbleInput;
use crate::operator::{MarbleOperator, SyncOperator};

/// What a host needs to observe one operator
pub trait MarbleRuntime<I, O> {
    type Operator: MarbleOperator<I, O> + 'static;

    /// The operator being run
    fn operator(&self) -> &Self::Operator;

    /// Inputs feeding the operator, in order
    fn inputs(&self) -> &[MarbleInput<I>] {
        self.operator().inputs()
    }

    /// Timeline carrying the operator's output
    fn output(&self) -> MarbleInput<O>;
}

/// Runtime whose output is the operator itself
#[derive(Debug, Clone)]
pub struct BasicRuntime<I, O> {
    operator: SyncOperator<I, O>,
}

impl<I: Clone + 'static, O: 'static> BasicRuntime<I, O> {
    pub fn new(operator: SyncOperator<I, O>) -> Self {
        Self { operator }
    }
}

impl<I: Clone + 'static, O: 'static> MarbleRuntime<I, O> for BasicRuntime<I, O> {
    type Operator = SyncOperator<I, O>;

    fn operator(&self) -> &SyncOperator<I, O> {
        &self.operator
    }

    fn output(&self) -> MarbleInput<O> {
        self.operator.as_input()
    }
}
