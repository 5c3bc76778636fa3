// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deferred Task Schedulers
//!
//! Operators never combine events while an input is emitting. Instead the
//! first ingestion after a flush schedules one deferred task on the operator's
//! [`Scheduler`], and everything ingested before that task runs lands in the
//! same batch.
//!
//! # Architecture
//!
//! ```text
//! input.emit ──> ingest ──> schedule(flush) ──> [ deferred ] ──> flush ──> subscribers
//! input.emit ──> ingest ─┘ (coalesced)
//! ```
//!
//! # Implementations
//!
//! - [`QueueScheduler`] - deterministic FIFO queue drained explicitly by the
//!   host or test (`run_until_idle`)
//! - [`LocalTaskScheduler`] - defers each task onto the current tokio
//!   `LocalSet` with `spawn_local`

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error};

use crate::errors::MarbleResult;

/// A deferred unit of work
pub type Task = Box<dyn FnOnce() -> MarbleResult<()>>;

/// Runs tasks at a later point than the one they were scheduled from
pub trait Scheduler {
    /// Defer `task`; it must not run before this call returns
    fn schedule(&self, task: Task);
}

/// Deterministic FIFO scheduler
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct QueueScheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl QueueScheduler {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Whether no task is queued
    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Run the oldest queued task
    ///
    /// Returns `Ok(false)` when the queue was empty.
    pub fn run_next(&self) -> MarbleResult<bool> {
        // The task may schedule more work; the queue must not stay borrowed.
        let task = self.queue.borrow_mut().pop_front();
        match task {
            Some(task) => task().map(|()| true),
            None => Ok(false),
        }
    }

    /// Run tasks until the queue is empty, including tasks scheduled meanwhile
    ///
    /// Stops at the first failing task and returns its error; tasks queued
    /// behind it stay queued. Returns the number of tasks run.
    pub fn run_until_idle(&self) -> MarbleResult<usize> {
        let mut ran = 0;
        while self.run_next()? {
            ran += 1;
        }
        if ran > 0 {
            debug!(tasks = ran, "Scheduler idle");
        }
        Ok(ran)
    }
}

impl Scheduler for QueueScheduler {
    fn schedule(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }
}

impl fmt::Debug for QueueScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Scheduler deferring tasks onto the current tokio `LocalSet`
///
/// Must be used from within `LocalSet::run_until` (or a task spawned on a
/// `LocalSet`). Task errors are logged at this boundary since there is no
/// caller left to return them to.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTaskScheduler;

impl LocalTaskScheduler {
    /// Create a local task scheduler
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for LocalTaskScheduler {
    fn schedule(&self, task: Task) {
        tokio::task::spawn_local(async move {
            if let Err(e) = task() {
                error!(error = %e, "Deferred marble task failed");
            }
        });
    }
}
