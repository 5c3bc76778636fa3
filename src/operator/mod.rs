// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operator Synchronization Engine
//!
//! An operator observes N independently timed inputs, reconstitutes which of
//! them fired in the same logical instant, and invokes its [`Combinator`]
//! exactly once per instant. To its own subscribers an operator is just
//! another timeline, so operators chain.
//!
//! # Architecture
//!
//! ```text
//!  input 0 ──┐                      ┌─────────────┐
//!  input 1 ──┼─> ingest ─> buffer ─>│ flush       │─> combine per instant ─> fan-out
//!  input N ──┘      │               │ (deferred)  │                            │
//!                   └─ schedule ───>└─────────────┘            subscriber 0..M ┘
//! ```
//!
//! # Lifecycle
//!
//! - Lazy: inputs are subscribed when the first subscriber arrives
//! - Reference counted: inputs are released when the last subscriber cancels
//! - Re-subscribing after teardown starts from a fresh, empty activation
//!
//! # Semantics
//!
//! Each combine call sees only what fired in that exact instant. Inputs that
//! stayed silent are `None` in the argument vector; there is no memory of a
//! previously seen value.
//!
//! A combinator failure is terminal for the flush it happens in: later groups
//! of that flush are not combined, none of the flush's outputs are delivered,
//! and the error is returned to whoever runs the scheduler. The buffer is
//! already drained at that point, so later flushes are unaffected.
//!
//! ```rust,ignore
//! let scheduler = QueueScheduler::new();
//! let operator = SyncOperator::new(
//!     IdentityCombinator,
//!     OperatorOptions::new(vec![MarbleInput::timeline(input.clone())], Rc::new(scheduler.clone())),
//! );
//!
//! let sub = operator.subscribe(Rc::new(|event: &MarbleEvent<i32>| println!("{:?}", event)));
//! input.emit(MarbleEvent::value(10, 1));
//! scheduler.run_until_idle()?;
//! sub.cancel();
//! ```

pub mod grouping;

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::bounds::BoundsStrategy;
use crate::cancellable::{Cancellable, NestedCancellable};
use crate::config::OperatorOptions;
use crate::errors::{MarbleError, MarbleResult};
use crate::event::MarbleEvent;
use crate::input::MarbleInput;
use crate::scheduler::Scheduler;
use crate::source::{Callback, MarbleSource, SourceCallback, SourceMetadata, Subscribable};
use crate::timeline::{Bounds, MarbleTimeline};

pub use grouping::{group_by_instant, to_arguments, ArgumentVector, EventRecord};

/// Combining function driven once per instant
pub trait Combinator<I, O> {
    /// Combine the events that fired in one instant
    ///
    /// `events` is positional: slot `i` holds what input `i` emitted in this
    /// instant, or `None`. Trailing silent inputs are omitted. `bounds` is the
    /// operator's memoized window.
    fn combine(&self, events: &[Option<MarbleEvent<I>>], bounds: Bounds)
        -> MarbleResult<Vec<MarbleEvent<O>>>;

    /// Display name
    fn name(&self) -> &str;

    /// Type signature label
    fn kind(&self) -> &str {
        ""
    }

    /// Human readable description
    fn description(&self) -> &str {
        ""
    }
}

/// A timeline derived from ordered inputs
pub trait MarbleOperator<I, O>: MarbleTimeline<O> {
    /// The inputs, unchanged for the operator's lifetime
    fn inputs(&self) -> &[MarbleInput<I>];
}

struct Subscriber<O> {
    callback: SourceCallback<O>,
    active: Cell<bool>,
}

/// Buffered state of one activation, dropped at teardown
struct Activation<I> {
    generation: u64,
    upstream: Rc<NestedCancellable>,
    pending: Vec<EventRecord<I>>,
    flush_scheduled: bool,
}

struct OperatorState<I, O> {
    subscribers: Vec<Rc<Subscriber<O>>>,
    activation: Option<Activation<I>>,
    generations: u64,
}

struct OperatorCore<I, O> {
    metadata: SourceMetadata,
    inputs: Vec<MarbleInput<I>>,
    combinator: Box<dyn Combinator<I, O>>,
    bounds_strategy: Rc<dyn BoundsStrategy<I>>,
    scheduler: Rc<dyn Scheduler>,
    bounds: OnceCell<Bounds>,
    state: RefCell<OperatorState<I, O>>,
}

/// The synchronization engine
///
/// Cloning yields another handle to the same operator.
pub struct SyncOperator<I, O> {
    core: Rc<OperatorCore<I, O>>,
}

impl<I, O> Clone for SyncOperator<I, O> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<I: Clone + 'static, O: 'static> SyncOperator<I, O> {
    /// Create an operator driving `combinator` over `options.inputs`
    pub fn new(combinator: impl Combinator<I, O> + 'static, options: OperatorOptions<I>) -> Self {
        let bounds_strategy = options.resolve_bounds_strategy();
        let config = options.config;
        let metadata = SourceMetadata {
            name: config.name.unwrap_or_else(|| combinator.name().to_string()),
            kind: config.kind.unwrap_or_else(|| combinator.kind().to_string()),
            description: config
                .description
                .unwrap_or_else(|| combinator.description().to_string()),
        };

        Self {
            core: Rc::new(OperatorCore {
                metadata,
                inputs: options.inputs,
                combinator: Box::new(combinator),
                bounds_strategy,
                scheduler: options.scheduler,
                bounds: OnceCell::new(),
                state: RefCell::new(OperatorState {
                    subscribers: Vec::new(),
                    activation: None,
                    generations: 0,
                }),
            }),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.core.state.borrow().subscribers.len()
    }

    /// Whether the inputs are currently subscribed
    pub fn is_active(&self) -> bool {
        self.core.state.borrow().activation.is_some()
    }

    /// Number of records waiting for the next flush
    pub fn pending_records(&self) -> usize {
        self.core
            .state
            .borrow()
            .activation
            .as_ref()
            .map_or(0, |activation| activation.pending.len())
    }

    /// Wrap this operator as an input of another operator
    pub fn as_input(&self) -> MarbleInput<O> {
        MarbleInput::Timeline(Rc::new(self.clone()))
    }
}

impl<I: Clone + 'static, O: 'static> OperatorCore<I, O> {
    fn bounds(&self) -> Bounds {
        *self
            .bounds
            .get_or_init(|| self.bounds_strategy.bounds(&self.inputs))
    }

    fn subscribe(self: &Rc<Self>, callback: SourceCallback<O>) -> OperatorSubscription<I, O> {
        let subscriber = Rc::new(Subscriber {
            callback,
            active: Cell::new(true),
        });

        let activation = {
            let mut state = self.state.borrow_mut();
            state.subscribers.push(Rc::clone(&subscriber));
            if state.activation.is_none() {
                state.generations += 1;
                let upstream = Rc::new(NestedCancellable::new());
                state.activation = Some(Activation {
                    generation: state.generations,
                    upstream: Rc::clone(&upstream),
                    pending: Vec::new(),
                    flush_scheduled: false,
                });
                Some((state.generations, upstream))
            } else {
                None
            }
        };

        // Inputs may emit synchronously while being subscribed; the
        // activation already exists so those events are buffered.
        if let Some((generation, upstream)) = activation {
            debug!(
                operator = %self.metadata.name,
                inputs = self.inputs.len(),
                generation,
                "Activating operator"
            );
            self.subscribe_inputs(generation, &upstream);
        }

        OperatorSubscription {
            core: Rc::clone(self),
            subscriber,
            cancelled: Cell::new(false),
        }
    }

    fn subscribe_inputs(self: &Rc<Self>, generation: u64, upstream: &NestedCancellable) {
        for (index, input) in self.inputs.iter().enumerate() {
            let core = Rc::downgrade(self);
            let on_event: Callback<MarbleEvent<I>> = Rc::new(move |event: &MarbleEvent<I>| {
                if let Some(core) = core.upgrade() {
                    core.ingest(generation, index, event.clone());
                }
            });
            upstream.add(input.subscribe(on_event));
        }
    }

    fn ingest(self: &Rc<Self>, generation: u64, input: usize, event: MarbleEvent<I>) {
        let schedule = {
            let mut state = self.state.borrow_mut();
            let activation = match state.activation.as_mut() {
                Some(activation) if activation.generation == generation => activation,
                _ => return,
            };
            trace!(operator = %self.metadata.name, input, kind = ?event.kind(), "Ingested event");
            activation.pending.push(EventRecord::new(input, event));
            !std::mem::replace(&mut activation.flush_scheduled, true)
        };

        if schedule {
            let core = Rc::downgrade(self);
            self.scheduler.schedule(Box::new(move || match core.upgrade() {
                Some(core) => core.flush(generation),
                None => Ok(()),
            }));
        }
    }

    fn flush(&self, generation: u64) -> MarbleResult<()> {
        let records = {
            let mut state = self.state.borrow_mut();
            match state.activation.as_mut() {
                Some(activation) if activation.generation == generation => {
                    activation.flush_scheduled = false;
                    std::mem::take(&mut activation.pending)
                }
                _ => return Ok(()),
            }
        };

        let record_count = records.len();
        let groups = group_by_instant(records);
        let group_count = groups.len();
        let bounds = self.bounds();

        let mut outputs = Vec::new();
        for group in groups {
            let args = to_arguments(group);
            match self.combinator.combine(&args, bounds) {
                Ok(events) => outputs.extend(events),
                Err(e) => {
                    warn!(
                        operator = %self.metadata.name,
                        error = %e,
                        "Combinator failed; abandoning flush"
                    );
                    return Err(match e {
                        combine @ MarbleError::Combine { .. } => combine,
                        other => MarbleError::combine(&self.metadata.name, other.to_string()),
                    });
                }
            }
        }

        debug!(
            operator = %self.metadata.name,
            records = record_count,
            groups = group_count,
            outputs = outputs.len(),
            "Flushed batch"
        );

        for event in &outputs {
            let subscribers = self.state.borrow().subscribers.clone();
            for subscriber in subscribers {
                if subscriber.active.get() {
                    (subscriber.callback)(event);
                }
            }
        }

        Ok(())
    }

    fn unsubscribe(&self, subscriber: &Rc<Subscriber<O>>) {
        let released = {
            let mut state = self.state.borrow_mut();
            state.subscribers.retain(|s| !Rc::ptr_eq(s, subscriber));
            if state.subscribers.is_empty() {
                state.activation.take()
            } else {
                None
            }
        };

        if let Some(activation) = released {
            debug!(
                operator = %self.metadata.name,
                generation = activation.generation,
                discarded = activation.pending.len(),
                "Tearing down operator"
            );
            activation.upstream.cancel();
        }
    }
}

/// Handle returned by [`SyncOperator::subscribe`]
///
/// Keeps the operator alive until cancelled or dropped.
struct OperatorSubscription<I, O> {
    core: Rc<OperatorCore<I, O>>,
    subscriber: Rc<Subscriber<O>>,
    cancelled: Cell<bool>,
}

impl<I: Clone + 'static, O: 'static> Cancellable for OperatorSubscription<I, O> {
    fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        self.subscriber.active.set(false);
        self.core.unsubscribe(&self.subscriber);
    }
}

impl<I: Clone + 'static, O: 'static> Subscribable<MarbleEvent<O>> for SyncOperator<I, O> {
    fn subscribe(&self, callback: Callback<MarbleEvent<O>>) -> Box<dyn Cancellable> {
        Box::new(self.core.subscribe(callback))
    }
}

impl<I: Clone + 'static, O: 'static> MarbleSource<O> for SyncOperator<I, O> {
    fn name(&self) -> &str {
        &self.core.metadata.name
    }

    fn kind(&self) -> &str {
        &self.core.metadata.kind
    }

    fn description(&self) -> &str {
        &self.core.metadata.description
    }
}

impl<I: Clone + 'static, O: 'static> MarbleTimeline<O> for SyncOperator<I, O> {
    fn bounds(&self) -> Bounds {
        self.core.bounds()
    }
}

impl<I: Clone + 'static, O: 'static> MarbleOperator<I, O> for SyncOperator<I, O> {
    fn inputs(&self) -> &[MarbleInput<I>] {
        &self.core.inputs
    }
}

impl<I, O> fmt::Debug for SyncOperator<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOperator")
            .field("name", &self.core.metadata.name)
            .field("inputs", &self.core.inputs)
            .finish()
    }
}
