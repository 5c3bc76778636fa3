// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Harness for Marble Operators
//!
//! Building blocks for exercising operators without a real host:
//!
//! - [`EmittableSource`] / [`EmittableTimeline`] - inputs that emit on demand
//!   and count how often they were subscribed and cancelled
//! - [`Recorder`] - a subscriber collecting every event it receives
//! - [`OperatorTester`] - wires named timeline inputs into an operator, emits
//!   per-input event lists in time order, drains the scheduler, and checks
//!   the output
//!
//! # Example
//!
//! ```rust,ignore
//! let mut tester = OperatorTester::new(&["letters", "numbers"], TesterOptions::default(), |inputs, scheduler| {
//!     map(
//!         |values: &[Option<String>]| values.iter().flatten().cloned().collect::<String>(),
//!         OperatorOptions::new(inputs, scheduler),
//!     )
//! });
//!
//! tester.emit_inputs(vec![
//!     ("letters", vec![MarbleEvent::value(10, "a".into())]),
//!     ("numbers", vec![MarbleEvent::value(10, "1".into())]),
//! ])?;
//!
//! tester.expect_output(&[MarbleEvent::value(10, "a1".into())]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use tracing::debug;

use crate::cancellable::{Cancellable, FnCancellable};
use crate::errors::MarbleResult;
use crate::event::{MarbleEvent, Time, ValueEvent};
use crate::input::MarbleInput;
use crate::operator::{group_by_instant, EventRecord, MarbleOperator};
use crate::scheduler::{QueueScheduler, Scheduler};
use crate::source::{Callback, MarbleSource, SourceCallback, SourceMetadata, Subscribable};
use crate::timeline::{Bounds, MarbleTimeline, MarbleTimelineInput};

struct EmitterState<T> {
    metadata: SourceMetadata,
    callbacks: RefCell<Vec<(u64, SourceCallback<T>)>>,
    next_id: Cell<u64>,
    subscribes: Cell<usize>,
    cancels: Cell<usize>,
}

/// Source emitting whatever the test tells it to
///
/// Cloning yields another handle to the same source.
pub struct EmittableSource<T> {
    state: Rc<EmitterState<T>>,
}

impl<T> Clone for EmittableSource<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: 'static> EmittableSource<T> {
    /// Source with a display name
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_metadata(SourceMetadata::named(name))
    }

    /// Source with full metadata
    pub fn with_metadata(metadata: SourceMetadata) -> Self {
        Self {
            state: Rc::new(EmitterState {
                metadata,
                callbacks: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                subscribes: Cell::new(0),
                cancels: Cell::new(0),
            }),
        }
    }

    /// Push `event` to every current subscriber, in subscription order
    pub fn emit(&self, event: MarbleEvent<T>) {
        let callbacks: Vec<SourceCallback<T>> = self
            .state
            .callbacks
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&event);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.state.callbacks.borrow().len()
    }

    /// Number of `subscribe` calls so far
    pub fn subscribe_count(&self) -> usize {
        self.state.subscribes.get()
    }

    /// Number of subscriptions released so far
    pub fn cancel_count(&self) -> usize {
        self.state.cancels.get()
    }
}

impl<T: 'static> Subscribable<MarbleEvent<T>> for EmittableSource<T> {
    fn subscribe(&self, callback: Callback<MarbleEvent<T>>) -> Box<dyn Cancellable> {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state.subscribes.set(self.state.subscribes.get() + 1);
        self.state.callbacks.borrow_mut().push((id, callback));

        let state = Rc::downgrade(&self.state);
        Box::new(FnCancellable::new(move || {
            if let Some(state) = state.upgrade() {
                state.callbacks.borrow_mut().retain(|(cb_id, _)| *cb_id != id);
                state.cancels.set(state.cancels.get() + 1);
            }
        }))
    }
}

impl<T: 'static> MarbleSource<T> for EmittableSource<T> {
    fn name(&self) -> &str {
        &self.state.metadata.name
    }

    fn kind(&self) -> &str {
        &self.state.metadata.kind
    }

    fn description(&self) -> &str {
        &self.state.metadata.description
    }
}

/// Emittable source with adjustable bounds
pub struct EmittableTimeline<T> {
    source: EmittableSource<T>,
    bounds: Rc<Cell<Bounds>>,
}

impl<T> Clone for EmittableTimeline<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            bounds: Rc::clone(&self.bounds),
        }
    }
}

impl<T: 'static> EmittableTimeline<T> {
    /// Timeline with a display name and window
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self::with_metadata(SourceMetadata::named(name), bounds)
    }

    /// Timeline with full metadata
    pub fn with_metadata(metadata: SourceMetadata, bounds: Bounds) -> Self {
        Self {
            source: EmittableSource::with_metadata(metadata),
            bounds: Rc::new(Cell::new(bounds)),
        }
    }

    /// Replace the window reported from now on
    pub fn set_bounds(&self, bounds: Bounds) {
        self.bounds.set(bounds);
    }

    /// Push `event` to every current subscriber
    pub fn emit(&self, event: MarbleEvent<T>) {
        self.source.emit(event);
    }

    /// The underlying emittable source
    pub fn source(&self) -> &EmittableSource<T> {
        &self.source
    }
}

impl<T: 'static> Subscribable<MarbleEvent<T>> for EmittableTimeline<T> {
    fn subscribe(&self, callback: Callback<MarbleEvent<T>>) -> Box<dyn Cancellable> {
        self.source.subscribe(callback)
    }
}

impl<T: 'static> MarbleSource<T> for EmittableTimeline<T> {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn kind(&self) -> &str {
        self.source.kind()
    }

    fn description(&self) -> &str {
        self.source.description()
    }
}

impl<T: 'static> MarbleTimeline<T> for EmittableTimeline<T> {
    fn bounds(&self) -> Bounds {
        self.bounds.get()
    }
}

impl<T: 'static> MarbleTimelineInput<T> for EmittableTimeline<T> {
    fn move_event(&self, event: ValueEvent<T>, time: Time) {
        let old_time = event.time;
        self.emit(MarbleEvent::moved(ValueEvent::new(time, event.value), old_time));
    }
}

/// Subscriber collecting every event it receives
///
/// Cloning yields another handle to the same log.
pub struct Recorder<T> {
    events: Rc<RefCell<Vec<MarbleEvent<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> Recorder<T> {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback appending to this recorder
    pub fn callback(&self) -> SourceCallback<T> {
        let events = Rc::clone(&self.events);
        Rc::new(move |event: &MarbleEvent<T>| events.borrow_mut().push(event.clone()))
    }

    /// Events recorded so far
    pub fn events(&self) -> Vec<MarbleEvent<T>> {
        self.events.borrow().clone()
    }

    /// Number of events recorded so far
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Remove and return the recorded events
    pub fn take(&self) -> Vec<MarbleEvent<T>> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

/// Settings of an [`OperatorTester`]
#[derive(Debug, Clone, Default)]
pub struct TesterOptions {
    /// Fixed input window; when `None` the window ends at the latest emitted time
    pub bounds: Option<Bounds>,
    /// Keep the subscription alive after `expect_output`
    pub no_dispose_after_expect: bool,
    /// Log emitted and received events at debug level
    pub log_events: bool,
}

/// Drives an operator from named, emittable timeline inputs
pub struct OperatorTester<I, O, Op> {
    options: TesterOptions,
    bounds: Bounds,
    inputs: Vec<(String, EmittableTimeline<I>)>,
    operator: Op,
    scheduler: QueueScheduler,
    recorder: Recorder<O>,
    subscription: Option<Box<dyn Cancellable>>,
}

impl<I, O, Op> OperatorTester<I, O, Op>
where
    I: Clone + Debug + 'static,
    O: Clone + Debug + PartialEq + 'static,
    Op: MarbleOperator<I, O>,
{
    /// Build an operator over one timeline per name
    pub fn new<F>(names: &[&str], options: TesterOptions, factory: F) -> Self
    where
        F: FnOnce(Vec<MarbleInput<I>>, Rc<dyn Scheduler>) -> Op,
    {
        let bounds = options.bounds.unwrap_or(Bounds::DEFAULT);
        let inputs: Vec<(String, EmittableTimeline<I>)> = names
            .iter()
            .map(|name| (name.to_string(), EmittableTimeline::new(*name, bounds)))
            .collect();

        let scheduler = QueueScheduler::new();
        let operator = factory(
            inputs
                .iter()
                .map(|(_, input)| MarbleInput::timeline(input.clone()))
                .collect(),
            Rc::new(scheduler.clone()),
        );

        Self {
            options,
            bounds,
            inputs,
            operator,
            scheduler,
            recorder: Recorder::new(),
            subscription: None,
        }
    }

    /// Emit each input's events, merged in time order, then drain the scheduler
    ///
    /// Subscribes to the operator on first use. Names that match no input are
    /// ignored.
    pub fn emit_inputs(&mut self, events: Vec<(&str, Vec<MarbleEvent<I>>)>) -> MarbleResult<()> {
        self.init_operator();

        let records: Vec<EventRecord<I>> = events
            .into_iter()
            .filter_map(|(name, events)| {
                self.input_index(name)
                    .map(|index| events.into_iter().map(move |e| EventRecord::new(index, e)))
            })
            .flatten()
            .collect();

        self.update_bounds(records.iter().filter_map(|r| r.event.time()).max());

        let ordered: Vec<EventRecord<I>> = group_by_instant(records).into_iter().flatten().collect();
        if self.options.log_events {
            debug!(count = ordered.len(), events = ?ordered, "Emitting input events");
        }

        for record in ordered {
            self.inputs[record.input].1.emit(record.event);
        }

        self.scheduler.run_until_idle().map(|_| ())
    }

    /// Assert every expected event is among the outputs
    ///
    /// Disposes the subscription afterwards unless configured otherwise.
    pub fn expect_output(&mut self, expected: &[MarbleEvent<O>]) {
        let actual = self.recorder.events();
        if self.options.log_events {
            debug!(expected = ?expected, actual = ?actual, "Comparing output events");
        }

        for event in expected {
            assert!(
                actual.contains(event),
                "expected output {:?} not found in {:?}",
                event,
                actual
            );
        }

        if !self.options.no_dispose_after_expect {
            self.dispose();
        }
    }

    /// Events the operator produced so far
    pub fn output(&self) -> Vec<MarbleEvent<O>> {
        self.recorder.events()
    }

    /// Input registered under `name`
    pub fn input(&self, name: &str) -> Option<&EmittableTimeline<I>> {
        self.input_index(name).map(|index| &self.inputs[index].1)
    }

    /// The operator under test
    pub fn operator(&self) -> &Op {
        &self.operator
    }

    /// The scheduler running the operator's flushes
    pub fn scheduler(&self) -> &QueueScheduler {
        &self.scheduler
    }

    /// Window currently reported by the inputs
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Release the subscription to the operator
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    fn init_operator(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.operator.subscribe(self.recorder.callback()));
        }
    }

    fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|(input, _)| input == name)
    }

    fn update_bounds(&mut self, latest: Option<Time>) {
        if self.options.bounds.is_some() {
            return;
        }
        if let Some(end) = latest {
            self.bounds = Bounds::new(self.bounds.start, end);
            for (_, input) in &self.inputs {
                input.set_bounds(self.bounds);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emittable_source_counts_subscriptions() {
        let source = EmittableSource::<i32>::new("numbers");
        let recorder = Recorder::new();

        let sub = source.subscribe(recorder.callback());
        source.emit(MarbleEvent::value(1, 7));
        sub.cancel();
        sub.cancel();
        source.emit(MarbleEvent::value(2, 8));

        assert_eq!(recorder.events(), vec![MarbleEvent::value(1, 7)]);
        assert_eq!(source.subscribe_count(), 1);
        assert_eq!(source.cancel_count(), 1);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_timeline_move_event() {
        let timeline = EmittableTimeline::new("letters", Bounds::new(0, 50));
        let recorder = Recorder::new();
        let _sub = timeline.subscribe(recorder.callback());

        timeline.move_event(ValueEvent::new(10, "a"), 30);

        assert_eq!(
            recorder.events(),
            vec![MarbleEvent::moved(ValueEvent::new(30, "a"), 10)]
        );
        assert_eq!(timeline.bounds(), Bounds::new(0, 50));
    }

    #[test]
    fn test_recorder_take_empties() {
        let recorder = Recorder::<i32>::new();
        (recorder.callback())(&MarbleEvent::Noop);
        assert_eq!(recorder.take(), vec![MarbleEvent::Noop]);
        assert!(recorder.is_empty());
    }
}
