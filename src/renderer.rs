// Copyright (c) 2025 - Cowboy AI, Inc.

//! Render Harness
//!
//! A [`Renderer`] observes runtimes and hands every input and output event to
//! a [`RenderSink`]. Each `render` call returns a handle releasing only that
//! runtime's subscriptions; [`Renderer::dispose`] releases everything and
//! retires the renderer.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{debug, info};

use crate::cancellable::{Cancellable, FnCancellable};
use crate::errors::{MarbleError, MarbleResult};
use crate::event::MarbleEvent;
use crate::runtime::MarbleRuntime;
use crate::source::{MarbleSource, Subscribable};

/// Destination of rendered events
pub trait RenderSink<I, O> {
    /// An event emitted by the operator's input named `input`
    fn render_input(&self, operator: &str, input: &str, event: &MarbleEvent<I>);

    /// An event emitted by the operator
    fn render_output(&self, operator: &str, event: &MarbleEvent<O>);
}

/// Sink writing one `info` line per event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl<I: Debug, O: Debug> RenderSink<I, O> for TracingSink {
    fn render_input(&self, operator: &str, input: &str, event: &MarbleEvent<I>) {
        info!(operator, input, event = ?event, "input");
    }

    fn render_output(&self, operator: &str, event: &MarbleEvent<O>) {
        info!(operator, event = ?event, "output");
    }
}

#[derive(Default)]
struct RendererState {
    runtimes: HashMap<u64, Vec<Box<dyn Cancellable>>>,
    next_id: u64,
}

/// Observes runtimes on behalf of a sink
pub struct Renderer<I, O, S> {
    sink: Rc<S>,
    state: Rc<RefCell<RendererState>>,
    disposed: Cell<bool>,
    _events: PhantomData<fn(I, O)>,
}

impl<I, O, S> Renderer<I, O, S>
where
    I: 'static,
    O: 'static,
    S: RenderSink<I, O> + 'static,
{
    pub fn new(sink: S) -> Self {
        Self {
            sink: Rc::new(sink),
            state: Rc::new(RefCell::new(RendererState::default())),
            disposed: Cell::new(false),
            _events: PhantomData,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of runtimes currently rendered
    pub fn runtime_count(&self) -> usize {
        self.state.borrow().runtimes.len()
    }

    /// Subscribe to every input of `runtime` and to its output
    pub fn render<R>(&self, runtime: &R) -> MarbleResult<Box<dyn Cancellable>>
    where
        R: MarbleRuntime<I, O>,
    {
        if self.disposed.get() {
            return Err(MarbleError::RendererDisposed);
        }

        let operator: Rc<str> = Rc::from(runtime.operator().name());
        let mut handles = Vec::with_capacity(runtime.inputs().len() + 1);

        for input in runtime.inputs() {
            let sink = Rc::clone(&self.sink);
            let operator = Rc::clone(&operator);
            let name: Rc<str> = Rc::from(input.name());
            handles.push(input.subscribe(Rc::new(move |event: &MarbleEvent<I>| {
                sink.render_input(&operator, &name, event)
            })));
        }

        let sink = Rc::clone(&self.sink);
        let output_operator = Rc::clone(&operator);
        handles.push(runtime.output().subscribe(Rc::new(move |event: &MarbleEvent<O>| {
            sink.render_output(&output_operator, event)
        })));

        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.runtimes.insert(id, handles);
            id
        };
        debug!(operator = %operator, runtime = id, "Rendering runtime");

        let state = Rc::downgrade(&self.state);
        Ok(Box::new(FnCancellable::new(move || {
            let released = state
                .upgrade()
                .and_then(|state| state.borrow_mut().runtimes.remove(&id));
            if let Some(handles) = released {
                debug!(runtime = id, "Releasing rendered runtime");
                for handle in handles {
                    handle.cancel();
                }
            }
        })))
    }

    /// Release every runtime; later `render` calls fail
    pub fn dispose(&self) {
        self.disposed.set(true);
        let released: Vec<_> = self.state.borrow_mut().runtimes.drain().collect();
        debug!(runtimes = released.len(), "Disposing renderer");
        for (_, handles) in released {
            for handle in handles {
                handle.cancel();
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}
