// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cancellable resource handles
//!
//! Every subscription returns a [`Cancellable`]. Cancelling is synchronous and
//! idempotent: the second and later calls have no effect.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A resource that can be released
pub trait Cancellable {
    /// Release the resource
    fn cancel(&self);
}

/// Cancellable that runs a closure at most once
pub struct FnCancellable {
    on_cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl FnCancellable {
    /// Wrap `on_cancel` so it runs on the first `cancel()` only
    pub fn new(on_cancel: impl FnOnce() + 'static) -> Self {
        Self {
            on_cancel: RefCell::new(Some(Box::new(on_cancel))),
        }
    }
}

impl Cancellable for FnCancellable {
    fn cancel(&self) {
        let on_cancel = self.on_cancel.borrow_mut().take();
        if let Some(on_cancel) = on_cancel {
            on_cancel();
        }
    }
}

/// Composite handle owning child handles
///
/// Cancelling releases every child exactly once, in insertion order. A child
/// added after the composite was cancelled is released immediately.
#[derive(Default)]
pub struct NestedCancellable {
    children: RefCell<Vec<Box<dyn Cancellable>>>,
    cancelled: Cell<bool>,
}

impl NestedCancellable {
    /// Create an empty composite handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a child handle
    pub fn add(&self, child: Box<dyn Cancellable>) {
        if self.cancelled.get() {
            child.cancel();
            return;
        }
        self.children.borrow_mut().push(child);
    }

    /// Number of children still held
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Whether no children are held
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Whether `cancel()` has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Cancellable for NestedCancellable {
    fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        // Children may re-enter through their own teardown; release the borrow first.
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.cancel();
        }
    }
}

impl<C: Cancellable + ?Sized> Cancellable for Box<C> {
    fn cancel(&self) {
        (**self).cancel()
    }
}

impl<C: Cancellable + ?Sized> Cancellable for Rc<C> {
    fn cancel(&self) {
        (**self).cancel()
    }
}
