//! Emitter - ordered, re-entrancy safe event dispatch
//!
//! The in-process event source every engine subscribes to. Hosts bridge
//! their real scroll/frame events into an emitter; tests drive one by hand.
//!
//! # Ordering
//!
//! Events are dispatched strictly in arrival order. An `emit` issued from
//! inside a handler is queued and dispatched after the current event has
//! reached every handler, so two events never interleave.
//!
//! # Teardown
//!
//! A handler whose cleanup has run is never invoked again, even when the
//! cleanup runs in the middle of a dispatch.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::types::Cleanup;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

type Handler<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    handlers: Vec<(usize, Handler<E>)>,
    next_id: usize,
    dispatching: bool,
    queue: VecDeque<E>,
}

impl<E> Registry<E> {
    fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
            dispatching: false,
            queue: VecDeque::new(),
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn contains(&self, id: usize) -> bool {
        self.handlers.iter().any(|(hid, _)| *hid == id)
    }
}

/// Clears the dispatching flag when a dispatch ends, including by unwinding
/// out of a panicking handler. Events still queued are delivered by the next
/// `emit`.
struct DispatchGuard<'a, E> {
    registry: &'a RefCell<Registry<E>>,
}

impl<E> Drop for DispatchGuard<'_, E> {
    fn drop(&mut self) {
        if let Ok(mut reg) = self.registry.try_borrow_mut() {
            reg.dispatching = false;
        }
    }
}

// =============================================================================
// EMITTER
// =============================================================================

/// A single-threaded broadcast event source.
///
/// Cloning an emitter yields another handle to the same registry.
pub struct Emitter<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Emitter<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
        }
    }

    /// Register a handler. Returns the cleanup that unregisters it.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Cleanup {
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id();
            reg.handlers.push((id, Rc::new(handler)));
            id
        };

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Box::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().handlers.retain(|(hid, _)| *hid != id);
            }
        })
    }

    /// Dispatch an event to every registered handler.
    pub fn emit(&self, event: E) {
        {
            let mut reg = self.registry.borrow_mut();
            reg.queue.push_back(event);
            if reg.dispatching {
                return;
            }
            reg.dispatching = true;
        }
        let _guard = DispatchGuard {
            registry: &self.registry,
        };

        loop {
            // Snapshot handlers so callbacks may (un)subscribe freely
            let (event, handlers) = {
                let mut reg = self.registry.borrow_mut();
                match reg.queue.pop_front() {
                    Some(event) => (event, reg.handlers.clone()),
                    None => break,
                }
            };

            for (id, handler) in handlers {
                if self.registry.borrow().contains(id) {
                    handler(&event);
                }
            }
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}
