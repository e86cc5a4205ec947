//! Viewport - element registry and visible-fraction reporting
//!
//! Stands in for the host's intersection primitive. Elements are mounted to
//! obtain an [`ElementId`]; observers receive the visible fraction of their
//! element each time the host reports it.
//!
//! Unmounting an element silently releases every observation of it. Reports
//! for elements that are no longer mounted are ignored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::types::{Cleanup, ElementId};

type FractionHandler = Rc<dyn Fn(f64)>;

#[derive(Default)]
struct ViewportInner {
    next_element: u64,
    next_handler: usize,
    observers: HashMap<ElementId, Vec<(usize, FractionHandler)>>,
}

/// Registry of observable elements.
#[derive(Clone, Default)]
pub struct Viewport {
    inner: Rc<RefCell<ViewportInner>>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new element and return its handle.
    pub fn mount_element(&self) -> ElementId {
        let mut inner = self.inner.borrow_mut();
        let id = ElementId(inner.next_element);
        inner.next_element += 1;
        inner.observers.insert(id, Vec::new());
        id
    }

    /// Remove an element, releasing all of its observations.
    ///
    /// Returns `false` if the element was not mounted.
    pub fn unmount_element(&self, element: ElementId) -> bool {
        let removed = self.inner.borrow_mut().observers.remove(&element);
        if let Some(observers) = &removed {
            tracing::debug!(%element, released = observers.len(), "element unmounted");
        }
        removed.is_some()
    }

    pub fn is_mounted(&self, element: ElementId) -> bool {
        self.inner.borrow().observers.contains_key(&element)
    }

    /// Observe the visible fraction of `element`.
    ///
    /// Fails with [`Error::DetachedTarget`] if the element is not mounted.
    pub fn observe(&self, element: ElementId, handler: impl Fn(f64) + 'static) -> Result<Cleanup> {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_handler;
            let list = inner
                .observers
                .get_mut(&element)
                .ok_or(Error::DetachedTarget(element))?;
            list.push((id, Rc::new(handler)));
            inner.next_handler += 1;
            id
        };

        let weak: Weak<RefCell<ViewportInner>> = Rc::downgrade(&self.inner);
        Ok(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Some(list) = inner.borrow_mut().observers.get_mut(&element) {
                    list.retain(|(hid, _)| *hid != id);
                }
            }
        }))
    }

    /// Report the visible fraction of `element` (clamped to `[0, 1]`).
    pub fn report(&self, element: ElementId, fraction: f64) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };

        let handlers = match self.inner.borrow().observers.get(&element) {
            Some(list) => list.clone(),
            None => {
                tracing::trace!(%element, "report for unmounted element ignored");
                return;
            }
        };

        for (id, handler) in handlers {
            if self.is_observing(element, id) {
                handler(fraction);
            }
        }
    }

    /// Number of live observations of `element`.
    pub fn observer_count(&self, element: ElementId) -> usize {
        self.inner
            .borrow()
            .observers
            .get(&element)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    fn is_observing(&self, element: ElementId, id: usize) -> bool {
        self.inner
            .borrow()
            .observers
            .get(&element)
            .map(|list| list.iter().any(|(hid, _)| *hid == id))
            .unwrap_or(false)
    }
}
