//! Count-up stats - progress numbers that climb to their target
//!
//! Once a section reveals, its progress figures count up from zero on an
//! interval clock: each tick adds a fixed step until the target is reached,
//! then the counter unsubscribes itself.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::config::CountUpConfig;
use crate::events::TickSource;
use crate::types::Cleanup;

struct CountUpInner {
    target: f64,
    step: f64,
    subscription: Option<Cleanup>,
}

/// One animated stat value.
pub struct CountUp {
    inner: Rc<RefCell<CountUpInner>>,
    value: Signal<f64>,
}

impl CountUp {
    pub fn new(target: f64, config: &CountUpConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CountUpInner {
                target,
                step: config.step,
                subscription: None,
            })),
            value: signal(0.0),
        }
    }

    /// Start counting on `clock`. Does nothing if running or complete.
    pub fn start(&self, clock: &impl TickSource) {
        if self.is_running() || self.is_complete() {
            return;
        }

        let (target, step) = {
            let inner = self.inner.borrow();
            (inner.target, inner.step)
        };
        // Non-positive targets or steps would never converge
        if target <= 0.0 || step <= 0.0 {
            self.value.set(target);
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let value = self.value.clone();
        let cleanup = clock.subscribe_tick(Box::new(move |_| step_once(&weak, &value)));
        self.inner.borrow_mut().subscription = Some(cleanup);
    }

    /// Stop counting, keeping the current value. Idempotent.
    pub fn stop(&self) {
        let cleanup = self.inner.borrow_mut().subscription.take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn target(&self) -> f64 {
        self.inner.borrow().target
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().subscription.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.value.get() == self.inner.borrow().target
    }

    pub fn value_signal(&self) -> Signal<f64> {
        self.value.clone()
    }
}

impl Drop for CountUp {
    fn drop(&mut self) {
        self.stop();
    }
}

fn step_once(inner: &Weak<RefCell<CountUpInner>>, value: &Signal<f64>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let (next, finished) = {
        let state = inner.borrow();
        if state.subscription.is_none() {
            return;
        }
        let next = value.get() + state.step;
        if next >= state.target {
            (state.target, true)
        } else {
            (next, false)
        }
    };

    // Effects on the value run synchronously and may call back in
    value.set(next);

    if finished {
        let cleanup = inner.borrow_mut().subscription.take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
        tracing::trace!(target_value = inner.borrow().target, "count-up complete");
    }
}
