//! Reveal Controller - one-shot "became visible" signal per section
//!
//! Observes the visible fraction of one element and flips a two-state
//! machine from [`RevealPhase::Unrevealed`] to [`RevealPhase::Revealed`] the
//! first time the fraction reaches the threshold. The transition is forward
//! only: after it fires the controller stops observing, so scrolling back
//! and forth never re-triggers the entry animation.
//!
//! Controllers share nothing with each other; each section owns one.
//!
//! # Staged transitions
//!
//! Once a section is revealed its parts animate in one after another.
//! [`Stagger`] gives each part's transition delay so renderers (and tests)
//! can tell which parts have started at a given time since the reveal.
//!
//! # Example
//!
//! ```ignore
//! let viewport = Viewport::new();
//! let el = viewport.mount_element();
//! let reveal = RevealController::attach(&viewport, el, 0.1)?;
//!
//! viewport.report(el, 0.05);
//! assert!(!reveal.is_revealed());
//! viewport.report(el, 0.3);
//! assert!(reveal.is_revealed());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::error::{Error, Result};
use crate::events::IntersectionSource;
use crate::types::{Cleanup, ElementId};

// =============================================================================
// PHASE
// =============================================================================

/// Reveal state machine. The only transition is `Unrevealed -> Revealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    #[default]
    Unrevealed,
    Revealed,
}

/// Whether a visible fraction satisfies a reveal threshold.
///
/// A fully hidden element never reveals, even with a zero threshold.
pub fn crosses_threshold(fraction: f64, threshold: f64) -> bool {
    fraction > 0.0 && fraction >= threshold
}

// =============================================================================
// CONTROLLER
// =============================================================================

struct RevealInner {
    phase: RevealPhase,
    threshold: f64,
    element: ElementId,
    subscription: Option<Cleanup>,
    listeners: Vec<Box<dyn FnOnce()>>,
}

/// One-shot reveal observer for a single element.
pub struct RevealController {
    inner: Rc<RefCell<RevealInner>>,
    revealed: Signal<bool>,
}

impl RevealController {
    /// Start observing `element`, revealing once its visible fraction reaches
    /// `threshold`.
    ///
    /// Fails with [`Error::InvalidThreshold`] outside `[0, 1]`, and with
    /// [`Error::DetachedTarget`] if the element is no longer mounted.
    pub fn attach(
        source: &impl IntersectionSource,
        element: ElementId,
        threshold: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(threshold, "reveal threshold out of range");
            return Err(Error::InvalidThreshold(threshold));
        }

        let inner = Rc::new(RefCell::new(RevealInner {
            phase: RevealPhase::Unrevealed,
            threshold,
            element,
            subscription: None,
            listeners: Vec::new(),
        }));
        let revealed = signal(false);

        let weak = Rc::downgrade(&inner);
        let revealed_signal = revealed.clone();
        let cleanup = source.observe_fraction(
            element,
            Box::new(move |fraction| on_fraction(&weak, &revealed_signal, fraction)),
        )?;
        inner.borrow_mut().subscription = Some(cleanup);

        tracing::trace!(%element, threshold, "reveal attached");
        Ok(Self { inner, revealed })
    }

    /// Stop observing without revealing. Idempotent.
    pub fn detach(&self) {
        let cleanup = self.inner.borrow_mut().subscription.take();
        if let Some(cleanup) = cleanup {
            cleanup();
            tracing::trace!(element = %self.element(), "reveal detached");
        }
    }

    /// Run `listener` once when the element reveals.
    ///
    /// Runs immediately if the reveal already happened.
    pub fn on_reveal(&self, listener: impl FnOnce() + 'static) {
        let mut inner = self.inner.borrow_mut();
        if inner.phase == RevealPhase::Revealed {
            drop(inner);
            listener();
        } else {
            inner.listeners.push(Box::new(listener));
        }
    }

    /// Reveal now, regardless of visibility (timed entries).
    ///
    /// Does nothing once revealed or detached. Returns whether this call
    /// performed the reveal.
    pub fn reveal(&self) -> bool {
        reveal_now(&self.inner, &self.revealed, None)
    }

    pub fn phase(&self) -> RevealPhase {
        self.inner.borrow().phase
    }

    pub fn is_revealed(&self) -> bool {
        self.phase() == RevealPhase::Revealed
    }

    /// Still waiting for the threshold (attached and not yet revealed).
    pub fn is_observing(&self) -> bool {
        self.inner.borrow().subscription.is_some()
    }

    pub fn threshold(&self) -> f64 {
        self.inner.borrow().threshold
    }

    pub fn element(&self) -> ElementId {
        self.inner.borrow().element
    }

    /// Reactive revealed flag for section renderers.
    pub fn revealed_signal(&self) -> Signal<bool> {
        self.revealed.clone()
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.detach();
    }
}

fn on_fraction(inner: &Weak<RefCell<RevealInner>>, revealed: &Signal<bool>, fraction: f64) {
    // Controller already dropped: stale callback
    let Some(inner) = inner.upgrade() else {
        return;
    };
    reveal_now(&inner, revealed, Some(fraction));
}

fn reveal_now(
    inner: &RefCell<RevealInner>,
    revealed: &Signal<bool>,
    fraction: Option<f64>,
) -> bool {
    let (cleanup, listeners, element) = {
        let mut state = inner.borrow_mut();
        if state.phase == RevealPhase::Revealed || state.subscription.is_none() {
            return false;
        }
        if let Some(fraction) = fraction {
            if !crosses_threshold(fraction, state.threshold) {
                return false;
            }
        }
        state.phase = RevealPhase::Revealed;
        (
            state.subscription.take(),
            std::mem::take(&mut state.listeners),
            state.element,
        )
    };

    tracing::debug!(%element, ?fraction, "revealed");
    revealed.set(true);

    if let Some(cleanup) = cleanup {
        cleanup();
    }
    for listener in listeners {
        listener();
    }
    true
}

// =============================================================================
// STAGGER
// =============================================================================

/// Transition delays for the staged parts of a revealed section.
///
/// Part `i` starts its transition `base_ms + i * step_ms` after the reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stagger {
    pub base_ms: u64,
    pub step_ms: u64,
}

impl Stagger {
    pub const fn new(base_ms: u64, step_ms: u64) -> Self {
        Self { base_ms, step_ms }
    }

    /// Delay of part `index`.
    pub fn delay_ms(&self, index: usize) -> u64 {
        self.base_ms + self.step_ms * index as u64
    }

    /// Whether part `index` has started `elapsed_ms` after the reveal.
    pub fn has_started(&self, index: usize, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.delay_ms(index) as f64
    }

    /// How many of `count` parts have started `elapsed_ms` after the reveal.
    pub fn started_count(&self, count: usize, elapsed_ms: f64) -> usize {
        (0..count)
            .take_while(|&i| self.has_started(i, elapsed_ms))
            .count()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Viewport;
    use spark_signals::effect;
    use std::cell::Cell;

    fn setup() -> (Viewport, ElementId) {
        let viewport = Viewport::new();
        let el = viewport.mount_element();
        (viewport, el)
    }

    fn counting(reveal: &RevealController) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        reveal.on_reveal(move || count_clone.set(count_clone.get() + 1));
        count
    }

    #[test]
    fn test_crosses_threshold() {
        assert!(crosses_threshold(0.1, 0.1));
        assert!(crosses_threshold(0.5, 0.2));
        assert!(!crosses_threshold(0.19, 0.2));
        assert!(!crosses_threshold(0.0, 0.0));
        assert!(crosses_threshold(0.01, 0.0));
    }

    #[test]
    fn test_reveals_once_at_threshold() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.2).unwrap();
        let count = counting(&reveal);

        viewport.report(el, 0.1);
        assert_eq!(reveal.phase(), RevealPhase::Unrevealed);
        assert!(!reveal.revealed_signal().get());

        viewport.report(el, 0.25);
        assert_eq!(reveal.phase(), RevealPhase::Revealed);
        assert!(reveal.revealed_signal().get());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cross_leave_recross_fires_once() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        let count = counting(&reveal);

        viewport.report(el, 0.5);
        viewport.report(el, 0.0);
        viewport.report(el, 0.8);
        viewport.report(el, 0.0);

        assert_eq!(count.get(), 1);
        assert!(reveal.is_revealed());
    }

    #[test]
    fn test_stops_observing_after_reveal() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        assert_eq!(viewport.observer_count(el), 1);
        assert!(reveal.is_observing());

        viewport.report(el, 1.0);

        assert_eq!(viewport.observer_count(el), 0);
        assert!(!reveal.is_observing());
    }

    #[test]
    fn test_detach_without_reveal() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        let count = counting(&reveal);

        reveal.detach();
        reveal.detach();
        viewport.report(el, 1.0);

        assert_eq!(count.get(), 0);
        assert_eq!(reveal.phase(), RevealPhase::Unrevealed);
        assert_eq!(viewport.observer_count(el), 0);
    }

    #[test]
    fn test_detach_after_reveal_keeps_revealed() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        viewport.report(el, 1.0);
        reveal.detach();
        assert!(reveal.is_revealed());
    }

    #[test]
    fn test_attach_detached_target() {
        let (viewport, el) = setup();
        viewport.unmount_element(el);

        let err = RevealController::attach(&viewport, el, 0.1).err().unwrap();
        assert!(matches!(err, Error::DetachedTarget(_)));
    }

    #[test]
    fn test_invalid_threshold() {
        let (viewport, el) = setup();
        for bad in [-0.1, 1.5, f64::NAN] {
            let err = RevealController::attach(&viewport, el, bad).err().unwrap();
            assert!(matches!(err, Error::InvalidThreshold(_)));
        }
        // Nothing was registered
        assert_eq!(viewport.observer_count(el), 0);
    }

    #[test]
    fn test_element_removed_before_reveal() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();

        viewport.unmount_element(el);
        viewport.report(el, 1.0);
        assert!(!reveal.is_revealed());

        // Releasing afterwards is still clean
        reveal.detach();
    }

    #[test]
    fn test_instances_independent() {
        let viewport = Viewport::new();
        let a = viewport.mount_element();
        let b = viewport.mount_element();
        let reveal_a = RevealController::attach(&viewport, a, 0.1).unwrap();
        let reveal_b = RevealController::attach(&viewport, b, 0.1).unwrap();

        viewport.report(a, 0.5);
        assert!(reveal_a.is_revealed());
        assert!(!reveal_b.is_revealed());
    }

    #[test]
    fn test_late_listener_runs_immediately() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        viewport.report(el, 1.0);

        let count = counting(&reveal);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_releases_observation() {
        let (viewport, el) = setup();
        {
            let _reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
            assert_eq!(viewport.observer_count(el), 1);
        }
        assert_eq!(viewport.observer_count(el), 0);
    }

    #[test]
    fn test_forced_reveal_is_one_shot() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        let count = counting(&reveal);

        assert!(reveal.reveal());
        assert!(!reveal.reveal());
        viewport.report(el, 1.0);

        assert_eq!(count.get(), 1);
        assert!(reveal.is_revealed());
        assert_eq!(viewport.observer_count(el), 0);
    }

    #[test]
    fn test_forced_reveal_after_detach_is_noop() {
        let (viewport, el) = setup();
        let reveal = RevealController::attach(&viewport, el, 0.1).unwrap();
        reveal.detach();

        assert!(!reveal.reveal());
        assert_eq!(reveal.phase(), RevealPhase::Unrevealed);
    }

    #[test]
    fn test_stop_from_revealed_effect() {
        let (viewport, el) = setup();
        let reveal = Rc::new(RevealController::attach(&viewport, el, 0.1).unwrap());

        let revealed = reveal.revealed_signal();
        let handle = Rc::clone(&reveal);
        let _effect = effect(move || {
            if revealed.get() {
                handle.detach();
                assert!(handle.is_revealed());
            }
        });

        viewport.report(el, 0.5);
        assert!(reveal.is_revealed());
        assert_eq!(viewport.observer_count(el), 0);
    }

    #[test]
    fn test_stagger_delays() {
        // Governance levers: 400ms then 50ms apart
        let levers = Stagger::new(400, 50);
        assert_eq!(levers.delay_ms(0), 400);
        assert_eq!(levers.delay_ms(4), 600);

        assert_eq!(levers.started_count(5, 0.0), 0);
        assert_eq!(levers.started_count(5, 400.0), 1);
        assert_eq!(levers.started_count(5, 499.0), 2);
        assert_eq!(levers.started_count(5, 10_000.0), 5);
        assert!(levers.has_started(2, 500.0));
        assert!(!levers.has_started(3, 500.0));
    }
}
