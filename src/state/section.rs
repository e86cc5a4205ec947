//! Section Tracker - active section resolution and scroll-to navigation
//!
//! Resolves which named region of the page is "active" from the page scroll
//! position, for navigation highlighting:
//! - A probe line sits one third of the way down the viewport
//! - The active section is the first (by `order_index`) whose span contains it
//! - When nothing contains the probe, the previous active id is kept
//!
//! The tracker is the single writer of [`ActiveSection`]; navigation UI only
//! reads it. `navigate_to` asks the host to scroll and leaves the active id
//! alone: the scroll events that follow update it.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::state::{Section, SectionTracker};
//! use spark_page::events::ScrollEmitter;
//!
//! let tracker = SectionTracker::new("hero", &Default::default());
//! tracker.register(Section::new("hero", 0, 0.0, 900.0))?;
//! tracker.register(Section::new("evidence", 1, 900.0, 1400.0))?;
//!
//! let scroll = ScrollEmitter::new();
//! tracker.attach(&scroll);
//! scroll.emit(ScrollSample::new(800.0, 900.0));
//! assert_eq!(tracker.current(), "evidence");
//!
//! tracker.detach();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::events::{ScrollSource, SmoothScroll};
use crate::types::{Cleanup, ScrollSample};

// =============================================================================
// SECTION
// =============================================================================

/// A named, ordered region of the page with a vertical extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub order_index: usize,
    pub dom_top: f64,
    pub dom_height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, order_index: usize, dom_top: f64, dom_height: f64) -> Self {
        Self {
            id: id.into(),
            order_index,
            dom_top,
            dom_height,
        }
    }

    /// Bottom edge (exclusive) of the section.
    pub fn bottom(&self) -> f64 {
        self.dom_top + self.dom_height
    }

    /// Whether `y` lies in `[dom_top, dom_top + dom_height)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.dom_top && y < self.bottom()
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Page coordinate of the probe line for a scroll sample.
pub fn probe_y(sample: &ScrollSample, probe_fraction: f64) -> f64 {
    sample.scroll_y + sample.viewport_height * probe_fraction
}

/// First section, in ascending `order_index`, whose span contains `probe`.
///
/// `sections` may be in any order. Overlapping spans resolve to the lowest
/// `order_index`.
pub fn resolve_active(sections: &[Section], probe: f64) -> Option<&Section> {
    sections
        .iter()
        .filter(|s| s.contains(probe))
        .min_by_key(|s| s.order_index)
}

// =============================================================================
// ACTIVE SECTION STATE
// =============================================================================

/// The currently active section id, readable by any number of renderers.
#[derive(Clone)]
pub struct ActiveSection {
    current: Signal<String>,
}

impl ActiveSection {
    fn new(initial: String) -> Self {
        Self {
            current: signal(initial),
        }
    }

    /// Current active id.
    pub fn get(&self) -> String {
        self.current.get()
    }

    /// Whether `id` is the active section (nav highlighting).
    pub fn is_active(&self, id: &str) -> bool {
        self.current.get() == id
    }

    /// Reactive handle for renderers.
    pub fn signal(&self) -> Signal<String> {
        self.current.clone()
    }

    fn set(&self, id: &str) -> bool {
        if self.current.get() == id {
            return false;
        }
        self.current.set(id.to_string());
        true
    }
}

// =============================================================================
// SECTION TRACKER
// =============================================================================

#[derive(Default)]
struct TrackerState {
    /// Kept sorted by `order_index`.
    sections: Vec<Section>,
    subscription: Option<Cleanup>,
}

/// Scroll-driven active section state machine.
pub struct SectionTracker {
    state: Rc<RefCell<TrackerState>>,
    active: ActiveSection,
    probe_fraction: f64,
}

impl SectionTracker {
    /// Create a tracker whose active id starts at `initial_id`.
    pub fn new(initial_id: impl Into<String>, config: &TrackerConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(TrackerState::default())),
            active: ActiveSection::new(initial_id.into()),
            probe_fraction: config.probe_fraction,
        }
    }

    /// Create a tracker over `sections`, starting at the lowest `order_index`.
    ///
    /// Returns `None` when `sections` is empty.
    pub fn with_sections(sections: Vec<Section>, config: &TrackerConfig) -> Result<Option<Self>> {
        let Some(first) = sections.iter().min_by_key(|s| s.order_index) else {
            return Ok(None);
        };
        let tracker = Self::new(first.id.clone(), config);
        tracker.replace_sections(sections)?;
        Ok(Some(tracker))
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Register a section. Fails if its id is already registered.
    pub fn register(&self, section: Section) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.sections.iter().any(|s| s.id == section.id) {
            return Err(Error::DuplicateSection(section.id));
        }
        tracing::debug!(id = %section.id, order = section.order_index, "section registered");
        let pos = state
            .sections
            .partition_point(|s| s.order_index <= section.order_index);
        state.sections.insert(pos, section);
        Ok(())
    }

    /// Unregister a section. Returns `false` if it was not registered.
    pub fn unregister(&self, id: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.sections.len();
        state.sections.retain(|s| s.id != id);
        before != state.sections.len()
    }

    /// Update the geometry of a registered section after a layout change.
    pub fn update_geometry(&self, id: &str, dom_top: f64, dom_height: f64) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let section = state
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownSection(id.to_string()))?;
        section.dom_top = dom_top;
        section.dom_height = dom_height;
        Ok(())
    }

    /// Replace every registered section (full layout recompute).
    pub fn replace_sections(&self, sections: Vec<Section>) -> Result<()> {
        let mut sorted = sections;
        sorted.sort_by_key(|s| s.order_index);
        for (i, section) in sorted.iter().enumerate() {
            if sorted[..i].iter().any(|s| s.id == section.id) {
                return Err(Error::DuplicateSection(section.id.clone()));
            }
        }
        self.state.borrow_mut().sections = sorted;
        Ok(())
    }

    /// Registered sections in `order_index` order.
    pub fn sections(&self) -> Vec<Section> {
        self.state.borrow().sections.clone()
    }

    pub fn section(&self, id: &str) -> Option<Section> {
        self.state.borrow().sections.iter().find(|s| s.id == id).cloned()
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Evaluate one scroll sample. Returns the new active id when it changed.
    pub fn evaluate(&self, sample: &ScrollSample) -> Option<String> {
        evaluate(&self.state, &self.active, self.probe_fraction, sample)
    }

    /// Current active section id.
    pub fn current(&self) -> String {
        self.active.get()
    }

    /// Shared read handle to the active section.
    pub fn active(&self) -> ActiveSection {
        self.active.clone()
    }

    // -------------------------------------------------------------------------
    // Subscription
    // -------------------------------------------------------------------------

    /// Evaluate every sample `source` emits until [`detach`](Self::detach).
    ///
    /// Attaching again replaces the previous subscription.
    pub fn attach(&self, source: &impl ScrollSource) {
        self.detach();

        let state = Rc::clone(&self.state);
        let active = self.active.clone();
        let probe_fraction = self.probe_fraction;
        let cleanup = source.subscribe_scroll(Box::new(move |sample| {
            evaluate(&state, &active, probe_fraction, sample);
        }));

        self.state.borrow_mut().subscription = Some(cleanup);
    }

    /// Stop observing scroll events. Idempotent.
    pub fn detach(&self) {
        let cleanup = self.state.borrow_mut().subscription.take();
        if let Some(cleanup) = cleanup {
            cleanup();
            tracing::debug!("section tracker detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().subscription.is_some()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Ask the host to smooth-scroll `id` into view.
    ///
    /// Does not touch the active id.
    pub fn navigate_to(&self, id: &str, scroller: &dyn SmoothScroll) -> Result<()> {
        let target = self.section(id).ok_or_else(|| {
            tracing::warn!(id, "navigate to unknown section");
            Error::UnknownSection(id.to_string())
        })?;

        tracing::debug!(id, top = target.dom_top, "navigate");
        scroller.smooth_scroll_to(&target);
        Ok(())
    }
}

impl Drop for SectionTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

fn evaluate(
    state: &RefCell<TrackerState>,
    active: &ActiveSection,
    probe_fraction: f64,
    sample: &ScrollSample,
) -> Option<String> {
    let probe = probe_y(sample, probe_fraction);

    let next = {
        let state = state.borrow();
        if state.sections.is_empty() {
            tracing::trace!("scroll sample before any section geometry");
            return None;
        }
        resolve_active(&state.sections, probe)?.id.clone()
    };

    if active.set(&next) {
        tracing::debug!(id = %next, probe, "active section changed");
        Some(next)
    } else {
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================
