//! Page - mount every engine on one set of event sources
//!
//! The composition root. Mounting a page:
//! 1. Resolves section geometry from the [`PageLayout`]
//! 2. Attaches the section tracker and nav chrome to the scroll stream
//! 3. Mounts one element and one reveal controller per section
//! 4. Bridges scroll samples into per-section visibility reports
//! 5. Starts the dial rotation on the frame clock
//! 6. Plays mount-timed entries once the entry delay has passed
//! 7. Creates one [`Highlight`] per pick-one interaction group
//!
//! The engines never talk to each other; the page only routes host events
//! to them and records which outputs changed in a [`Dirty`] set so the
//! renderer knows what to redraw.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::page::Page;
//!
//! let page = Page::mount(EngineConfig::default(), layout, 1280.0, ScrollSample::new(0.0, 800.0))?;
//!
//! // Host event loop
//! page.scroll(ScrollSample::new(window_scroll_y, window_height));
//! page.frame(now_ms);
//! page.toggle_lever("supply")?;
//!
//! let dirty = page.take_dirty();
//! if dirty.contains(Dirty::PRESSURE) {
//!     redraw_gauge(page.pressure().result());
//! }
//!
//! page.unmount();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::Signal;

use crate::catalog::{self, InteractionGroup};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::events::{FrameClock, ScrollEmitter, SmoothScroll, Viewport};
use crate::layout::{visible_fraction, PageLayout};
use crate::state::{
    CountUp, Highlight, NavChrome, PressureModel, PressureResult, RevealController,
    RotationAnimator, Section, SectionTracker, Stagger,
};
use crate::types::{Cleanup, ElementId, FrameTick, ScrollSample};

// =============================================================================
// DIRTY FLAGS
// =============================================================================

bitflags::bitflags! {
    /// Outputs that changed since the last [`Page::take_dirty`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u8 {
        const ACTIVE_SECTION = 1 << 0;
        const REVEAL = 1 << 1;
        const ROTATION = 1 << 2;
        const PRESSURE = 1 << 3;
        const NAV = 1 << 4;
        const STATS = 1 << 5;
        const INTERACTION = 1 << 6;
    }
}

// =============================================================================
// SOURCES
// =============================================================================

/// The event sources a page is mounted on.
#[derive(Clone)]
pub struct PageSources {
    pub scroll: ScrollEmitter,
    pub frames: FrameClock,
    pub interval: FrameClock,
    pub viewport: Viewport,
}

impl PageSources {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scroll: ScrollEmitter::new(),
            frames: FrameClock::new(),
            interval: FrameClock::with_interval(config.count_up.interval_ms),
            viewport: Viewport::new(),
        }
    }
}

// =============================================================================
// SHARED PAGE STATE
// =============================================================================

struct Shared {
    dirty: Cell<Dirty>,
    frame_ms: Cell<f64>,
    sample: Cell<ScrollSample>,
    geometry: RefCell<Vec<(Section, ElementId)>>,
    last_active: RefCell<String>,
    last_scrolled: Cell<bool>,
    last_angle: Cell<f64>,
    first_frame_ms: Cell<Option<f64>>,
}

impl Shared {
    fn mark(&self, flags: Dirty) {
        self.dirty.set(self.dirty.get() | flags);
    }
}

struct SectionView {
    id: String,
    element: ElementId,
    reveal: Rc<RevealController>,
    stagger: Stagger,
    revealed_at: Rc<Cell<Option<f64>>>,
    stats: Vec<Rc<CountUp>>,
}

/// One [`Highlight`] per interaction group.
struct Interactions {
    pathway: Highlight,
    cards: Highlight,
    scenario: Highlight,
    milestones: Highlight,
    levels: Highlight,
}

impl Interactions {
    fn new() -> Result<Self> {
        let build = |group: InteractionGroup| match group.initial() {
            Some(initial) => Highlight::with_initial(group.options().iter().copied(), initial),
            None => Highlight::new(group.options().iter().copied()),
        };
        Ok(Self {
            pathway: build(InteractionGroup::PathwayNode)?,
            cards: build(InteractionGroup::MechanismCard)?,
            scenario: build(InteractionGroup::Scenario)?,
            milestones: build(InteractionGroup::Milestone)?,
            levels: build(InteractionGroup::ImpactLevel)?,
        })
    }

    fn get(&self, group: InteractionGroup) -> &Highlight {
        match group {
            InteractionGroup::PathwayNode => &self.pathway,
            InteractionGroup::MechanismCard => &self.cards,
            InteractionGroup::Scenario => &self.scenario,
            InteractionGroup::Milestone => &self.milestones,
            InteractionGroup::ImpactLevel => &self.levels,
        }
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// A mounted page: every engine wired to one set of sources.
pub struct Page {
    sources: PageSources,
    layout: PageLayout,
    tracker: SectionTracker,
    nav: NavChrome,
    sections: Vec<SectionView>,
    rotation: RotationAnimator,
    pressure: PressureModel,
    interactions: Interactions,
    shared: Rc<Shared>,
    subscriptions: Vec<Cleanup>,
    mounted: bool,
}

impl Page {
    /// Mount a page laid out by `layout` in a viewport of `viewport_width`
    /// and the height given by `initial`, then evaluate `initial`.
    pub fn mount(
        config: EngineConfig,
        layout: PageLayout,
        viewport_width: f32,
        initial: ScrollSample,
    ) -> Result<Self> {
        config.validate()?;
        let sources = PageSources::new(&config);
        let geometry = layout.compute(viewport_width, initial.viewport_height as f32)?;

        let initial_id = geometry
            .first()
            .map(|s| s.id.clone())
            .unwrap_or_else(|| catalog::PAGE_SECTIONS[0].to_string());

        let tracker = SectionTracker::new(initial_id.clone(), &config.tracker);
        tracker.replace_sections(geometry.clone())?;
        tracker.attach(&sources.scroll);

        let nav = NavChrome::new(&config.tracker);
        nav.attach(&sources.scroll);

        let shared = Rc::new(Shared {
            dirty: Cell::new(Dirty::empty()),
            frame_ms: Cell::new(0.0),
            sample: Cell::new(initial),
            geometry: RefCell::new(Vec::with_capacity(geometry.len())),
            last_active: RefCell::new(initial_id),
            last_scrolled: Cell::new(false),
            last_angle: Cell::new(0.0),
            first_frame_ms: Cell::new(None),
        });

        let mut sections = Vec::with_capacity(geometry.len());
        for section in &geometry {
            sections.push(mount_section(section, &sources, &shared, &config)?);
        }

        let rotation = RotationAnimator::new(&config.rotation);
        rotation.start(&sources.frames, 0.0);

        let pressure = PressureModel::new(catalog::governance_levers(), &config.pressure);
        let interactions = Interactions::new()?;

        let mut page = Self {
            sources,
            layout,
            tracker,
            nav,
            sections,
            rotation,
            pressure,
            interactions,
            shared,
            subscriptions: Vec::new(),
            mounted: true,
        };
        page.wire_sources(config.reveal.entry_delay_ms);

        tracing::debug!(sections = page.sections.len(), "page mounted");
        page.scroll(initial);
        Ok(page)
    }

    /// Page-level subscriptions. Registered after the engines' own, so each
    /// handler observes the engines already updated for the event.
    fn wire_sources(&mut self, entry_delay_ms: f64) {
        let shared = Rc::clone(&self.shared);
        let viewport = self.sources.viewport.clone();
        let active = self.tracker.active();
        let scrolled = self.nav.scrolled_signal();
        self.subscriptions.push(self.sources.scroll.subscribe(move |sample| {
            shared.sample.set(*sample);

            let current = active.get();
            if *shared.last_active.borrow() != current {
                *shared.last_active.borrow_mut() = current;
                shared.mark(Dirty::ACTIVE_SECTION);
            }
            if shared.last_scrolled.get() != scrolled.get() {
                shared.last_scrolled.set(scrolled.get());
                shared.mark(Dirty::NAV);
            }

            report_visibility(&shared, &viewport, sample);
        }));

        let shared = Rc::clone(&self.shared);
        let angle = self.rotation.angle_signal();
        let timed: Vec<Rc<RevealController>> = self
            .sections
            .iter()
            .filter(|view| catalog::entry_on_mount(&view.id))
            .map(|view| Rc::clone(&view.reveal))
            .collect();
        self.subscriptions.push(self.sources.frames.subscribe(move |tick| {
            shared.frame_ms.set(tick.timestamp_ms);
            let now = angle.get();
            if shared.last_angle.get() != now {
                shared.last_angle.set(now);
                shared.mark(Dirty::ROTATION);
            }

            // Timed entries play wherever the page is scrolled
            let first = shared.first_frame_ms.get().unwrap_or(tick.timestamp_ms);
            shared.first_frame_ms.set(Some(first));
            if tick.timestamp_ms - first >= entry_delay_ms {
                for reveal in &timed {
                    reveal.reveal();
                }
            }
        }));

        let shared = Rc::clone(&self.shared);
        let stats: Vec<Rc<CountUp>> = self
            .sections
            .iter()
            .flat_map(|view| view.stats.iter().cloned())
            .collect();
        self.subscriptions.push(self.sources.interval.subscribe(move |_| {
            if stats.iter().any(|stat| stat.is_running()) {
                shared.mark(Dirty::STATS);
            }
        }));
    }

    // -------------------------------------------------------------------------
    // Host events
    // -------------------------------------------------------------------------

    /// Feed one scroll sample.
    pub fn scroll(&self, sample: ScrollSample) {
        self.sources.scroll.emit(sample);
    }

    /// Feed one display frame.
    pub fn frame(&self, timestamp_ms: f64) -> FrameTick {
        self.sources.frames.tick(timestamp_ms)
    }

    /// Feed one tick of the count-up interval timer.
    pub fn interval_tick(&self, timestamp_ms: f64) -> FrameTick {
        self.sources.interval.tick(timestamp_ms)
    }

    /// Recompute section geometry for a new viewport size and re-evaluate
    /// the current scroll position against it.
    pub fn resize(&self, viewport_width: f32, viewport_height: f32) -> Result<()> {
        let geometry = self.layout.compute(viewport_width, viewport_height)?;
        self.tracker.replace_sections(geometry.clone())?;

        {
            let mut mapped = self.shared.geometry.borrow_mut();
            for (section, _) in mapped.iter_mut() {
                if let Some(updated) = geometry.iter().find(|s| s.id == section.id) {
                    *section = updated.clone();
                }
            }
        }

        let previous = self.shared.sample.get();
        self.scroll(ScrollSample::new(previous.scroll_y, viewport_height as f64));
        Ok(())
    }

    /// Toggle a governance lever.
    pub fn toggle_lever(&self, id: &str) -> Result<PressureResult> {
        let result = self.pressure.toggle(id)?;
        self.shared.mark(Dirty::PRESSURE);
        Ok(result)
    }

    /// Nav entry click.
    pub fn navigate(&self, id: &str, scroller: &dyn SmoothScroll) -> Result<()> {
        let was_open = self.nav.is_menu_open();
        let result = self.nav.navigate(id, &self.tracker, scroller);
        if was_open {
            self.shared.mark(Dirty::NAV);
        }
        result
    }

    pub fn toggle_menu(&self) {
        self.nav.toggle_menu();
        self.shared.mark(Dirty::NAV);
    }

    /// Make `id` the active option of `group` (hover, scenario switch).
    pub fn select_option(&self, group: InteractionGroup, id: &str) -> Result<()> {
        if self.interactions.get(group).select(id)? {
            self.shared.mark(Dirty::INTERACTION);
        }
        Ok(())
    }

    /// Activate `id` in `group`, or clear it if already active (tap, card
    /// expand).
    pub fn toggle_option(&self, group: InteractionGroup, id: &str) -> Result<Option<String>> {
        let active = self.interactions.get(group).toggle(id)?;
        self.shared.mark(Dirty::INTERACTION);
        Ok(active)
    }

    /// Clear the active option of `group` (hover leave).
    pub fn clear_option(&self, group: InteractionGroup) {
        if self.interactions.get(group).clear() {
            self.shared.mark(Dirty::INTERACTION);
        }
    }

    // -------------------------------------------------------------------------
    // Renderer reads
    // -------------------------------------------------------------------------

    /// Flags raised since the previous call.
    pub fn take_dirty(&self) -> Dirty {
        self.shared.dirty.replace(Dirty::empty())
    }

    pub fn active_section(&self) -> String {
        self.tracker.current()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.view(id).map(|v| v.reveal.is_revealed()).unwrap_or(false)
    }

    pub fn reveal_signal(&self, id: &str) -> Option<Signal<bool>> {
        self.view(id).map(|v| v.reveal.revealed_signal())
    }

    /// How many of a section's `count` staged parts have started their
    /// entry transition at the latest frame.
    pub fn staged_started(&self, id: &str, count: usize) -> usize {
        let Some(view) = self.view(id) else {
            return 0;
        };
        match view.revealed_at.get() {
            Some(at) => view
                .stagger
                .started_count(count, self.shared.frame_ms.get() - at),
            None => 0,
        }
    }

    /// Current count-up values of a section's stats.
    pub fn stat_values(&self, id: &str) -> Vec<f64> {
        self.view(id)
            .map(|v| v.stats.iter().map(|s| s.value()).collect())
            .unwrap_or_default()
    }

    pub fn sources(&self) -> &PageSources {
        &self.sources
    }

    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    pub fn nav(&self) -> &NavChrome {
        &self.nav
    }

    pub fn rotation(&self) -> &RotationAnimator {
        &self.rotation
    }

    pub fn pressure(&self) -> &PressureModel {
        &self.pressure
    }

    pub fn highlight(&self, group: InteractionGroup) -> &Highlight {
        self.interactions.get(group)
    }

    /// Element mounted for a section.
    pub fn element(&self, id: &str) -> Option<ElementId> {
        self.view(id).map(|v| v.element)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Tear down every subscription and element.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;

        for cleanup in self.subscriptions.drain(..) {
            cleanup();
        }
        self.tracker.detach();
        self.nav.detach();
        self.rotation.stop();

        for view in &self.sections {
            view.reveal.detach();
            for stat in &view.stats {
                stat.stop();
            }
            self.sources.viewport.unmount_element(view.element);
        }

        tracing::debug!("page unmounted");
    }

    fn view(&self, id: &str) -> Option<&SectionView> {
        self.sections.iter().find(|v| v.id == id)
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn mount_section(
    section: &Section,
    sources: &PageSources,
    shared: &Rc<Shared>,
    config: &EngineConfig,
) -> Result<SectionView> {
    let element = sources.viewport.mount_element();
    let threshold =
        catalog::reveal_threshold(&section.id).unwrap_or(config.reveal.default_threshold);
    let reveal = Rc::new(RevealController::attach(
        &sources.viewport,
        element,
        threshold,
    )?);

    let revealed_at = Rc::new(Cell::new(None));
    let stats: Vec<Rc<CountUp>> = catalog::progress_stats(&section.id)
        .iter()
        .map(|&target| Rc::new(CountUp::new(target, &config.count_up)))
        .collect();

    {
        let shared = Rc::clone(shared);
        let revealed_at = Rc::clone(&revealed_at);
        let stats = stats.clone();
        let interval = sources.interval.clone();
        reveal.on_reveal(move || {
            revealed_at.set(Some(shared.frame_ms.get()));
            shared.mark(Dirty::REVEAL);
            for stat in &stats {
                stat.start(&interval);
            }
        });
    }

    shared
        .geometry
        .borrow_mut()
        .push((section.clone(), element));

    Ok(SectionView {
        id: section.id.clone(),
        element,
        reveal,
        stagger: catalog::stagger(&section.id),
        revealed_at,
        stats,
    })
}

fn report_visibility(shared: &Shared, viewport: &Viewport, sample: &ScrollSample) {
    // Snapshot so reveal callbacks run without the geometry borrowed
    let geometry = shared.geometry.borrow().clone();
    for (section, element) in geometry {
        viewport.report(element, visible_fraction(&section, sample));
    }
}

// =============================================================================
// TESTS
// =============================================================================
