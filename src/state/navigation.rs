//! Navigation chrome - scrolled styling and the mobile menu
//!
//! Small state the navigation bar needs besides the active section:
//! - `scrolled` flips once the page scrolls past a threshold (solid bar)
//! - `menu_open` drives the mobile menu overlay
//!
//! A nav click closes the menu and hands the target to the section tracker.

use std::cell::RefCell;

use spark_signals::{signal, Signal};

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::events::{ScrollSource, SmoothScroll};
use crate::types::Cleanup;

use super::SectionTracker;

/// Navigation bar state.
pub struct NavChrome {
    scrolled: Signal<bool>,
    menu_open: Signal<bool>,
    threshold: f64,
    subscription: RefCell<Option<Cleanup>>,
}

impl NavChrome {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            scrolled: signal(false),
            menu_open: signal(false),
            threshold: config.scrolled_threshold,
            subscription: RefCell::new(None),
        }
    }

    /// Track the scrolled flag from `source`. Re-attaching replaces the
    /// previous subscription.
    pub fn attach(&self, source: &impl ScrollSource) {
        self.detach();

        let scrolled = self.scrolled.clone();
        let threshold = self.threshold;
        let cleanup = source.subscribe_scroll(Box::new(move |sample| {
            let now = sample.scroll_y > threshold;
            if scrolled.get() != now {
                scrolled.set(now);
            }
        }));
        *self.subscription.borrow_mut() = Some(cleanup);
    }

    /// Stop tracking scroll. Idempotent.
    pub fn detach(&self) {
        let cleanup = self.subscription.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled.get()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open.get()
    }

    pub fn toggle_menu(&self) {
        self.menu_open.set(!self.menu_open.get());
    }

    pub fn close_menu(&self) {
        if self.menu_open.get() {
            self.menu_open.set(false);
        }
    }

    /// Handle a nav entry click: close the menu and navigate.
    pub fn navigate(&self, id: &str, tracker: &SectionTracker, scroller: &dyn SmoothScroll) -> Result<()> {
        self.close_menu();
        tracker.navigate_to(id, scroller)
    }

    pub fn scrolled_signal(&self) -> Signal<bool> {
        self.scrolled.clone()
    }

    pub fn menu_open_signal(&self) -> Signal<bool> {
        self.menu_open.clone()
    }
}

impl Drop for NavChrome {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ScrollEmitter;
    use crate::state::Section;
    use crate::types::ScrollSample;
    use std::cell::Cell;

    struct CountingScroller(Cell<u32>);

    impl SmoothScroll for CountingScroller {
        fn smooth_scroll_to(&self, _target: &Section) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn setup() -> (ScrollEmitter, NavChrome) {
        let scroll = ScrollEmitter::new();
        let nav = NavChrome::new(&TrackerConfig::default());
        nav.attach(&scroll);
        (scroll, nav)
    }

    #[test]
    fn test_scrolled_threshold() {
        let (scroll, nav) = setup();
        assert!(!nav.is_scrolled());

        scroll.emit(ScrollSample::new(100.0, 800.0));
        assert!(!nav.is_scrolled());

        scroll.emit(ScrollSample::new(101.0, 800.0));
        assert!(nav.is_scrolled());

        scroll.emit(ScrollSample::new(0.0, 800.0));
        assert!(!nav.is_scrolled());
    }

    #[test]
    fn test_detach_stops_tracking() {
        let (scroll, nav) = setup();
        nav.detach();
        scroll.emit(ScrollSample::new(500.0, 800.0));
        assert!(!nav.is_scrolled());
        assert_eq!(scroll.subscriber_count(), 0);
    }

    #[test]
    fn test_menu_toggle() {
        let (_scroll, nav) = setup();
        nav.toggle_menu();
        assert!(nav.is_menu_open());
        nav.toggle_menu();
        assert!(!nav.is_menu_open());
    }

    #[test]
    fn test_navigate_closes_menu() {
        let (_scroll, nav) = setup();
        let tracker = SectionTracker::new("hero", &TrackerConfig::default());
        tracker.register(Section::new("hero", 0, 0.0, 800.0)).unwrap();
        tracker.register(Section::new("dial", 1, 800.0, 800.0)).unwrap();
        let scroller = CountingScroller(Cell::new(0));

        nav.toggle_menu();
        nav.navigate("dial", &tracker, &scroller).unwrap();

        assert!(!nav.is_menu_open());
        assert_eq!(scroller.0.get(), 1);
    }

    #[test]
    fn test_navigate_unknown_still_closes_menu() {
        let (_scroll, nav) = setup();
        let tracker = SectionTracker::new("hero", &TrackerConfig::default());
        let scroller = CountingScroller(Cell::new(0));

        nav.toggle_menu();
        assert!(nav.navigate("nowhere", &tracker, &scroller).is_err());
        assert!(!nav.is_menu_open());
        assert_eq!(scroller.0.get(), 0);
    }
}
