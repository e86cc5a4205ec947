//! Events Module - the scroll/time substrate the engines observe
//!
//! Every engine consumes its inputs through one of the source traits below,
//! and every subscription hands back a [`Cleanup`]. Hosts implement the
//! traits over their real event loop (or bridge into the provided
//! emitters); tests drive the provided emitters by hand.
//!
//! - [`Emitter`] / [`ScrollEmitter`] - ordered broadcast of scroll samples
//! - [`FrameClock`] - display-frame and interval ticks
//! - [`Viewport`] - element registry and visible-fraction reports
//! - [`SmoothScroll`] - host command to bring a section into view

mod clock;
mod emitter;
mod viewport;

pub use clock::FrameClock;
pub use emitter::Emitter;
pub use viewport::Viewport;

use crate::error::Result;
use crate::state::Section;
use crate::types::{Cleanup, ElementId, FrameTick, ScrollSample};

/// Emitter of page scroll samples.
pub type ScrollEmitter = Emitter<ScrollSample>;

// =============================================================================
// SOURCE TRAITS
// =============================================================================

/// Stream of scroll-position samples.
pub trait ScrollSource {
    fn subscribe_scroll(&self, handler: Box<dyn Fn(&ScrollSample)>) -> Cleanup;
}

/// Stream of clock ticks (display frames or a fixed interval).
pub trait TickSource {
    fn subscribe_tick(&self, handler: Box<dyn Fn(&FrameTick)>) -> Cleanup;
}

/// Per-element visible-fraction reports.
pub trait IntersectionSource {
    /// Fails with `DetachedTarget` if `element` is not mounted.
    fn observe_fraction(&self, element: ElementId, handler: Box<dyn Fn(f64)>) -> Result<Cleanup>;
}

/// Host smooth-scroll primitive.
pub trait SmoothScroll {
    /// Start a smooth scroll that aligns the top of `target` with the viewport.
    fn smooth_scroll_to(&self, target: &Section);
}

impl ScrollSource for ScrollEmitter {
    fn subscribe_scroll(&self, handler: Box<dyn Fn(&ScrollSample)>) -> Cleanup {
        self.subscribe(move |sample| handler(sample))
    }
}

impl TickSource for FrameClock {
    fn subscribe_tick(&self, handler: Box<dyn Fn(&FrameTick)>) -> Cleanup {
        self.subscribe(move |tick| handler(tick))
    }
}

impl IntersectionSource for Viewport {
    fn observe_fraction(&self, element: ElementId, handler: Box<dyn Fn(f64)>) -> Result<Cleanup> {
        self.observe(element, move |fraction| handler(fraction))
    }
}
