//! Frame Clock - display-frame and fixed-interval ticks
//!
//! One type serves both clocks the page needs: the display-frame clock that
//! drives the rotating dial, and the 30 ms interval clock that drives
//! count-up stats. The host calls [`FrameClock::tick`] from its frame
//! callback (or timer) with the current timestamp.

use std::cell::Cell;
use std::rc::Rc;

use super::Emitter;
use crate::types::{Cleanup, FrameTick};

/// A tick source with a monotonic frame counter.
#[derive(Clone, Default)]
pub struct FrameClock {
    emitter: Emitter<FrameTick>,
    frame: Rc<Cell<u64>>,
    interval_ms: Option<u64>,
}

impl FrameClock {
    /// Clock driven by display frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock driven by a fixed interval timer.
    pub fn with_interval(interval_ms: u64) -> Self {
        Self {
            interval_ms: Some(interval_ms),
            ..Self::default()
        }
    }

    /// Interval of this clock, `None` for a display-frame clock.
    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    /// Emit the next tick.
    pub fn tick(&self, timestamp_ms: f64) -> FrameTick {
        let frame = self.frame.get() + 1;
        self.frame.set(frame);

        let tick = FrameTick {
            frame,
            timestamp_ms,
        };
        tracing::trace!(frame, timestamp_ms, "clock tick");
        self.emitter.emit(tick);
        tick
    }

    /// Emit `count` ticks spaced by the clock interval (16 ms for frame clocks).
    ///
    /// Convenience for hosts catching up after a stall and for tests.
    pub fn advance(&self, count: u64, start_ms: f64) -> Option<FrameTick> {
        let spacing = self.interval_ms.unwrap_or(16) as f64;
        (0..count)
            .map(|i| self.tick(start_ms + spacing * i as f64))
            .last()
    }

    /// Number of ticks emitted so far.
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }

    pub fn subscribe(&self, handler: impl Fn(&FrameTick) + 'static) -> Cleanup {
        self.emitter.subscribe(handler)
    }

    pub fn subscriber_count(&self) -> usize {
        self.emitter.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_tick_counts_frames() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);

        let tick = clock.tick(16.0);
        assert_eq!(tick.frame, 1);
        assert_eq!(clock.tick(32.0).frame, 2);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_advance_spacing() {
        let clock = FrameClock::with_interval(30);
        let stamps = Rc::new(RefCell::new(Vec::new()));

        let log = stamps.clone();
        let _cleanup = clock.subscribe(move |t| log.borrow_mut().push(t.timestamp_ms));

        let last = clock.advance(3, 0.0).unwrap();
        assert_eq!(last.frame, 3);
        assert_eq!(*stamps.borrow(), vec![0.0, 30.0, 60.0]);
    }

    #[test]
    fn test_advance_zero_ticks() {
        let clock = FrameClock::new();
        assert!(clock.advance(0, 0.0).is_none());
        assert_eq!(clock.frame(), 0);
    }
}
