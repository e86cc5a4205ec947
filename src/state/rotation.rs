//! Rotation Animator - continuously advancing dial angle
//!
//! Drives the slow rotation of the decorative risk-clock ring. Each tick of
//! the frame clock adds a small increment to the angle; the renderer reads
//! the angle and applies it as a transform.
//!
//! # Pattern
//!
//! - `start` subscribes to a tick source, `stop` drops the subscription
//! - Restarting resumes from the last angle, the initial angle only seeds
//!   the very first start
//! - The angle grows without bound; [`RotationAnimator::display_angle`]
//!   wraps it for presentation
//!
//! In [`RotationMode::PerFrame`] the perceived speed follows the display
//! refresh rate. [`RotationMode::PerSecond`] uses tick timestamps instead.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::config::{RotationConfig, RotationMode};
use crate::events::TickSource;
use crate::types::{Cleanup, FrameTick};

struct RotationInner {
    increment: f64,
    mode: RotationMode,
    seeded: bool,
    subscription: Option<Cleanup>,
    last_timestamp: Option<f64>,
}

/// Frame-driven angle for the decorative ring.
pub struct RotationAnimator {
    inner: Rc<RefCell<RotationInner>>,
    angle: Signal<f64>,
}

impl RotationAnimator {
    pub fn new(config: &RotationConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RotationInner {
                increment: config.increment,
                mode: config.mode,
                seeded: false,
                subscription: None,
                last_timestamp: None,
            })),
            angle: signal(0.0),
        }
    }

    /// Begin advancing on every tick of `clock`.
    ///
    /// `initial_angle` is only used the first time; later starts resume from
    /// the current angle. Starting while running does nothing.
    pub fn start(&self, clock: &impl TickSource, initial_angle: f64) {
        let seed = {
            let mut inner = self.inner.borrow_mut();
            if inner.subscription.is_some() {
                return;
            }
            inner.last_timestamp = None;
            !std::mem::replace(&mut inner.seeded, true)
        };
        // Signal writes run effects synchronously; no borrow may be held
        if seed {
            self.angle.set(initial_angle);
        }

        let weak = Rc::downgrade(&self.inner);
        let angle = self.angle.clone();
        let cleanup = clock.subscribe_tick(Box::new(move |tick| advance(&weak, &angle, tick)));
        self.inner.borrow_mut().subscription = Some(cleanup);

        tracing::debug!(angle = self.angle.get(), "rotation started");
    }

    /// Halt advancement. Idempotent.
    pub fn stop(&self) {
        let cleanup = self.inner.borrow_mut().subscription.take();
        if let Some(cleanup) = cleanup {
            cleanup();
            tracing::debug!(angle = self.angle.get(), "rotation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().subscription.is_some()
    }

    /// Accumulated angle in degrees.
    pub fn angle(&self) -> f64 {
        self.angle.get()
    }

    /// Angle wrapped into `[0, 360)` for rendering.
    pub fn display_angle(&self) -> f64 {
        self.angle.get().rem_euclid(360.0)
    }

    /// Reactive angle for the ring renderer.
    pub fn angle_signal(&self) -> Signal<f64> {
        self.angle.clone()
    }
}

impl Drop for RotationAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn advance(inner: &Weak<RefCell<RotationInner>>, angle: &Signal<f64>, tick: &FrameTick) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let delta = {
        let mut inner = inner.borrow_mut();
        if inner.subscription.is_none() {
            return;
        }
        let mode = inner.mode;
        match mode {
            RotationMode::PerFrame => inner.increment,
            RotationMode::PerSecond(degrees) => {
                let delta = inner
                    .last_timestamp
                    .map(|last| (tick.timestamp_ms - last).max(0.0) / 1000.0 * degrees)
                    .unwrap_or(0.0);
                inner.last_timestamp = Some(tick.timestamp_ms);
                delta
            }
        }
    };

    if delta != 0.0 {
        angle.set(angle.get() + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FrameClock;
    use spark_signals::effect;

    fn setup() -> (FrameClock, RotationAnimator) {
        (FrameClock::new(), RotationAnimator::new(&RotationConfig::default()))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_advances_per_frame() {
        let (clock, rotation) = setup();
        rotation.start(&clock, 10.0);
        assert!(approx(rotation.angle(), 10.0));

        clock.advance(50, 0.0);
        assert!(approx(rotation.angle(), 11.0));
    }

    #[test]
    fn test_stop_is_idempotent_and_halts() {
        let (clock, rotation) = setup();
        rotation.start(&clock, 0.0);
        clock.advance(10, 0.0);

        rotation.stop();
        rotation.stop();
        assert!(!rotation.is_running());
        assert_eq!(clock.subscriber_count(), 0);

        let frozen = rotation.angle();
        clock.advance(100, 0.0);
        assert_eq!(rotation.angle(), frozen);
    }

    #[test]
    fn test_restart_resumes_from_last_angle() {
        let (clock, rotation) = setup();
        rotation.start(&clock, 90.0);
        clock.advance(100, 0.0);
        rotation.stop();

        // New initial angle ignored on restart
        rotation.start(&clock, 0.0);
        assert!(approx(rotation.angle(), 92.0));
        clock.advance(100, 0.0);
        assert!(approx(rotation.angle(), 94.0));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (clock, rotation) = setup();
        rotation.start(&clock, 0.0);
        rotation.start(&clock, 0.0);
        assert_eq!(clock.subscriber_count(), 1);

        clock.tick(0.0);
        assert!(approx(rotation.angle(), 0.02));
    }

    #[test]
    fn test_display_angle_wraps() {
        let (clock, rotation) = setup();
        rotation.start(&clock, 359.99);
        clock.tick(0.0);
        assert!(rotation.angle() > 360.0);
        assert!(approx(rotation.display_angle(), 0.01));

        let negative = RotationAnimator::new(&RotationConfig::default());
        negative.start(&clock, -30.0);
        assert!(approx(negative.display_angle(), 330.0));
    }

    #[test]
    fn test_per_second_mode_ignores_frame_rate() {
        let config = RotationConfig {
            mode: RotationMode::PerSecond(1.2),
            ..RotationConfig::default()
        };

        // 60 Hz for one second
        let slow_clock = FrameClock::new();
        let slow = RotationAnimator::new(&config);
        slow.start(&slow_clock, 0.0);
        for i in 0..=60 {
            slow_clock.tick(i as f64 * 1000.0 / 60.0);
        }

        // 120 Hz for one second
        let fast_clock = FrameClock::new();
        let fast = RotationAnimator::new(&config);
        fast.start(&fast_clock, 0.0);
        for i in 0..=120 {
            fast_clock.tick(i as f64 * 1000.0 / 120.0);
        }

        assert!((slow.angle() - 1.2).abs() < 1e-6);
        assert!((fast.angle() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_stop_from_angle_effect() {
        let clock = FrameClock::new();
        let rotation = Rc::new(RotationAnimator::new(&RotationConfig::default()));
        rotation.start(&clock, 0.0);

        let angle = rotation.angle_signal();
        let handle = Rc::clone(&rotation);
        let _effect = effect(move || {
            if angle.get() > 0.03 && handle.is_running() {
                handle.stop();
            }
        });

        clock.advance(5, 0.0);
        assert!(!rotation.is_running());
        assert!(approx(rotation.angle(), 0.04));
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_stops_subscription() {
        let clock = FrameClock::new();
        {
            let rotation = RotationAnimator::new(&RotationConfig::default());
            rotation.start(&clock, 0.0);
            assert_eq!(clock.subscriber_count(), 1);
        }
        assert_eq!(clock.subscriber_count(), 0);
    }
}
