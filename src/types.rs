//! Core types for spark-page.
//!
//! Plain value types that flow between the host page, the event sources
//! and the interaction engines. Nothing in here owns state.

use std::fmt;

// =============================================================================
// Cleanup
// =============================================================================

/// Disposer returned by every subscription.
///
/// Call it to stop receiving events. Once it has run, the subscribed
/// handler is never invoked again.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Scroll / Frame samples
// =============================================================================

/// One scroll-position sample, emitted on every scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSample {
    /// Vertical scroll offset of the page (may be negative during overscroll).
    pub scroll_y: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
}

impl ScrollSample {
    pub const fn new(scroll_y: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
        }
    }

    /// Bottom edge of the viewport in page coordinates.
    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_y + self.viewport_height
    }
}

/// One tick of a frame or interval clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTick {
    /// Monotonic tick counter, starting at 1 for the first tick.
    pub frame: u64,
    /// Host timestamp of the tick in milliseconds.
    pub timestamp_ms: f64,
}

// =============================================================================
// Element identity
// =============================================================================

/// Handle for an element registered with a [`Viewport`](crate::events::Viewport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u64);

impl ElementId {
    /// Raw numeric id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque color from a packed `0xRRGGBB` integer.
    ///
    /// ```
    /// use spark_page::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_rgb_int(0xEF4444), Rgba::rgb(0xEF, 0x44, 0x44));
    /// ```
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Same color with a different alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Format as `#RRGGBB` (alpha is dropped when opaque, appended otherwise).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}
