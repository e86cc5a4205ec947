//! # spark-page
//!
//! Interaction engines for a long-form, single-page scrolling story.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity: every engine owns its state and publishes it as
//! signals a renderer can read.
//!
//! ## Architecture
//!
//! The host feeds raw events (scroll samples, display frames, interval ticks,
//! visibility reports) into the [`events`] sources. Engines subscribe to the
//! sources they need and update their own signals:
//!
//! ```text
//! scroll ──► SectionTracker ──► active section
//!        ├─► NavChrome ───────► scrolled / menu
//!        └─► visible_fraction ─► Viewport ──► RevealController ──► CountUp
//! frame  ──► RotationAnimator ─► dial angle
//! lever  ──► PressureModel ────► score / band / gauge
//! pick   ──► Highlight ────────► active card / node / scenario
//! ```
//!
//! [`page::Page`] mounts all of them at once and tracks which outputs changed.
//!
//! ## Modules
//!
//! - [`types`] - Core types (ScrollSample, FrameTick, ElementId, Rgba)
//! - [`events`] - Event sources and the traits engines consume
//! - [`state`] - The interaction engines
//! - [`layout`] - Taffy section geometry and visibility
//! - [`catalog`] - Static sections, nav entries, interaction groups and levers
//! - [`config`] - TOML engine configuration
//! - [`logging`] - tracing subscriber setup

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod logging;
pub mod page;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{
    CountUpConfig, EngineConfig, PressureConfig, RevealConfig, RotationConfig, RotationMode,
    TrackerConfig,
};

pub use error::{Error, Result};

pub use events::{
    Emitter, FrameClock, IntersectionSource, ScrollEmitter, ScrollSource, SmoothScroll,
    TickSource, Viewport,
};

pub use layout::{visible_fraction, PageLayout, SectionBlock, SectionHeight};

pub use page::{Dirty, Page, PageSources};

pub use state::{
    // Section tracking
    probe_y, resolve_active, ActiveSection, Section, SectionTracker,
    // Reveal
    crosses_threshold, RevealController, RevealPhase, Stagger,
    // Animation
    CountUp, RotationAnimator,
    // Pressure
    gauge_angle, gauge_arc_offset, pressure_score, risk_band, total_reduction, LeverCatalog,
    LeverOption, PressureModel, PressureResult, RiskBand, SelectionSet, GAUGE_ARC_LENGTH,
    // Navigation
    NavChrome,
    // Pick-one interactions
    Highlight,
};

pub use catalog::InteractionGroup;
