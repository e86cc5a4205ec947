//! Engine configuration.
//!
//! Every tunable constant of the interaction engines lives here. All fields
//! have defaults matching the shipped page, so an empty TOML document is a
//! valid configuration.
//!
//! # Example
//!
//! ```
//! use spark_page::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     [reveal]
//!     default_threshold = 0.2
//! "#).unwrap();
//!
//! assert_eq!(config.reveal.default_threshold, 0.2);
//! assert_eq!(config.pressure.baseline, 85);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Top-level configuration for a mounted page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tracker: TrackerConfig,
    pub reveal: RevealConfig,
    pub rotation: RotationConfig,
    pub pressure: PressureConfig,
    pub count_up: CountUpConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        tracing::debug!(?config, "loaded engine config");
        Ok(config)
    }

    /// Reject values the engines cannot honour.
    ///
    /// Fractions must lie in `[0, 1]`, delays must be non-negative and the
    /// pressure range must satisfy `floor <= baseline <= 100`.
    pub fn validate(&self) -> Result<()> {
        check_fraction("tracker.probe_fraction", self.tracker.probe_fraction)?;
        check_fraction("reveal.default_threshold", self.reveal.default_threshold)?;
        if !(self.reveal.entry_delay_ms >= 0.0) {
            return Err(invalid(format!(
                "reveal.entry_delay_ms {} is negative",
                self.reveal.entry_delay_ms
            )));
        }

        let PressureConfig { baseline, floor } = self.pressure;
        if baseline > MAX_SCORE {
            return Err(invalid(format!(
                "pressure.baseline {baseline} exceeds {MAX_SCORE}"
            )));
        }
        if floor > baseline {
            return Err(invalid(format!(
                "pressure.floor {floor} exceeds pressure.baseline {baseline}"
            )));
        }
        Ok(())
    }
}

/// Upper end of the gauge's score domain.
pub const MAX_SCORE: u32 = 100;

fn check_fraction(key: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{key} {value} outside [0, 1]")))
    }
}

fn invalid(reason: String) -> Error {
    tracing::warn!(%reason, "rejected engine config");
    Error::InvalidConfig(reason)
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Section tracker and navigation chrome settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Where the probe line sits, as a fraction of the viewport height.
    pub probe_fraction: f64,
    /// Scroll offset past which the navigation bar switches to its solid style.
    pub scrolled_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            probe_fraction: 1.0 / 3.0,
            scrolled_threshold: 100.0,
        }
    }
}

/// Reveal controller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction that triggers a reveal when a section gives none.
    pub default_threshold: f64,
    /// Delay of mount-timed entries, measured from the first frame.
    pub entry_delay_ms: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.1,
            entry_delay_ms: 100.0,
        }
    }
}

// =============================================================================
// ANIMATION
// =============================================================================

/// How the rotation animator converts clock ticks into angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "degrees")]
pub enum RotationMode {
    /// Fixed increment per display frame. Speed follows the refresh rate.
    PerFrame,
    /// Degrees per second of tick timestamps, independent of refresh rate.
    PerSecond(f64),
}

impl Default for RotationMode {
    fn default() -> Self {
        Self::PerFrame
    }
}

/// Rotation animator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Degrees added per frame in [`RotationMode::PerFrame`].
    pub increment: f64,
    pub mode: RotationMode,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            increment: 0.02,
            mode: RotationMode::PerFrame,
        }
    }
}

/// Count-up stat animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountUpConfig {
    /// Amount added per interval tick.
    pub step: f64,
    /// Interval between ticks in milliseconds.
    pub interval_ms: u64,
}

impl Default for CountUpConfig {
    fn default() -> Self {
        Self {
            step: 0.5,
            interval_ms: 30,
        }
    }
}

// =============================================================================
// PRESSURE
// =============================================================================

/// Governance pressure model constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    /// Pressure with no levers selected.
    pub baseline: u32,
    /// Residual pressure no combination of levers can remove.
    pub floor: u32,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            baseline: 85,
            floor: 20,
        }
    }
}
