//! Governance Pressure Model - lever selection to risk gauge
//!
//! Pure computation over the set of selected governance levers:
//!
//! ```text
//! total_reduction = sum of selected impact weights
//! pressure_score  = max(floor, baseline - total_reduction)     (20, 85)
//! risk_band       = step function of pressure_score
//! gauge_angle     = -90 + 1.8 * score                          (degrees)
//! ```
//!
//! [`PressureModel`] owns the [`SelectionSet`] and is its only writer;
//! every derived value is recomputed from it on read, never stored.

use std::collections::BTreeSet;
use std::fmt;

use spark_signals::{signal, Signal};

use crate::config::PressureConfig;
use crate::error::{Error, Result};
use crate::types::Rgba;

// =============================================================================
// LEVER CATALOG
// =============================================================================

/// A user-toggleable governance option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeverOption {
    pub id: String,
    pub label: String,
    /// Pressure removed when selected (0-100).
    pub impact_weight: u8,
}

/// Fixed, closed set of levers. Ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeverCatalog {
    levers: Vec<LeverOption>,
}

impl LeverCatalog {
    /// Build a catalog, rejecting duplicate ids and weights above 100.
    pub fn new(levers: Vec<LeverOption>) -> Result<Self> {
        for (i, lever) in levers.iter().enumerate() {
            if lever.impact_weight > 100 {
                return Err(Error::InvalidLever {
                    id: lever.id.clone(),
                    reason: format!("impact weight {} exceeds 100", lever.impact_weight),
                });
            }
            if levers[..i].iter().any(|l| l.id == lever.id) {
                return Err(Error::InvalidLever {
                    id: lever.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
        }
        Ok(Self { levers })
    }

    /// Catalog from compiled-in data known to be valid.
    pub(crate) fn from_static(levers: Vec<LeverOption>) -> Self {
        debug_assert!(Self::new(levers.clone()).is_ok());
        Self { levers }
    }

    pub fn get(&self, id: &str) -> Option<&LeverOption> {
        self.levers.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Levers in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LeverOption> {
        self.levers.iter()
    }

    pub fn len(&self) -> usize {
        self.levers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levers.is_empty()
    }

    /// Sum of every lever's weight.
    pub fn total_weight(&self) -> u32 {
        self.levers.iter().map(|l| l.impact_weight as u32).sum()
    }
}

// =============================================================================
// SELECTION SET
// =============================================================================

/// Currently selected lever ids. No duplicates, order irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Add if absent, remove if present. Returns whether `id` is now selected.
    fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }
}

// =============================================================================
// RISK BAND
// =============================================================================

/// Discrete classification of a pressure score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskBand {
    /// `> 70` Critical, `> 50` High, `> 30` Moderate, otherwise Low.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s > 70 => Self::Critical,
            s if s > 50 => Self::High,
            s if s > 30 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Accent color used for the score, badge and needle glow.
    pub fn color(self) -> Rgba {
        match self {
            Self::Low => Rgba::from_rgb_int(0x10B981),
            Self::Moderate => Rgba::from_rgb_int(0x3B82F6),
            Self::High => Rgba::from_rgb_int(0xF59E0B),
            Self::Critical => Rgba::from_rgb_int(0xEF4444),
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// PURE FUNCTIONS
// =============================================================================

/// Length of the gauge's coloured arc path.
pub const GAUGE_ARC_LENGTH: f64 = 251.0;

/// Sum of the impact weights of the selected levers.
///
/// Ids absent from the catalog contribute nothing.
pub fn total_reduction(catalog: &LeverCatalog, selection: &SelectionSet) -> u32 {
    selection
        .iter()
        .filter_map(|id| catalog.get(id))
        .map(|l| l.impact_weight as u32)
        .sum()
}

/// `max(floor, baseline - total_reduction)`.
pub fn pressure_score(total_reduction: u32, config: &PressureConfig) -> u32 {
    config
        .baseline
        .saturating_sub(total_reduction)
        .max(config.floor)
}

pub fn risk_band(score: u32) -> RiskBand {
    RiskBand::from_score(score)
}

/// Needle angle for `score` in `[0, 100]`: -90 at 0, +90 at 100.
pub fn gauge_angle(score: f64) -> f64 {
    -90.0 + 1.8 * score.clamp(0.0, 100.0)
}

/// Stroke dash offset of the coloured arc for `score`.
pub fn gauge_arc_offset(score: f64) -> f64 {
    let score = score.clamp(0.0, 100.0);
    GAUGE_ARC_LENGTH - GAUGE_ARC_LENGTH * (100.0 - score) / 100.0
}

// =============================================================================
// PRESSURE RESULT
// =============================================================================

/// Everything the gauge renders, derived from one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureResult {
    pub total_reduction: u32,
    pub pressure_score: u32,
    pub risk_band: RiskBand,
}

impl PressureResult {
    pub fn compute(catalog: &LeverCatalog, selection: &SelectionSet, config: &PressureConfig) -> Self {
        let total_reduction = total_reduction(catalog, selection);
        let pressure_score = pressure_score(total_reduction, config);
        Self {
            total_reduction,
            pressure_score,
            risk_band: risk_band(pressure_score),
        }
    }

    pub fn gauge_angle(&self) -> f64 {
        gauge_angle(self.pressure_score as f64)
    }

    pub fn arc_offset(&self) -> f64 {
        gauge_arc_offset(self.pressure_score as f64)
    }

    /// Whether any lever reduced pressure (drives the impact summary line).
    pub fn has_reduction(&self) -> bool {
        self.total_reduction > 0
    }
}

// =============================================================================
// PRESSURE MODEL
// =============================================================================

/// Owner of the lever selection for the pressure dial.
pub struct PressureModel {
    catalog: LeverCatalog,
    config: PressureConfig,
    selection: Signal<SelectionSet>,
}

impl PressureModel {
    pub fn new(catalog: LeverCatalog, config: &PressureConfig) -> Self {
        Self {
            catalog,
            config: *config,
            selection: signal(SelectionSet::new()),
        }
    }

    /// Select `id` if unselected, deselect it otherwise.
    ///
    /// Fails with [`Error::UnknownLever`] for ids outside the catalog,
    /// leaving the selection untouched.
    pub fn toggle(&self, id: &str) -> Result<PressureResult> {
        if !self.catalog.contains(id) {
            tracing::warn!(id, "toggle of unknown lever");
            return Err(Error::UnknownLever(id.to_string()));
        }

        let mut selection = self.selection.get();
        let selected = selection.toggle(id);
        self.selection.set(selection);

        let result = self.result();
        tracing::debug!(
            id,
            selected,
            score = result.pressure_score,
            band = %result.risk_band,
            "lever toggled"
        );
        Ok(result)
    }

    /// Deselect every lever.
    pub fn clear(&self) {
        self.selection.set(SelectionSet::new());
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.get().contains(id)
    }

    /// Snapshot of the current selection.
    pub fn selection(&self) -> SelectionSet {
        self.selection.get()
    }

    /// Reactive selection for the lever list renderer.
    pub fn selection_signal(&self) -> Signal<SelectionSet> {
        self.selection.clone()
    }

    /// Derived gauge values for the current selection.
    pub fn result(&self) -> PressureResult {
        PressureResult::compute(&self.catalog, &self.selection.get(), &self.config)
    }

    pub fn catalog(&self) -> &LeverCatalog {
        &self.catalog
    }
}

// =============================================================================
// TESTS
// =============================================================================
