//! Static reference data consumed by the engines.
//!
//! Section ids in page order, navigation entries, the option lists of the
//! pick-one interactions, and the governance lever catalog with its impact
//! weights. Copy text beyond labels lives with the
//! renderers.

use crate::state::{LeverCatalog, LeverOption, Stagger};

// =============================================================================
// SECTIONS
// =============================================================================

/// Tracked page sections, in page order.
pub const PAGE_SECTIONS: [&str; 8] = [
    "hero",
    "evidence",
    "mechanisms",
    "risk",
    "impact",
    "dial",
    "action",
    "footer",
];

/// Reveal threshold of a section, for sections that reveal on visibility.
///
/// Sections not listed use the configured default.
pub fn reveal_threshold(section_id: &str) -> Option<f64> {
    match section_id {
        "evidence" => Some(0.2),
        "mechanisms" | "risk" | "impact" | "dial" | "action" => Some(0.1),
        _ => None,
    }
}

/// Staged transition delays of a section's repeated parts (cards, levers).
pub fn stagger(section_id: &str) -> Stagger {
    match section_id {
        "dial" => Stagger::new(400, 50),
        "action" => Stagger::new(200, 100),
        _ => Stagger::new(0, 100),
    }
}

/// Progress stats that count up once their section reveals.
pub fn progress_stats(section_id: &str) -> &'static [f64] {
    match section_id {
        "evidence" => &[12.5],
        _ => &[],
    }
}

/// Sections whose entry plays on a timer after mount rather than on
/// visibility.
pub fn entry_on_mount(section_id: &str) -> bool {
    section_id == "hero"
}

// =============================================================================
// INTERACTIONS
// =============================================================================

/// The pick-one interaction groups on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionGroup {
    /// Hero pathway nodes, in causal order.
    PathwayNode,
    /// Expandable mechanism cards.
    MechanismCard,
    /// Extinction-risk scenario switch.
    Scenario,
    /// Milestones on the scenario timeline.
    Milestone,
    /// Ecological impact levels.
    ImpactLevel,
}

impl InteractionGroup {
    pub const ALL: [Self; 5] = [
        Self::PathwayNode,
        Self::MechanismCard,
        Self::Scenario,
        Self::Milestone,
        Self::ImpactLevel,
    ];

    /// Option ids of the group, in display order.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::PathwayNode => &[
                "ai-automation",
                "industrial-efficiency",
                "agriculture-scale",
                "land-conversion",
                "habitat-loss",
                "accelerated-extinction",
                "ecological-collapse",
            ],
            Self::MechanismCard => &["plf", "logistics", "rebound"],
            Self::Scenario => &["uncapped", "capped"],
            Self::Milestone => &["2025", "2050", "2075"],
            Self::ImpactLevel => &[
                "species-loss",
                "food-web",
                "resilience",
                "carbon-storage",
                "disease-risk",
            ],
        }
    }

    /// Option active at mount. Only the scenario switch always has one.
    pub fn initial(self) -> Option<&'static str> {
        match self {
            Self::Scenario => Some("uncapped"),
            _ => None,
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// A navigation bar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
}

/// Navigation entries. The footer is tracked but has no entry.
pub const NAV_ITEMS: [NavItem; 7] = [
    NavItem { id: "hero", label: "Pathway" },
    NavItem { id: "evidence", label: "Evidence" },
    NavItem { id: "mechanisms", label: "AI Impact" },
    NavItem { id: "risk", label: "Risk" },
    NavItem { id: "impact", label: "Impact" },
    NavItem { id: "dial", label: "Dial" },
    NavItem { id: "action", label: "Action" },
];

// =============================================================================
// GOVERNANCE LEVERS
// =============================================================================

fn lever(id: &str, label: &str, impact_weight: u8) -> LeverOption {
    LeverOption {
        id: id.to_string(),
        label: label.to_string(),
        impact_weight,
    }
}

/// The pressure dial's governance levers.
pub fn governance_levers() -> LeverCatalog {
    LeverCatalog::from_static(vec![
        lever("land", "Land Protections", 15),
        lever("supply", "Deforestation-Free Supply Chains", 20),
        lever("accounting", "Carbon & Biodiversity Accounting", 10),
        lever("subsidies", "Subsidy Reform", 15),
        lever("ai", "AI Governance Conditions", 20),
    ])
}
