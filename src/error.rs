//! Error types for spark-page.
//!
//! Only contract violations surface as errors. Transient conditions such as
//! scroll samples arriving before any geometry is registered, or callbacks
//! for torn-down elements, are no-ops and never reach this type.

use thiserror::Error;

use crate::types::ElementId;

/// Result type for spark-page operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in spark-page operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Lever id outside the fixed catalog
    #[error("Unknown lever: {0}")]
    UnknownLever(String),

    /// Catalog entry rejected at construction
    #[error("Invalid lever {id}: {reason}")]
    InvalidLever { id: String, reason: String },

    /// Observation requested for an element that is not mounted
    #[error("Target {0} is detached")]
    DetachedTarget(ElementId),

    /// Reveal threshold outside [0, 1]
    #[error("Invalid reveal threshold: {0}")]
    InvalidThreshold(f64),

    /// Navigation or geometry update for an unregistered section
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Section id registered twice
    #[error("Duplicate section: {0}")]
    DuplicateSection(String),

    /// Highlight target outside its option list
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// Option id listed twice in one highlight group
    #[error("Duplicate option: {0}")]
    DuplicateOption(String),

    /// Layout engine failure
    #[error("Layout error: {0}")]
    Layout(String),

    /// Configuration value outside what the engines accept
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration parse failure
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<taffy::TaffyError> for Error {
    fn from(e: taffy::TaffyError) -> Self {
        Error::Layout(e.to_string())
    }
}
