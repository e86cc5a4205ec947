//! Highlight - at most one emphasised option within a fixed group
//!
//! The small pick-one interactions of the page all share this shape:
//! - pathway nodes (hover or tap one; earlier nodes read as "past")
//! - mechanism cards (expanding one collapses the others)
//! - scenario switch (always one of uncapped / capped)
//! - timeline milestones and impact levels (hover)
//!
//! The option list is fixed at construction and every id is validated
//! against it. The active id is a signal with this engine as its only
//! writer.

use spark_signals::{signal, Signal};

use crate::error::{Error, Result};

/// One pick-at-most-one group.
pub struct Highlight {
    options: Vec<String>,
    active: Signal<Option<String>>,
}

impl Highlight {
    /// A group with nothing active.
    pub fn new<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Result<Self> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        for (i, id) in options.iter().enumerate() {
            if options[..i].contains(id) {
                return Err(Error::DuplicateOption(id.clone()));
            }
        }
        Ok(Self {
            options,
            active: signal(None),
        })
    }

    /// A group starting with `initial` active.
    pub fn with_initial<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        initial: &str,
    ) -> Result<Self> {
        let highlight = Self::new(options)?;
        highlight.select(initial)?;
        Ok(highlight)
    }

    /// Make `id` the active option. Returns whether the active id changed.
    pub fn select(&self, id: &str) -> Result<bool> {
        self.check(id)?;
        if self.is_active(id) {
            return Ok(false);
        }
        self.active.set(Some(id.to_string()));
        tracing::trace!(id, "highlight selected");
        Ok(true)
    }

    /// Activate `id`, or clear it if it is already active.
    ///
    /// Returns the new active id.
    pub fn toggle(&self, id: &str) -> Result<Option<String>> {
        self.check(id)?;
        let next = if self.is_active(id) {
            None
        } else {
            Some(id.to_string())
        };
        self.active.set(next.clone());
        Ok(next)
    }

    /// Clear the active option. Returns whether anything was active.
    pub fn clear(&self) -> bool {
        if self.active.get().is_none() {
            return false;
        }
        self.active.set(None);
        true
    }

    pub fn active(&self) -> Option<String> {
        self.active.get()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.get().as_deref() == Some(id)
    }

    /// Position of the active option in the group.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active.get()?;
        self.index_of(&active)
    }

    /// Whether `id` comes before the active option. False when nothing is
    /// active or `id` is unknown.
    pub fn is_past(&self, id: &str) -> bool {
        match (self.index_of(id), self.active_index()) {
            (Some(index), Some(active)) => index < active,
            _ => false,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn active_signal(&self) -> Signal<Option<String>> {
        self.active.clone()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|o| o == id)
    }

    fn check(&self, id: &str) -> Result<()> {
        if self.index_of(id).is_some() {
            Ok(())
        } else {
            tracing::warn!(id, "unknown highlight option");
            Err(Error::UnknownOption(id.to_string()))
        }
    }
}
