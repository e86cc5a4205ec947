//! Page Layout - section geometry via Taffy
//!
//! Sections stack in a single flex column. Given the viewport size, Taffy
//! resolves every section's top and height; the result feeds the section
//! tracker and the visibility reports. Re-run on every resize.

use taffy::{
    AvailableSpace, Dimension, FlexDirection, LengthPercentage, NodeId, Size, Style, TaffyTree,
};

use crate::error::Result;
use crate::state::Section;

// =============================================================================
// SECTION BLOCKS
// =============================================================================

/// Declared height of a section block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionHeight {
    /// Fixed height in pixels.
    Pixels(f32),
    /// Multiple of the viewport height (1.0 = full screen).
    Viewport(f32),
}

impl SectionHeight {
    fn resolve(self, viewport_height: f32) -> f32 {
        match self {
            Self::Pixels(px) => px.max(0.0),
            Self::Viewport(factor) => (factor * viewport_height).max(0.0),
        }
    }
}

/// One section as declared by the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBlock {
    pub id: String,
    pub height: SectionHeight,
}

impl SectionBlock {
    pub fn new(id: impl Into<String>, height: SectionHeight) -> Self {
        Self {
            id: id.into(),
            height,
        }
    }
}

// =============================================================================
// PAGE LAYOUT
// =============================================================================

/// Vertical stack of section blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    blocks: Vec<SectionBlock>,
    /// Space between consecutive sections.
    gap: f32,
}

impl PageLayout {
    pub fn new(blocks: Vec<SectionBlock>) -> Self {
        Self { blocks, gap: 0.0 }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    pub fn blocks(&self) -> &[SectionBlock] {
        &self.blocks
    }

    /// Resolve section geometry for a viewport. Sections keep declaration
    /// order as their `order_index`.
    pub fn compute(&self, viewport_width: f32, viewport_height: f32) -> Result<Vec<Section>> {
        if self.blocks.is_empty() {
            return Ok(Vec::new());
        }

        let mut tree: TaffyTree<()> = TaffyTree::new();

        let children = self
            .blocks
            .iter()
            .map(|block| {
                tree.new_leaf(Style {
                    size: Size {
                        width: Dimension::Percent(1.0),
                        height: Dimension::Length(block.height.resolve(viewport_height)),
                    },
                    flex_shrink: 0.0,
                    ..Default::default()
                })
            })
            .collect::<std::result::Result<Vec<NodeId>, _>>()?;

        let root = tree.new_with_children(
            Style {
                flex_direction: FlexDirection::Column,
                size: Size {
                    width: Dimension::Length(viewport_width),
                    height: Dimension::Auto,
                },
                gap: Size {
                    width: LengthPercentage::Length(0.0),
                    height: LengthPercentage::Length(self.gap),
                },
                ..Default::default()
            },
            &children,
        )?;

        tree.compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(viewport_width),
                height: AvailableSpace::MaxContent,
            },
        )?;

        let mut sections = Vec::with_capacity(self.blocks.len());
        for (order_index, (block, node)) in self.blocks.iter().zip(&children).enumerate() {
            let layout = tree.layout(*node)?;
            sections.push(Section::new(
                block.id.clone(),
                order_index,
                layout.location.y as f64,
                layout.size.height as f64,
            ));
        }

        tracing::debug!(
            sections = sections.len(),
            viewport_width,
            viewport_height,
            "page layout computed"
        );
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> PageLayout {
        PageLayout::new(vec![
            SectionBlock::new("hero", SectionHeight::Viewport(1.0)),
            SectionBlock::new("evidence", SectionHeight::Pixels(1200.0)),
            SectionBlock::new("dial", SectionHeight::Pixels(900.0)),
        ])
    }

    #[test]
    fn test_contiguous_sections() {
        let sections = setup().compute(1280.0, 800.0).unwrap();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].id, "hero");
        assert_eq!(sections[0].dom_top, 0.0);
        assert_eq!(sections[0].dom_height, 800.0);
        assert_eq!(sections[1].dom_top, 800.0);
        assert_eq!(sections[1].dom_height, 1200.0);
        assert_eq!(sections[2].dom_top, 2000.0);
        assert_eq!(sections[2].order_index, 2);
    }

    #[test]
    fn test_viewport_resize_moves_sections() {
        let layout = setup();
        let small = layout.compute(390.0, 600.0).unwrap();
        assert_eq!(small[0].dom_height, 600.0);
        assert_eq!(small[1].dom_top, 600.0);
    }

    #[test]
    fn test_gap_between_sections() {
        let sections = setup().with_gap(40.0).compute(1280.0, 800.0).unwrap();
        assert_eq!(sections[1].dom_top, 840.0);
        assert_eq!(sections[2].dom_top, 2080.0);
    }

    #[test]
    fn test_empty_layout() {
        assert!(PageLayout::default().compute(800.0, 600.0).unwrap().is_empty());
    }
}
