//! Layout Module - section geometry for the host page
//!
//! The page is a single column of sections. [`PageLayout`] resolves their
//! spans with [Taffy](https://github.com/DioxusLabs/taffy) for a given
//! viewport; [`visible_fraction`] turns a span and a scroll sample into the
//! visibility the reveal controllers observe.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::layout::{PageLayout, SectionBlock, SectionHeight};
//!
//! let layout = PageLayout::new(vec![
//!     SectionBlock::new("hero", SectionHeight::Viewport(1.0)),
//!     SectionBlock::new("evidence", SectionHeight::Pixels(1400.0)),
//! ]);
//! let sections = layout.compute(1280.0, 800.0)?;
//! tracker.replace_sections(sections)?;
//! ```

mod geometry;
mod page_layout;

pub use geometry::visible_fraction;
pub use page_layout::{PageLayout, SectionBlock, SectionHeight};
