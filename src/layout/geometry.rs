//! Viewport geometry helpers.

use crate::state::Section;
use crate::types::ScrollSample;

/// Fraction of `section` inside the viewport described by `sample`.
///
/// Intersection height over section height, in `[0, 1]`. Empty sections
/// are never visible.
pub fn visible_fraction(section: &Section, sample: &ScrollSample) -> f64 {
    if section.dom_height <= 0.0 {
        return 0.0;
    }
    let top = section.dom_top.max(sample.scroll_y);
    let bottom = section.bottom().min(sample.viewport_bottom());
    ((bottom - top).max(0.0) / section.dom_height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_visible() {
        let section = Section::new("a", 0, 100.0, 200.0);
        assert_eq!(visible_fraction(&section, &ScrollSample::new(0.0, 800.0)), 1.0);
    }

    #[test]
    fn test_partially_visible() {
        let section = Section::new("a", 0, 700.0, 1000.0);
        // viewport [0, 800) shows 100 of 1000
        assert_eq!(visible_fraction(&section, &ScrollSample::new(0.0, 800.0)), 0.1);
        // viewport [1500, 2300) shows 200 of 1000
        assert_eq!(visible_fraction(&section, &ScrollSample::new(1500.0, 800.0)), 0.2);
    }

    #[test]
    fn test_not_visible() {
        let section = Section::new("a", 0, 900.0, 100.0);
        assert_eq!(visible_fraction(&section, &ScrollSample::new(0.0, 800.0)), 0.0);
        assert_eq!(visible_fraction(&section, &ScrollSample::new(2000.0, 800.0)), 0.0);
    }

    #[test]
    fn test_empty_section() {
        let section = Section::new("a", 0, 0.0, 0.0);
        assert_eq!(visible_fraction(&section, &ScrollSample::new(0.0, 800.0)), 0.0);
    }
}
