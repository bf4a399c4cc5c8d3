//! Vector outlines in font units.

use kurbo::{Affine, BezPath, Rect, Shape};

/// A glyph outline in font units (y up).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    path: BezPath,
}

impl Outline {
    pub fn new(path: BezPath) -> Self {
        Self { path }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Exact bounding box of the ink, `None` for an empty outline.
    pub fn bounds(&self) -> Option<Rect> {
        (!self.is_empty()).then(|| self.path.bounding_box())
    }

    /// Horizontal ink extent as `(min_x, max_x)`.
    pub fn horizontal_extent(&self) -> Option<(f64, f64)> {
        self.bounds().map(|r| (r.x0, r.x1))
    }

    /// Horizontal midpoint of the ink.
    pub fn center_x(&self) -> Option<f64> {
        self.horizontal_extent().map(|(min_x, max_x)| (min_x + max_x) / 2.0)
    }

    /// A copy of this outline with `affine` applied to every point.
    pub fn transformed(&self, affine: Affine) -> Self {
        let mut path = self.path.clone();
        path.apply_affine(affine);
        Self { path }
    }

    /// A copy shifted horizontally by `dx`.
    pub fn translated_x(&self, dx: f64) -> Self {
        self.transformed(Affine::translate((dx, 0.0)))
    }
}

impl From<BezPath> for Outline {
    fn from(path: BezPath) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_outline_has_no_bounds() {
        let outline = Outline::empty();
        assert!(outline.is_empty());
        assert_eq!(outline.bounds(), None);
        assert_eq!(outline.center_x(), None);
    }

    #[test]
    fn test_bounds_and_center() {
        let outline = Outline::new(Rect::new(100.0, 0.0, 300.0, 700.0).to_path(0.1));
        assert_eq!(outline.horizontal_extent(), Some((100.0, 300.0)));
        assert_eq!(outline.center_x(), Some(200.0));
    }

    #[test]
    fn test_translated_x_leaves_source_alone() {
        let source = Outline::new(Rect::new(0.0, 0.0, 50.0, 50.0).to_path(0.1));
        let moved = source.translated_x(25.0);

        assert_eq!(source.horizontal_extent(), Some((0.0, 50.0)));
        let bounds = moved.bounds().unwrap();
        assert_eq!((bounds.x0, bounds.x1), (25.0, 75.0));
        assert_eq!((bounds.y0, bounds.y1), (0.0, 50.0));
    }
}
