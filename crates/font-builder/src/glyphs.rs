//! Glyph order and TrueType outline conversion.

use font_types::GlyphId;
use indexmap::{IndexMap, map::Entry};
use kurbo::{BezPath, CubicBez, PathEl, Point};
use write_fonts::tables::glyf::{Glyph, SimpleGlyph};

use crate::{Error, Result};

/// Maximum error, in font units, when approximating cubics with quadratics.
const QUAD_ACCURACY: f64 = 0.5;

/// A glyph waiting to be written.
#[derive(Debug, Clone)]
pub struct GlyphEntry {
    pub advance_width: u16,
    pub codepoint: Option<char>,
    pub glyph: Glyph,
}

impl GlyphEntry {
    /// Left side bearing, taken from the outline's bounding box.
    pub fn left_side_bearing(&self) -> i16 {
        match &self.glyph {
            Glyph::Simple(simple) => simple.bbox.x_min,
            _ => 0,
        }
    }

    pub fn num_points(&self) -> usize {
        match &self.glyph {
            Glyph::Simple(simple) => simple.contours.iter().map(|c| c.len()).sum(),
            _ => 0,
        }
    }

    pub fn num_contours(&self) -> usize {
        match &self.glyph {
            Glyph::Simple(simple) => simple.contours.len(),
            _ => 0,
        }
    }
}

/// Glyphs keyed by name, in glyph id order.
#[derive(Debug, Default)]
pub struct GlyphSet {
    glyphs: IndexMap<String, GlyphEntry>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a glyph, assigning it the next glyph id.
    pub fn insert(&mut self, name: impl Into<String>, entry: GlyphEntry) -> Result<GlyphId> {
        let gid = self.glyphs.len();
        if gid >= usize::from(u16::MAX) {
            return Err(Error::TooManyGlyphs(gid + 1));
        }
        match self.glyphs.entry(name.into()) {
            Entry::Occupied(e) => Err(Error::DuplicateGlyph(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(entry);
                Ok(GlyphId::new(gid as u32))
            }
        }
    }

    pub fn glyph_id(&self, name: &str) -> Option<GlyphId> {
        self.glyphs.get_index_of(name).map(|i| GlyphId::new(i as u32))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.glyphs.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &GlyphEntry> {
        self.glyphs.values()
    }

    /// `(codepoint, glyph id)` pairs for every encoded glyph.
    pub fn mappings(&self) -> Vec<(char, GlyphId)> {
        self.glyphs
            .values()
            .enumerate()
            .filter_map(|(i, entry)| entry.codepoint.map(|c| (c, GlyphId::new(i as u32))))
            .collect()
    }
}

/// Rewrite cubic segments as runs of quadratics.
pub fn to_quadratic(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(p);
                start = p;
                current = p;
            }
            PathEl::LineTo(p) => {
                out.line_to(p);
                current = p;
            }
            PathEl::QuadTo(p1, p2) => {
                out.quad_to(p1, p2);
                current = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                for (_, _, quad) in CubicBez::new(current, p1, p2, p3).to_quads(QUAD_ACCURACY) {
                    out.quad_to(quad.p1, quad.p2);
                }
                current = p3;
            }
            PathEl::ClosePath => {
                out.close_path();
                current = start;
            }
        }
    }
    out
}

/// Build a `glyf` glyph from an outline; empty outlines become empty glyphs.
pub fn glyph_from_path(name: &str, path: &BezPath) -> Result<Glyph> {
    if path.elements().is_empty() {
        return Ok(Glyph::Empty);
    }
    let simple = SimpleGlyph::from_bezpath(&to_quadratic(path))
        .map_err(|e| Error::Outline { name: name.to_string(), message: format!("{e:?}") })?;
    Ok(Glyph::Simple(simple))
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Shape};

    use super::*;

    fn empty(codepoint: Option<char>) -> GlyphEntry {
        GlyphEntry { advance_width: 600, codepoint, glyph: Glyph::Empty }
    }

    #[test]
    fn test_glyph_ids_follow_insertion_order() {
        let mut set = GlyphSet::new();
        assert_eq!(set.insert(".notdef", empty(None)).unwrap(), GlyphId::new(0));
        assert_eq!(set.insert("zero", empty(Some('0'))).unwrap(), GlyphId::new(1));
        assert_eq!(set.insert("cistercian_0001", empty(None)).unwrap(), GlyphId::new(2));

        assert_eq!(set.glyph_id("zero"), Some(GlyphId::new(1)));
        assert_eq!(set.glyph_id("missing"), None);
        assert_eq!(set.names().collect::<Vec<_>>(), [".notdef", "zero", "cistercian_0001"]);
        assert_eq!(set.mappings(), vec![('0', GlyphId::new(1))]);
    }

    #[test]
    fn test_glyph_count_stops_at_65535() {
        let mut set = GlyphSet::new();
        for i in 0..u16::MAX {
            set.insert(format!("g{i}"), empty(None)).unwrap();
        }
        assert_eq!(set.len(), 65535);
        let err = set.insert("overflow", empty(None)).unwrap_err();
        assert!(matches!(err, Error::TooManyGlyphs(65536)));
        assert_eq!(set.len(), 65535);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut set = GlyphSet::new();
        set.insert("zero", empty(Some('0'))).unwrap();
        let err = set.insert("zero", empty(None)).unwrap_err();
        assert!(matches!(err, Error::DuplicateGlyph(name) if name == "zero"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_to_quadratic_removes_cubics() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        path.close_path();

        let quad = to_quadratic(&path);
        assert!(!quad.elements().iter().any(|el| matches!(el, PathEl::CurveTo(..))));
        assert!(quad.elements().iter().any(|el| matches!(el, PathEl::QuadTo(..))));
        assert_eq!(quad.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn test_glyph_from_path() {
        let path = Rect::new(240.0, 0.0, 360.0, 700.0).to_path(0.1);
        let entry = GlyphEntry {
            advance_width: 600,
            codepoint: None,
            glyph: glyph_from_path("bar", &path).unwrap(),
        };
        assert_eq!(entry.left_side_bearing(), 240);
        assert_eq!(entry.num_contours(), 1);
        assert_eq!(entry.num_points(), 4);
    }

    #[test]
    fn test_empty_path_is_empty_glyph() {
        let glyph = glyph_from_path("blank", &BezPath::new()).unwrap();
        assert!(matches!(glyph, Glyph::Empty));
    }
}
