//! # Glyph Normalizer
//!
//! Imports numeral outlines and fits them into their glyph's advance width.
//!
//! Normalization is a pure horizontal shift that puts the midpoint of the
//! outline's ink on the midpoint of the advance box. Outlines are never
//! scaled or moved vertically, and empty outlines pass through untouched.

mod batch;
mod error;
mod outline;
mod svg;

pub use batch::{ImportReport, OutlineSource, SkipReason, Skipped, normalize_all};
pub use error::{Error, Result};
pub use outline::Outline;
pub use svg::{ImportMetrics, SvgDirectory, parse_svg};

/// Largest numeral with a glyph.
pub const N_MAX: u16 = 9999;

/// Glyph metadata for one numeral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumeralGlyph {
    pub numeral: u16,
    pub glyph_name: String,
    pub advance_width: u16,
}

impl NumeralGlyph {
    pub fn new(numeral: u16, glyph_name: impl Into<String>, advance_width: u16) -> Self {
        Self { numeral, glyph_name: glyph_name.into(), advance_width }
    }
}

/// A numeral glyph with its outline centered in the advance box.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGlyph {
    pub numeral: u16,
    pub glyph_name: String,
    pub advance_width: u16,
    pub outline: Outline,
}

/// Horizontal shift that centers ink spanning `[min_x, max_x]` in `advance_width`.
///
/// `None` for degenerate ink (`min_x == max_x`), which must not be moved.
pub fn centering_offset(min_x: f64, max_x: f64, advance_width: f64) -> Option<f64> {
    if min_x == max_x {
        return None;
    }
    let actual_width = max_x - min_x;
    Some((advance_width - actual_width) / 2.0 - min_x)
}

/// Center `outline` inside `glyph`'s advance width.
///
/// The input outline is left as is; the result holds a transformed copy.
pub fn normalize(glyph: &NumeralGlyph, outline: &Outline) -> NormalizedGlyph {
    let offset = outline
        .horizontal_extent()
        .and_then(|(min_x, max_x)| centering_offset(min_x, max_x, f64::from(glyph.advance_width)));

    let outline = match offset {
        Some(dx) => outline.translated_x(dx),
        None => outline.clone(),
    };

    NormalizedGlyph {
        numeral: glyph.numeral,
        glyph_name: glyph.glyph_name.clone(),
        advance_width: glyph.advance_width,
        outline,
    }
}
