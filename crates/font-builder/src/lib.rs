//! # Font Builder
//!
//! Assembles normalized numeral glyphs and a compiled ligature program
//! into a TrueType font.
//!
//! The glyph order is `.notdef`, the ten ASCII digit glyphs (encoded at
//! U+0030 to U+0039), then one unencoded glyph per numeral. Numeral glyphs
//! are reachable only through the `GSUB` ligatures.
//!
//! ```no_run
//! use feature_compiler::{LigatureMapping, RuleCompiler};
//! use font_builder::{FontAssembler, FontInfo, FontMetrics};
//!
//! # fn main() -> font_builder::Result<()> {
//! let info = FontInfo::new("Cistercian", FontMetrics::new(1000, 800, -200)?);
//! let mut font = FontAssembler::new(info)?;
//! font.add_basic_digits()?;
//! // font.add_numeral_glyphs(&normalized)?;
//!
//! let program = RuleCompiler::default()
//!     .compile(&[LigatureMapping::new("1", "one")])
//!     .expect("valid mappings");
//! font.merge_features(&program)?;
//! let ttf: Vec<u8> = font.build()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod glyphs;
mod gsub;
mod tables;
mod version;

use chrono::{DateTime, Utc};
use feature_compiler::{DIGIT_GLYPH_NAMES, MAX_INPUT_LEN, RuleProgram};
use font_types::GlyphId;
use glyph_normalizer::NormalizedGlyph;
use kurbo::BezPath;
use log::{debug, info, warn};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, Glyph},
        gsub::Gsub,
    },
};

pub use error::{Error, Result};
pub use glyphs::{GlyphEntry, GlyphSet, glyph_from_path, to_quadratic};
pub use gsub::{MergeSummary, build_gsub};
pub use tables::GlyphStats;
pub use version::FontVersion;

/// Advance width of `.notdef` and the ASCII digit glyphs.
pub const DIGIT_ADVANCE_WIDTH: u16 = 600;

/// Name of the fallback glyph at glyph id 0.
pub const NOTDEF: &str = ".notdef";

/// Vertical font metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    /// Negative below the baseline.
    pub descender: i16,
}

impl FontMetrics {
    /// Validate and create metrics. `descender` may be given with either sign.
    pub fn new(units_per_em: u16, ascender: i16, descender: i16) -> Result<Self> {
        if !(16..=16384).contains(&units_per_em) {
            return Err(Error::InvalidMetrics(format!(
                "unitsPerEm {units_per_em} outside 16..=16384"
            )));
        }
        if ascender < 0 {
            return Err(Error::InvalidMetrics(format!("ascender {ascender} is negative")));
        }
        Ok(Self { units_per_em, ascender, descender: -descender.saturating_abs() })
    }
}

/// Naming and versioning for the assembled font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    pub family_name: String,
    pub style_name: String,
    pub full_name: String,
    pub postscript_name: String,
    pub copyright: String,
    pub version: FontVersion,
    pub metrics: FontMetrics,
}

impl FontInfo {
    pub fn new(family_name: impl Into<String>, metrics: FontMetrics) -> Self {
        let family_name = family_name.into();
        let style_name = "Regular".to_string();
        let postscript_name = format!("{}-{style_name}", family_name.replace(' ', ""));
        Self {
            full_name: family_name.clone(),
            family_name,
            style_name,
            postscript_name,
            copyright: String::new(),
            version: FontVersion::default(),
            metrics,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn with_version(mut self, version: FontVersion) -> Self {
        self.version = version;
        self
    }
}

/// Collects glyphs and substitution rules, then writes a TrueType font.
#[derive(Debug)]
pub struct FontAssembler {
    info: FontInfo,
    glyphs: GlyphSet,
    gsub: Option<Gsub>,
    timestamp: DateTime<Utc>,
}

impl FontAssembler {
    /// Start a font holding only `.notdef`.
    pub fn new(info: FontInfo) -> Result<Self> {
        let mut glyphs = GlyphSet::new();
        let notdef = GlyphEntry {
            advance_width: DIGIT_ADVANCE_WIDTH,
            codepoint: None,
            glyph: Glyph::Empty,
        };
        glyphs.insert(NOTDEF, notdef)?;
        Ok(Self { info, glyphs, gsub: None, timestamp: Utc::now() })
    }

    /// Use a fixed creation/modification time instead of the current time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn info(&self) -> &FontInfo {
        &self.info
    }

    pub fn glyphs(&self) -> &GlyphSet {
        &self.glyphs
    }

    pub fn glyph_id(&self, name: &str) -> Option<GlyphId> {
        self.glyphs.glyph_id(name)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn has_features(&self) -> bool {
        self.gsub.is_some()
    }

    /// Append a glyph built from `path`.
    pub fn add_glyph(
        &mut self,
        name: &str,
        advance_width: u16,
        codepoint: Option<char>,
        path: &BezPath,
    ) -> Result<GlyphId> {
        let glyph = glyph_from_path(name, path)?;
        self.glyphs.insert(name, GlyphEntry { advance_width, codepoint, glyph })
    }

    /// Add empty `zero`..`nine` glyphs mapped to U+0030..U+0039.
    pub fn add_basic_digits(&mut self) -> Result<()> {
        for (digit, name) in DIGIT_GLYPH_NAMES {
            self.add_glyph(name, DIGIT_ADVANCE_WIDTH, Some(digit), &BezPath::new())?;
        }
        debug!("Added {} basic digit glyphs", DIGIT_GLYPH_NAMES.len());
        Ok(())
    }

    /// Add unencoded numeral glyphs in the given order.
    pub fn add_numeral_glyphs(&mut self, glyphs: &[NormalizedGlyph]) -> Result<usize> {
        for glyph in glyphs {
            self.add_glyph(&glyph.glyph_name, glyph.advance_width, None, glyph.outline.path())?;
        }
        debug!("Added {} numeral glyphs", glyphs.len());
        Ok(glyphs.len())
    }

    /// Compile `program` into `GSUB`.
    ///
    /// Rules naming a glyph the font lacks are dropped and counted in the
    /// returned summary; the remaining rules keep their order. When no rule
    /// survives, or on error, the font is left without substitution
    /// features. An empty program removes any previously merged features.
    pub fn merge_features(&mut self, program: &RuleProgram) -> Result<MergeSummary> {
        self.gsub = None;
        if program.is_empty() {
            info!("No ligature rules; skipping GSUB");
            return Ok(MergeSummary::default());
        }
        let (gsub, summary) = build_gsub(&self.glyphs, program)?;
        if summary.merged == 0 {
            warn!("None of {} ligature rules resolve; skipping GSUB", summary.dropped);
            return Ok(summary);
        }
        debug!(
            "Merged {} of {} rules in {} subtables",
            summary.merged,
            program.rule_count(),
            program.subtables().len()
        );
        self.gsub = Some(gsub);
        Ok(summary)
    }

    /// Serialize the font.
    pub fn build(self) -> Result<Vec<u8>> {
        let num_glyphs = u16::try_from(self.glyphs.len())
            .map_err(|_| Error::TooManyGlyphs(self.glyphs.len()))?;

        let mut glyf_builder = GlyfLocaBuilder::new();
        for entry in self.glyphs.entries() {
            glyf_builder.add_glyph(&entry.glyph)?;
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let mappings = self.glyphs.mappings();
        let first = mappings.iter().map(|(c, _)| *c).min();
        let last = mappings.iter().map(|(c, _)| *c).max();
        let codepoints = match (first, last) {
            (Some(first), Some(last)) => (bmp_index(first), bmp_index(last)),
            _ => (0, 0),
        };
        let cmap = Cmap::from_mappings(mappings).map_err(|e| Error::Cmap(format!("{e:?}")))?;

        let stats = GlyphStats::collect(&self.glyphs);
        let max_context = if self.gsub.is_some() { MAX_INPUT_LEN as u16 } else { 0 };

        let mut builder = FontBuilder::new();
        builder.add_table(&tables::build_head(&self.info, &stats, loca_format, self.timestamp))?;
        builder.add_table(&tables::build_hhea(&self.info, &stats, num_glyphs))?;
        builder.add_table(&tables::build_hmtx(&self.glyphs))?;
        builder.add_table(&tables::build_maxp(&stats, num_glyphs))?;
        builder.add_table(&tables::build_os2(&self.info, &stats, codepoints, max_context))?;
        builder.add_table(&tables::build_post(&self.glyphs))?;
        builder.add_table(&cmap)?;
        builder.add_table(&tables::build_name(&self.info))?;
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;
        if let Some(gsub) = &self.gsub {
            builder.add_table(gsub)?;
        }

        let data = builder.build();
        info!("Assembled font: {num_glyphs} glyphs, {} bytes", data.len());
        Ok(data)
    }
}

/// OS/2 char index, clamped to the BMP.
fn bmp_index(c: char) -> u16 {
    u16::try_from(u32::from(c)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics::new(1000, 800, -200).unwrap()
    }

    #[test]
    fn test_metrics_descender_sign() {
        assert_eq!(FontMetrics::new(1000, 800, 200).unwrap().descender, -200);
        assert_eq!(metrics().descender, -200);
    }

    #[test]
    fn test_metrics_invalid() {
        assert!(FontMetrics::new(0, 800, -200).is_err());
        assert!(FontMetrics::new(1000, -1, -200).is_err());
    }

    #[test]
    fn test_font_info_names() {
        let info = FontInfo::new("Cistercian Numerals", metrics());
        assert_eq!(info.postscript_name, "CistercianNumerals-Regular");
        assert_eq!(info.full_name, "Cistercian Numerals");
        assert_eq!(info.style_name, "Regular");
    }

    #[test]
    fn test_glyph_order() {
        let mut font = FontAssembler::new(FontInfo::new("Test", metrics())).unwrap();
        font.add_basic_digits().unwrap();
        let gid = font.add_glyph("cistercian_0001", 600, None, &BezPath::new()).unwrap();

        assert_eq!(font.glyph_id(NOTDEF), Some(GlyphId::new(0)));
        assert_eq!(font.glyph_id("zero"), Some(GlyphId::new(1)));
        assert_eq!(font.glyph_id("nine"), Some(GlyphId::new(10)));
        assert_eq!(gid, GlyphId::new(11));
        assert_eq!(font.glyph_count(), 12);
    }

    #[test]
    fn test_duplicate_glyph() {
        let mut font = FontAssembler::new(FontInfo::new("Test", metrics())).unwrap();
        font.add_basic_digits().unwrap();
        let err = font.add_glyph("five", 600, None, &BezPath::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicateGlyph(name) if name == "five"));
    }

    #[test]
    fn test_empty_program_skips_gsub() {
        let mut font = FontAssembler::new(FontInfo::new("Test", metrics())).unwrap();
        let summary = font.merge_features(&RuleProgram::default()).unwrap();
        assert_eq!(summary, MergeSummary::default());
        assert!(!font.has_features());
    }

    #[test]
    fn test_no_resolvable_rules_skips_gsub() {
        let mut font = FontAssembler::new(FontInfo::new("Test", metrics())).unwrap();
        font.add_basic_digits().unwrap();
        let program = feature_compiler::RuleCompiler::default()
            .compile(&[feature_compiler::LigatureMapping::new("12", "absent")])
            .unwrap();

        let summary = font.merge_features(&program).unwrap();
        assert_eq!(summary, MergeSummary { merged: 0, dropped: 1 });
        assert!(!font.has_features());
    }
}
