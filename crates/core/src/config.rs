//! Configuration constants for Cistercian font builds.

/// PostScript font name.
pub const FONT_NAME: &str = "Cistercian";

/// Family name (name ID 1).
pub const FAMILY_NAME: &str = "Cistercian";

/// Full name (name ID 4).
pub const FULL_NAME: &str = "Cistercian Numerals";

/// Style name (name ID 2).
pub const WEIGHT: &str = "Regular";

/// Version used when none is given on the command line.
pub const DEFAULT_VERSION: &str = "1.0.0";

pub const COPYRIGHT: &str = "Based on Cistercian numerals (public domain)";

/// Glyph metadata file inside the metadata directory.
pub const GLYPHS_FILENAME: &str = "glyphs.json";

/// Ligature mapping file inside the metadata directory.
pub const LIGATURES_FILENAME: &str = "ligatures.json";

/// Generated feature file inside the metadata directory.
pub const FEATURES_FILENAME: &str = "features.fea";

pub const TTF_FILENAME: &str = "Cistercian.ttf";

pub const WOFF_FILENAME: &str = "Cistercian.woff";

pub const WOFF2_FILENAME: &str = "Cistercian.woff2";

/// Pattern matching outline files in the glyph directory.
pub const SVG_PATTERN: &str = "*.svg";

pub const DEFAULT_GLYPHS_DIR: &str = "glyphs";
pub const DEFAULT_METADATA_DIR: &str = "metadata";
pub const DEFAULT_FONTS_DIR: &str = "fonts";
