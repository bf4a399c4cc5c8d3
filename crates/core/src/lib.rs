//! Cistercian Core - build pipeline for the Cistercian numeral font.

pub mod config;
pub mod io;
pub mod metadata;
pub mod pipeline;

pub use feature_compiler::{LigatureMapping, RULES_PER_SUBTABLE, RuleCompiler, RuleProgram};
pub use font_builder::{FontAssembler, FontInfo, FontMetrics, FontVersion, MergeSummary};
pub use font_woff2::{convert_to_woff, convert_to_woff2};
pub use glyph_normalizer::{NormalizedGlyph, NumeralGlyph, normalize};

pub use pipeline::{BuildState, PipelineContext, build, build_features, clean};
