//! Error types for font assembly.

use std::result;

/// Errors that can occur while assembling a font.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate glyph name '{0}'")]
    DuplicateGlyph(String),

    #[error("too many glyphs: {0} (maximum 65535)")]
    TooManyGlyphs(usize),

    #[error("invalid tag '{0}'")]
    InvalidTag(String),

    #[error("failed to convert outline of '{name}': {message}")]
    Outline { name: String, message: String },

    #[error("invalid font version '{0}'. Expected MAJOR.MINOR or MAJOR.MINOR.PATCH.")]
    InvalidVersion(String),

    #[error("invalid font metrics: {0}")]
    InvalidMetrics(String),

    #[error("failed to build cmap: {0}")]
    Cmap(String),

    #[error("font builder error: {0}")]
    Build(#[from] write_fonts::BuilderError),

    #[error("font write error: {0}")]
    Write(#[from] write_fonts::error::Error),
}

pub type Result<T> = result::Result<T, Error>;
