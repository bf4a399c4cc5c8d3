//! Error types for outline import and normalization.

use std::{io, path::PathBuf, result};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read outline '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed outline data: {0}")]
    Malformed(String),

    #[error("no glyphs imported ({skipped} skipped)")]
    NoGlyphsImported { skipped: usize },
}

pub type Result<T> = result::Result<T, Error>;
