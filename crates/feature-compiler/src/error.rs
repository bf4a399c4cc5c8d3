//! Error types for ligature rule compilation.

use std::result;

/// Errors that abort rule compilation.
///
/// Compilation is all-or-nothing: a single malformed mapping rejects the
/// whole table, so no partial rule program is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("mapping {index} ('{input}') has {len} digits, expected 1-4")]
    InvalidLength { index: usize, input: String, len: usize },

    #[error("mapping {index} ('{input}') contains non-digit character {character:?}")]
    InvalidCharacter { index: usize, input: String, character: char },
}

pub type Result<T> = result::Result<T, Error>;
