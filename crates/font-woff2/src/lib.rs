//! WOFF and WOFF2 compression for assembled TrueType fonts.
//!
//! # Example
//!
//! ```no_run
//! use font_woff2::convert_to_woff2;
//!
//! let ttf_data = std::fs::read("Cistercian.ttf").unwrap();
//! let woff2_data = convert_to_woff2(&ttf_data).unwrap();
//! std::fs::write("Cistercian.woff2", woff2_data).unwrap();
//! ```

mod woff;

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use read_fonts::{FontRef, TableProvider};
use ttf2woff2::{BrotliQuality, encode};
pub use woff::{WOFF_SIGNATURE, convert_to_woff, is_woff};

/// WOFF2 file signature.
pub const WOFF2_SIGNATURE: &[u8; 4] = b"wOF2";

/// Returns true if `data` starts with the WOFF2 signature.
pub fn is_woff2(data: &[u8]) -> bool {
    data.starts_with(WOFF2_SIGNATURE)
}

/// Compress TrueType font data to WOFF2.
///
/// The input must parse as an sfnt with a `glyf` table.
pub fn convert_to_woff2(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    font.glyf().context("Font has no glyf table")?;

    let woff2 = encode(data, BrotliQuality::default())
        .map_err(|e| anyhow!("WOFF2 encoding failed: {e:?}"))?;
    if !is_woff2(&woff2) {
        bail!("WOFF2 encoder produced data without a wOF2 signature");
    }

    debug!("WOFF2: {} -> {} bytes", data.len(), woff2.len());
    Ok(woff2)
}
