//! WOFF 1.0 encoding.
//!
//! Each sfnt table is zlib-compressed on its own and stored uncompressed
//! when compression does not make it smaller. Tables are 4-byte aligned
//! and the directory is sorted by tag.

use std::io::Write;

use anyhow::{Context, Result, bail};
use flate2::{Compression, write::ZlibEncoder};
use log::debug;
use read_fonts::FontRef;

/// WOFF 1.0 file signature.
pub const WOFF_SIGNATURE: &[u8; 4] = b"wOFF";

const WOFF_HEADER_SIZE: usize = 44;
const WOFF_DIRECTORY_ENTRY_SIZE: usize = 20;
const SFNT_HEADER_SIZE: usize = 12;
const SFNT_DIRECTORY_ENTRY_SIZE: usize = 16;

/// Returns true if `data` starts with the WOFF 1.0 signature.
pub fn is_woff(data: &[u8]) -> bool {
    data.starts_with(WOFF_SIGNATURE)
}

struct EncodedTable {
    tag: [u8; 4],
    checksum: u32,
    orig_length: u32,
    data: Vec<u8>,
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).context("zlib compression failed")?;
    encoder.finish().context("zlib compression failed")
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).with_context(|| format!("{what} exceeds 4 GiB"))
}

/// Wrap TrueType/OpenType font data in a WOFF 1.0 container.
pub fn convert_to_woff(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let flavor = data.get(..4).context("Font data too short")?;

    let mut tables = Vec::new();
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        let table = font
            .table_data(tag)
            .with_context(|| format!("Table '{tag}' lies outside the font data"))?;
        let raw = table.as_bytes();

        let compressed = compress(raw)?;
        let stored = if compressed.len() < raw.len() { compressed } else { raw.to_vec() };
        tables.push(EncodedTable {
            tag: tag.to_be_bytes(),
            checksum: record.checksum(),
            orig_length: to_u32(raw.len(), "table length")?,
            data: stored,
        });
    }
    if tables.is_empty() {
        bail!("Font has no tables");
    }
    tables.sort_by_key(|t| t.tag);

    let num_tables = u16::try_from(tables.len()).context("Too many tables")?;
    let total_sfnt_size = SFNT_HEADER_SIZE
        + SFNT_DIRECTORY_ENTRY_SIZE * tables.len()
        + tables.iter().map(|t| padded(t.orig_length as usize)).sum::<usize>();
    let data_start = WOFF_HEADER_SIZE + WOFF_DIRECTORY_ENTRY_SIZE * tables.len();
    let total_length = data_start + tables.iter().map(|t| padded(t.data.len())).sum::<usize>();

    let mut out = Vec::with_capacity(total_length);
    out.extend_from_slice(WOFF_SIGNATURE);
    out.extend_from_slice(flavor);
    out.extend_from_slice(&to_u32(total_length, "WOFF length")?.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&to_u32(total_sfnt_size, "sfnt size")?.to_be_bytes());
    // Version 1.0, no metadata or private block
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&[0; 20]);

    let mut offset = data_start;
    for table in &tables {
        out.extend_from_slice(&table.tag);
        out.extend_from_slice(&to_u32(offset, "table offset")?.to_be_bytes());
        out.extend_from_slice(&to_u32(table.data.len(), "table length")?.to_be_bytes());
        out.extend_from_slice(&table.orig_length.to_be_bytes());
        out.extend_from_slice(&table.checksum.to_be_bytes());
        offset += padded(table.data.len());
    }

    for table in &tables {
        out.extend_from_slice(&table.data);
        out.resize(padded(out.len()), 0);
    }

    debug!("WOFF: {} -> {} bytes ({num_tables} tables)", data.len(), out.len());
    Ok(out)
}
