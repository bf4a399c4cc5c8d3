//! SVG directory import through the batch normalizer.

use std::{
    fs::{create_dir_all, remove_dir_all, write},
    path::PathBuf,
};

use glyph_normalizer::{
    Error, ImportMetrics, NumeralGlyph, OutlineSource, SkipReason, SvgDirectory, normalize_all,
};

const METRICS: ImportMetrics = ImportMetrics { ascender: 800.0, descender: -200.0 };

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir()
            .join(format!("cistercian-normalizer-{name}-{}", std::process::id()));
        let _ = remove_dir_all(&dir);
        create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write_svg(&self, numeral: u16, body: &str) {
        let svg = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
{body}
</svg>"#
        );
        write(self.0.join(SvgDirectory::file_name(numeral)), svg).unwrap();
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = remove_dir_all(&self.0);
    }
}

fn glyph(numeral: u16) -> NumeralGlyph {
    NumeralGlyph::new(numeral, format!("cistercian_{numeral:04}"), 600)
}

#[test]
fn test_directory_import_centers_glyphs() {
    let dir = TempDir::new("center");
    dir.write_svg(1, r#"<path d="M 10 10 L 20 10 L 20 90 L 10 90 Z"/>"#);
    dir.write_svg(2, r#"<rect x="40" y="10" width="20" height="80"/>"#);

    let source = SvgDirectory::new(&dir.0, METRICS);
    let report = normalize_all(&[glyph(1), glyph(2)], &source);

    assert!(report.skipped.is_empty());
    for normalized in &report.imported {
        let center = normalized.outline.center_x().unwrap();
        assert!((center - 300.0).abs() < 1e-6, "numeral {} centered at {center}", normalized.numeral);
    }
}

#[test]
fn test_missing_file_is_skipped_not_fatal() {
    let dir = TempDir::new("missing");
    dir.write_svg(41, r#"<polygon points="10,10 90,10 50,90"/>"#);

    let source = SvgDirectory::new(&dir.0, METRICS);
    assert!(source.outline(42).unwrap().is_none());

    let report = normalize_all(&[glyph(41), glyph(42)], &source);
    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].numeral, 42);
    assert_eq!(report.skipped[0].reason, SkipReason::Missing);
    assert!(report.into_glyphs().is_ok());
}

#[test]
fn test_blank_placeholder_imports_as_empty() {
    let dir = TempDir::new("blank");
    dir.write_svg(5, "");

    let report = normalize_all(&[glyph(5)], &SvgDirectory::new(&dir.0, METRICS));
    let glyphs = report.into_glyphs().unwrap();
    assert!(glyphs[0].outline.is_empty());
}

#[test]
fn test_malformed_file_counts_as_failure() {
    let dir = TempDir::new("malformed");
    dir.write_svg(9, r#"<path d="M 0 0 L 10"/>"#);

    let report = normalize_all(&[glyph(9)], &SvgDirectory::new(&dir.0, METRICS));
    assert_eq!(report.malformed(), 1);
    assert!(matches!(report.into_glyphs(), Err(Error::NoGlyphsImported { skipped: 1 })));
}

#[test]
fn test_unsupported_content_is_reported_not_dropped() {
    let dir = TempDir::new("unsupported");
    dir.write_svg(7, r#"<line x1="0" y1="0" x2="100" y2="100" stroke="black"/>"#);
    dir.write_svg(8, r#"<g transform="translate(30 0)"><rect width="20" height="80"/></g>"#);

    let report = normalize_all(&[glyph(7), glyph(8)], &SvgDirectory::new(&dir.0, METRICS));
    assert_eq!(report.malformed(), 1);
    assert_eq!(report.skipped[0].numeral, 7);

    let glyphs = report.into_glyphs().unwrap();
    assert_eq!(glyphs.len(), 1);
    assert!((glyphs[0].outline.center_x().unwrap() - 300.0).abs() < 1e-6);
}
