//! Glyph and ligature metadata files.

use std::path::Path;

use anyhow::{Context, Result, bail};
use feature_compiler::LigatureMapping;
use font_builder::FontMetrics;
use glyph_normalizer::{N_MAX, NumeralGlyph};
use serde::Deserialize;

use crate::io::Artifact;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlyphsFile {
    font_config: FontConfigRecord,
    glyphs: Vec<GlyphRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FontConfigRecord {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlyphRecord {
    number: u32,
    glyph_name: String,
    width: u32,
}

#[derive(Debug, Deserialize)]
struct LigaturesFile {
    mappings: Vec<MappingRecord>,
}

#[derive(Debug, Deserialize)]
struct MappingRecord {
    input: String,
    output: String,
}

/// Font metrics and per-numeral glyph records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMetadata {
    pub metrics: FontMetrics,
    /// Sorted by numeral.
    pub glyphs: Vec<NumeralGlyph>,
}

impl GlyphRecord {
    fn validate(self, index: usize) -> Result<NumeralGlyph> {
        let numeral = u16::try_from(self.number)
            .ok()
            .filter(|n| (1..=N_MAX).contains(n))
            .with_context(|| format!("glyph {index}: number {} outside 1..={N_MAX}", self.number))?;
        if self.glyph_name.trim().is_empty() {
            bail!("glyph {index}: empty glyph name for {numeral}");
        }
        let width = u16::try_from(self.width)
            .ok()
            .filter(|w| *w > 0)
            .with_context(|| format!("glyph {index}: invalid width {} for {numeral}", self.width))?;
        Ok(NumeralGlyph::new(numeral, self.glyph_name, width))
    }
}

pub fn parse_glyph_metadata(json: &str) -> Result<GlyphMetadata> {
    let file: GlyphsFile = serde_json::from_str(json).context("Invalid glyph metadata")?;
    let config = file.font_config;
    let metrics = FontMetrics::new(config.units_per_em, config.ascender, config.descender)
        .context("Invalid fontConfig")?;

    let mut glyphs = file
        .glyphs
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.validate(i))
        .collect::<Result<Vec<_>>>()?;
    glyphs.sort_by_key(|g| g.numeral);

    Ok(GlyphMetadata { metrics, glyphs })
}

pub fn parse_ligatures(json: &str) -> Result<Vec<LigatureMapping>> {
    let file: LigaturesFile = serde_json::from_str(json).context("Invalid ligature metadata")?;
    Ok(file.mappings.into_iter().map(|m| LigatureMapping::new(m.input, m.output)).collect())
}

fn read_json(path: &Path) -> Result<String> {
    let artifact = Artifact::new(path);
    artifact.require()?;
    let data = artifact.read()?;
    String::from_utf8(data)
        .with_context(|| format!("{} is not UTF-8", artifact.path().display()))
}

/// Load `glyphs.json`.
pub fn load_glyph_metadata(path: &Path) -> Result<GlyphMetadata> {
    parse_glyph_metadata(&read_json(path)?)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Load `ligatures.json`.
pub fn load_ligatures(path: &Path) -> Result<Vec<LigatureMapping>> {
    parse_ligatures(&read_json(path)?).with_context(|| format!("Failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPHS: &str = r#"{
        "fontConfig": { "unitsPerEm": 1000, "ascender": 800, "descender": -200 },
        "glyphs": [
            { "number": 12, "glyphName": "cistercian_0012", "width": 600 },
            { "number": 1, "glyphName": "cistercian_0001", "width": 600 }
        ]
    }"#;

    #[test]
    fn test_parse_glyph_metadata() {
        let metadata = parse_glyph_metadata(GLYPHS).unwrap();
        assert_eq!(metadata.metrics, FontMetrics::new(1000, 800, -200).unwrap());
        assert_eq!(
            metadata.glyphs,
            [
                NumeralGlyph::new(1, "cistercian_0001", 600),
                NumeralGlyph::new(12, "cistercian_0012", 600),
            ]
        );
    }

    #[test]
    fn test_reject_invalid_records() {
        let cases = [
            r#"{ "number": 0, "glyphName": "a", "width": 600 }"#,
            r#"{ "number": 10000, "glyphName": "a", "width": 600 }"#,
            r#"{ "number": 5, "glyphName": " ", "width": 600 }"#,
            r#"{ "number": 5, "glyphName": "a", "width": 0 }"#,
        ];
        for glyph in cases {
            let json = format!(
                r#"{{ "fontConfig": {{ "unitsPerEm": 1000, "ascender": 800, "descender": -200 }},
                     "glyphs": [{glyph}] }}"#
            );
            assert!(parse_glyph_metadata(&json).is_err(), "{glyph} should be rejected");
        }
    }

    #[test]
    fn test_reject_zero_units_per_em() {
        let json = r#"{ "fontConfig": { "unitsPerEm": 0, "ascender": 800, "descender": -200 },
                        "glyphs": [] }"#;
        assert!(parse_glyph_metadata(json).is_err());
    }

    #[test]
    fn test_parse_ligatures() {
        let json = r#"{ "mappings": [
            { "input": "1", "output": "cistercian_0001" },
            { "input": "12", "output": "cistercian_0012" }
        ] }"#;
        let mappings = parse_ligatures(json).unwrap();
        assert_eq!(
            mappings,
            [
                LigatureMapping::new("1", "cistercian_0001"),
                LigatureMapping::new("12", "cistercian_0012"),
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("cistercian-core-missing").join("glyphs.json");
        let err = load_glyph_metadata(&path).unwrap_err();
        assert!(err.to_string().starts_with("Missing input"));
    }

    #[test]
    fn test_non_utf8_file_names_path() {
        let dir = std::env::temp_dir().join(format!("cistercian-core-utf8-{}", std::process::id()));
        let path = dir.join("ligatures.json");
        Artifact::new(&path).write([0xff, 0xfe, b'{']).unwrap();

        let err = load_ligatures(&path).unwrap_err();
        assert!(format!("{err:#}").contains(&format!("{} is not UTF-8", path.display())));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
