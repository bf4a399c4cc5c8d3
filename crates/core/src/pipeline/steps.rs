//! Pipeline step definitions.

use anyhow::{Context, Result};
use feature_compiler::RuleCompiler;
use font_builder::{FontAssembler, FontInfo};
use font_woff2::{convert_to_woff, convert_to_woff2};
use glyph_normalizer::{ImportMetrics, SvgDirectory, normalize_all};
use log::{error, warn};

use super::{BuildState, PipelineContext};
use crate::{
    config::{COPYRIGHT, FAMILY_NAME, FONT_NAME, FULL_NAME, SVG_PATTERN, WEIGHT},
    io::{Artifact, require_files},
    metadata::{load_glyph_metadata, load_ligatures},
};

pub type PipelineStep = (&'static str, fn(&PipelineContext, &mut BuildState) -> Result<()>);

pub const BUILD_STEPS: &[PipelineStep] = &[
    ("load-metadata", step_load_metadata),
    ("import-glyphs", step_import_glyphs),
    ("compile-features", step_compile_features),
    ("write-features", step_write_features),
    ("assemble-font", step_assemble_font),
    ("emit-fonts", step_emit_fonts),
];

pub const FEATURE_STEPS: &[PipelineStep] = &[
    ("load-ligatures", step_load_ligatures),
    ("compile-features", step_compile_features),
    ("write-features", step_write_features),
];

fn step_load_metadata(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let svg_count = require_files(&ctx.glyphs_dir, SVG_PATTERN)?;
    let metadata = load_glyph_metadata(&ctx.glyphs_metadata_path())?;
    println!(
        "  Em size: {}, ascent: {}, descent: {}",
        metadata.metrics.units_per_em, metadata.metrics.ascender, -metadata.metrics.descender
    );
    println!("  {} glyph records, {svg_count} SVG files", metadata.glyphs.len());
    state.metadata = Some(metadata);
    step_load_ligatures(ctx, state)
}

fn step_load_ligatures(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    state.mappings = load_ligatures(&ctx.ligatures_path())?;
    println!("  {} ligature mappings", state.mappings.len());
    Ok(())
}

fn step_import_glyphs(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let metadata = state.metadata.as_ref().context("Glyph metadata not loaded")?;
    let metrics = ImportMetrics::new(
        f64::from(metadata.metrics.ascender),
        f64::from(metadata.metrics.descender),
    );
    let source = SvgDirectory::new(&ctx.glyphs_dir, metrics);

    let report = normalize_all(&metadata.glyphs, &source);
    println!(
        "  Imported {} of {} glyphs ({} missing, {} failed)",
        report.imported.len(),
        report.total(),
        report.missing(),
        report.malformed()
    );
    state.glyphs = report.into_glyphs()?;
    Ok(())
}

fn step_compile_features(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let program = RuleCompiler::new(ctx.rules_per_subtable)
        .compile(&state.mappings)
        .context("Invalid ligature mapping")?;
    println!(
        "  {} rules in {} subtables (max {} per subtable)",
        program.rule_count(),
        program.subtables().len(),
        ctx.rules_per_subtable
    );
    state.program = Some(program);
    Ok(())
}

fn step_write_features(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let program = state.program.as_ref().context("Rule program not compiled")?;
    Artifact::new(&ctx.features_path).write(program.to_fea())?;
    println!("  Wrote {}", ctx.features_path.display());
    Ok(())
}

fn font_info(ctx: &PipelineContext, state: &BuildState) -> Result<FontInfo> {
    let metadata = state.metadata.as_ref().context("Glyph metadata not loaded")?;
    let mut info = FontInfo::new(FAMILY_NAME, metadata.metrics)
        .with_full_name(FULL_NAME)
        .with_copyright(COPYRIGHT)
        .with_version(ctx.version.clone());
    info.style_name = WEIGHT.to_string();
    info.postscript_name = FONT_NAME.to_string();
    Ok(info)
}

fn step_assemble_font(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let mut font = FontAssembler::new(font_info(ctx, state)?)?;
    font.add_basic_digits()?;
    font.add_numeral_glyphs(&state.glyphs)?;

    if let Some(program) = &state.program {
        match font.merge_features(program) {
            Ok(summary) => {
                println!("  {} rules merged, {} dropped", summary.merged, summary.dropped);
                state.merge = Some(summary);
            }
            Err(e) => {
                warn!("Could not merge features: {e}");
                warn!("Building without GSUB; {} is kept", ctx.features_path.display());
            }
        }
    }
    println!("  {} glyphs, GSUB: {}", font.glyph_count(), font.has_features());

    match font.build() {
        Ok(data) => state.ttf = Some(data),
        Err(e) => error!("Failed to assemble TTF: {e}"),
    }
    Ok(())
}

fn step_emit_fonts(ctx: &PipelineContext, state: &mut BuildState) -> Result<()> {
    let Some(ttf) = &state.ttf else {
        error!("No TTF assembled; skipping font output");
        return Ok(());
    };

    let ttf_path = ctx.ttf_path();
    if let Err(e) = Artifact::new(&ttf_path).write(ttf) {
        error!("{e:#}");
        return Ok(());
    }
    println!("  TTF: {} ({} bytes)", ttf_path.display(), ttf.len());
    state.outputs.push(ttf_path);

    let woff_path = ctx.woff_path();
    let written = convert_to_woff(ttf)
        .and_then(|woff| Artifact::new(&woff_path).write(&woff).map(|()| woff.len()));
    match written {
        Ok(size) => {
            println!("  WOFF: {} ({size} bytes)", woff_path.display());
            state.outputs.push(woff_path);
        }
        Err(e) => error!("Failed to generate WOFF: {e:#}"),
    }

    let woff2_path = ctx.woff2_path();
    let written = convert_to_woff2(ttf)
        .and_then(|woff2| Artifact::new(&woff2_path).write(&woff2).map(|()| woff2.len()));
    match written {
        Ok(size) => {
            println!("  WOFF2: {} ({size} bytes)", woff2_path.display());
            state.outputs.push(woff2_path);
        }
        Err(e) => error!("Failed to generate WOFF2: {e:#}"),
    }
    Ok(())
}
