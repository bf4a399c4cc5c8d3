//! Build pipeline for the Cistercian font.

mod clean;
mod steps;

pub use clean::clean;
pub use steps::{BUILD_STEPS, FEATURE_STEPS, PipelineStep};

use std::{num::NonZeroUsize, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use feature_compiler::{LigatureMapping, RuleProgram};
use font_builder::{FontVersion, MergeSummary};
use glyph_normalizer::NormalizedGlyph;

use crate::{
    config::{
        DEFAULT_VERSION, FEATURES_FILENAME, GLYPHS_FILENAME, LIGATURES_FILENAME, TTF_FILENAME,
        WOFF_FILENAME, WOFF2_FILENAME,
    },
    metadata::GlyphMetadata,
};

const RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════════";

pub struct PipelineContext {
    pub glyphs_dir: PathBuf,
    pub metadata_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub features_path: PathBuf,
    pub rules_per_subtable: NonZeroUsize,
    pub version: FontVersion,
}

impl PipelineContext {
    pub fn new(
        glyphs_dir: PathBuf,
        metadata_dir: PathBuf,
        fonts_dir: PathBuf,
        rules_per_subtable: usize,
        version: Option<String>,
    ) -> Result<Self> {
        let rules_per_subtable = NonZeroUsize::new(rules_per_subtable)
            .context("rules per subtable must be at least 1")?;
        let version = FontVersion::parse(version.as_deref().unwrap_or(DEFAULT_VERSION))?;
        let features_path = metadata_dir.join(FEATURES_FILENAME);
        Ok(Self { glyphs_dir, metadata_dir, fonts_dir, features_path, rules_per_subtable, version })
    }

    /// Write the feature file to `path` instead of the metadata directory.
    pub fn with_features_path(mut self, path: PathBuf) -> Self {
        self.features_path = path;
        self
    }

    pub fn glyphs_metadata_path(&self) -> PathBuf {
        self.metadata_dir.join(GLYPHS_FILENAME)
    }

    pub fn ligatures_path(&self) -> PathBuf {
        self.metadata_dir.join(LIGATURES_FILENAME)
    }

    pub fn ttf_path(&self) -> PathBuf {
        self.fonts_dir.join(TTF_FILENAME)
    }

    pub fn woff_path(&self) -> PathBuf {
        self.fonts_dir.join(WOFF_FILENAME)
    }

    pub fn woff2_path(&self) -> PathBuf {
        self.fonts_dir.join(WOFF2_FILENAME)
    }
}

/// Values handed from one step to the next.
#[derive(Debug, Default)]
pub struct BuildState {
    pub metadata: Option<GlyphMetadata>,
    pub mappings: Vec<LigatureMapping>,
    pub glyphs: Vec<NormalizedGlyph>,
    pub program: Option<RuleProgram>,
    /// Rules merged into and dropped from `GSUB`.
    pub merge: Option<MergeSummary>,
    pub ttf: Option<Vec<u8>>,
    /// Files written by the emit step.
    pub outputs: Vec<PathBuf>,
}

pub fn run_step(
    name: &str,
    step_num: usize,
    total: usize,
    ctx: &PipelineContext,
    state: &mut BuildState,
    f: impl Fn(&PipelineContext, &mut BuildState) -> Result<()>,
) -> Result<()> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    f(ctx, state).with_context(|| format!("Step '{name}' failed"))?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(())
}

pub fn run_steps(
    steps: &[PipelineStep],
    ctx: &PipelineContext,
    state: &mut BuildState,
) -> Result<()> {
    let total = steps.len();
    for (i, (name, step_fn)) in steps.iter().enumerate() {
        run_step(name, i + 1, total, ctx, state, step_fn)?;
    }
    Ok(())
}

fn print_banner(title: &str) {
    println!("{RULE}");
    println!("{title}");
    println!("{RULE}");
}

/// Run the full build: metadata, glyph import, features, font files.
pub fn build(ctx: &PipelineContext) -> Result<BuildState> {
    let start = Instant::now();
    print_banner("Cistercian Font Build Pipeline");

    let mut state = BuildState::default();
    run_steps(BUILD_STEPS, ctx, &mut state)?;

    println!("\n{RULE}");
    println!("✨ Build complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Glyphs: {}", state.glyphs.len());
    if let Some(program) = &state.program {
        println!(
            "   Rules: {} in {} subtables",
            program.rule_count(),
            program.subtables().len()
        );
    }
    if let Some(merge) = state.merge.filter(|m| m.dropped > 0) {
        println!("   Dropped rules: {} (missing glyphs)", merge.dropped);
    }
    for output in &state.outputs {
        println!("   Output: {}", output.display());
    }
    println!("{RULE}");

    Ok(state)
}

/// Compile the ligature mappings and write only the feature file.
pub fn build_features(ctx: &PipelineContext) -> Result<BuildState> {
    let start = Instant::now();
    print_banner("Cistercian Feature File");

    let mut state = BuildState::default();
    run_steps(FEATURE_STEPS, ctx, &mut state)?;

    println!("\n{RULE}");
    println!("✨ Features written in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Output: {}", ctx.features_path.display());
    println!("{RULE}");

    Ok(state)
}
