//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use cistercian_core::{
    PipelineContext, RULES_PER_SUBTABLE, build, build_features, clean,
    config::{DEFAULT_FONTS_DIR, DEFAULT_GLYPHS_DIR, DEFAULT_METADATA_DIR},
};
use clap::{Parser, Subcommand};
use log::debug;

#[derive(Parser)]
#[command(name = "cistercian-fonts")]
#[command(about = "Build the Cistercian numeral font from SVG outlines and ligature metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Directory holding cistercian_NNNN.svg outlines
    #[arg(long, default_value = DEFAULT_GLYPHS_DIR)]
    pub glyphs_dir: PathBuf,
    /// Directory holding glyphs.json and ligatures.json
    #[arg(long, default_value = DEFAULT_METADATA_DIR)]
    pub metadata_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_FONTS_DIR)]
    pub fonts_dir: PathBuf,
    /// Maximum ligature rules per GSUB subtable
    #[arg(long, default_value_t = RULES_PER_SUBTABLE)]
    pub rules_per_subtable: usize,
    /// Font version (MAJOR.MINOR or MAJOR.MINOR.PATCH)
    #[arg(long)]
    pub font_version: Option<String>,
}

impl BuildArgs {
    fn context(self) -> Result<PipelineContext> {
        PipelineContext::new(
            self.glyphs_dir,
            self.metadata_dir,
            self.fonts_dir,
            self.rules_per_subtable,
            self.font_version,
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import glyphs, compile features and write TTF, WOFF and WOFF2
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Compile ligature mappings into a feature file only
    Features {
        #[arg(long, default_value = DEFAULT_METADATA_DIR)]
        metadata_dir: PathBuf,
        /// Feature file path (default: <metadata-dir>/features.fea)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = RULES_PER_SUBTABLE)]
        rules_per_subtable: usize,
    },
    /// Remove generated fonts
    Clean {
        #[arg(long, default_value = DEFAULT_FONTS_DIR)]
        fonts_dir: PathBuf,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { args } => {
                let ctx = args.context()?;
                debug!("Building with {} rules per subtable", ctx.rules_per_subtable);
                build(&ctx)?;
            }
            Commands::Features { metadata_dir, output, rules_per_subtable } => {
                let mut ctx = PipelineContext::new(
                    PathBuf::from(DEFAULT_GLYPHS_DIR),
                    metadata_dir,
                    PathBuf::from(DEFAULT_FONTS_DIR),
                    rules_per_subtable,
                    None,
                )?;
                if let Some(output) = output {
                    ctx = ctx.with_features_path(output);
                }
                build_features(&ctx)?;
            }
            Commands::Clean { fonts_dir } => {
                clean(&fonts_dir)?;
            }
        }
        Ok(())
    }
}
