//! Batch import over the full numeral set.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::{info, warn};
use rayon::prelude::*;

use crate::{Error, NormalizedGlyph, NumeralGlyph, Outline, Result, normalize};

/// Glyphs between progress log lines.
const PROGRESS_INTERVAL: usize = 500;

/// Supplies one outline per numeral.
pub trait OutlineSource: Sync {
    /// Fetch the outline for `numeral`, `Ok(None)` when there is none.
    fn outline(&self, numeral: u16) -> Result<Option<Outline>>;
}

impl OutlineSource for HashMap<u16, Outline> {
    fn outline(&self, numeral: u16) -> Result<Option<Outline>> {
        Ok(self.get(&numeral).cloned())
    }
}

/// Why a numeral was left out of the glyph set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No outline resource exists for the numeral.
    Missing,
    /// The outline resource could not be read or parsed.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub numeral: u16,
    pub reason: SkipReason,
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<NormalizedGlyph>,
    pub skipped: Vec<Skipped>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported.len() + self.skipped.len()
    }

    pub fn missing(&self) -> usize {
        self.skipped.iter().filter(|s| s.reason == SkipReason::Missing).count()
    }

    pub fn malformed(&self) -> usize {
        self.skipped.len() - self.missing()
    }

    /// The imported glyphs, or an error when none were imported.
    pub fn into_glyphs(self) -> Result<Vec<NormalizedGlyph>> {
        if self.imported.is_empty() {
            return Err(Error::NoGlyphsImported { skipped: self.skipped.len() });
        }
        Ok(self.imported)
    }
}

/// Import and normalize every glyph that has an outline.
///
/// Per-glyph failures are collected in the report instead of aborting.
/// Output order follows `glyphs`.
pub fn normalize_all<S>(glyphs: &[NumeralGlyph], source: &S) -> ImportReport
where
    S: OutlineSource + ?Sized,
{
    let total = glyphs.len();
    let done = AtomicUsize::new(0);

    let outcomes: Vec<_> = glyphs
        .par_iter()
        .map(|glyph| {
            let outcome = match source.outline(glyph.numeral) {
                Ok(Some(outline)) => Ok(normalize(glyph, &outline)),
                Ok(None) => Err(SkipReason::Missing),
                Err(e) => Err(SkipReason::Malformed(e.to_string())),
            };

            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if n % PROGRESS_INTERVAL == 0 {
                info!("Progress: {n}/{total} ({:.1}%)", n as f64 / total as f64 * 100.0);
            }
            (glyph.numeral, outcome)
        })
        .collect();

    let mut report = ImportReport::default();
    for (numeral, outcome) in outcomes {
        match outcome {
            Ok(normalized) => report.imported.push(normalized),
            Err(reason) => {
                match &reason {
                    SkipReason::Missing => warn!("no outline found for {numeral}"),
                    SkipReason::Malformed(e) => warn!("failed to import outline for {numeral}: {e}"),
                }
                report.skipped.push(Skipped { numeral, reason });
            }
        }
    }
    report
}
