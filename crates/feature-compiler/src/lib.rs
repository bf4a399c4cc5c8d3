//! # Feature Compiler
//!
//! Turns a table of digit-sequence → numeral-glyph mappings into an ordered,
//! partitioned ligature rule program.
//!
//! Shaping engines apply the first rule that matches at a text position, and
//! every shorter digit run is a prefix of some longer one, so rules are
//! ordered longest input first. The ordered list is then split into
//! subtables of bounded size so each physical lookup subtable stays within
//! 16-bit offset range.
//!
//! ## Example
//!
//! ```
//! use feature_compiler::{LigatureMapping, compile};
//!
//! let mappings = vec![LigatureMapping::new("12", "X"), LigatureMapping::new("1234", "Y")];
//! let program = compile(&mappings).unwrap();
//!
//! let outputs: Vec<&str> = program.rules().map(|r| r.output.as_str()).collect();
//! assert_eq!(outputs, ["Y", "X"]);
//! ```

mod chunk;
mod error;
mod fea;
mod mapping;
mod program;

use std::num::NonZeroUsize;

use log::{debug, warn};

pub use chunk::{Chunked, chunk_with_separators, split_at_separators};
pub use error::{Error, Result};
pub use mapping::{
    DIGIT_GLYPH_NAMES, DuplicateInput, LigatureMapping, MAX_INPUT_LEN, digit_glyph_name,
    find_duplicate_inputs,
};
pub use program::{
    FeatureBlock, LANGUAGE_SYSTEMS, LIGATURE_FEATURES, Rule, RuleProgram, Statement, Subtable,
};

/// Default number of rules per physical subtable.
pub const RULES_PER_SUBTABLE: usize = 500;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(RULES_PER_SUBTABLE) {
    Some(n) => n,
    None => panic!("RULES_PER_SUBTABLE must be non-zero"),
};

/// Compiles ligature mapping tables into rule programs.
#[derive(Debug, Clone, Copy)]
pub struct RuleCompiler {
    rules_per_subtable: NonZeroUsize,
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self { rules_per_subtable: DEFAULT_CAPACITY }
    }
}

impl RuleCompiler {
    pub fn new(rules_per_subtable: NonZeroUsize) -> Self {
        Self { rules_per_subtable }
    }

    pub fn rules_per_subtable(&self) -> NonZeroUsize {
        self.rules_per_subtable
    }

    /// Compile `mappings` into a rule program.
    ///
    /// Stages run strictly in order over the whole table: validate, sort,
    /// build rules, partition. Any validation failure rejects the table.
    pub fn compile(&self, mappings: &[LigatureMapping]) -> Result<RuleProgram> {
        let inputs = validate(mappings)?;

        for dup in find_duplicate_inputs(mappings) {
            warn!(
                "ligature input '{}' at mapping {} repeats mapping {}; the later rule is unreachable",
                dup.input, dup.duplicate, dup.first
            );
        }

        let order = longest_first(mappings);

        let rules = order.into_iter().map(|index| Rule {
            input: inputs[index].clone(),
            output: mappings[index].output.clone(),
        });

        let program =
            RuleProgram::from_stream(chunk_with_separators(rules, self.rules_per_subtable));
        debug!(
            "compiled {} ligature rules into {} subtables",
            program.rule_count(),
            program.subtables().len()
        );
        Ok(program)
    }
}

/// Compile with the default subtable capacity.
pub fn compile(mappings: &[LigatureMapping]) -> Result<RuleProgram> {
    RuleCompiler::default().compile(mappings)
}

fn validate(mappings: &[LigatureMapping]) -> Result<Vec<Vec<&'static str>>> {
    mappings
        .iter()
        .enumerate()
        .map(|(index, mapping)| mapping.input_glyph_names(index))
        .collect()
}

/// Mapping indices ordered by input length, longest first.
///
/// `sort_by` is stable, so equal lengths keep table order.
fn longest_first(mappings: &[LigatureMapping]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..mappings.len()).collect();
    order.sort_by(|&a, &b| mappings[b].input_len().cmp(&mappings[a].input_len()));
    order
}
