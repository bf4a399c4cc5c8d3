//! Compiled substitution rule programs.

use crate::chunk::{Chunked, split_at_separators};

/// Feature tags that receive the compiled rules: standard and discretionary ligatures.
pub const LIGATURE_FEATURES: [&str; 2] = ["liga", "dlig"];

/// Script/language pairs the features are registered under.
pub const LANGUAGE_SYSTEMS: [(&str, &str); 2] = [("DFLT", "dflt"), ("latn", "dflt")];

/// A single ligature substitution: replace `input` glyphs by `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub input: Vec<&'static str>,
    pub output: String,
}

/// One physical partition of the rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subtable {
    rules: Vec<Rule>,
}

impl Subtable {
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A rule program statement in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    Rule(&'a Rule),
    SubtableBreak,
}

/// The rule body attached to one feature tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureBlock<'a> {
    pub tag: &'static str,
    pub statements: Vec<Statement<'a>>,
}

/// An ordered, partitioned ligature rule list.
///
/// Concatenating the subtables yields every rule sorted longest input
/// first, ties in mapping-table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleProgram {
    subtables: Vec<Subtable>,
}

impl RuleProgram {
    /// Build a program from a separated rule stream.
    pub fn from_stream(stream: impl IntoIterator<Item = Chunked<Rule>>) -> Self {
        let subtables = split_at_separators(stream)
            .into_iter()
            .map(|rules| Subtable { rules })
            .collect();
        Self { subtables }
    }

    pub fn subtables(&self) -> &[Subtable] {
        &self.subtables
    }

    /// All rules across subtable boundaries, in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.subtables.iter().flat_map(|s| s.rules.iter())
    }

    pub fn rule_count(&self) -> usize {
        self.subtables.iter().map(Subtable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }

    /// Rules interleaved with subtable breaks. No break follows the last subtable.
    pub fn statements(&self) -> Vec<Statement<'_>> {
        let mut statements = Vec::with_capacity(self.rule_count() + self.subtables.len());
        for (i, subtable) in self.subtables.iter().enumerate() {
            if i > 0 {
                statements.push(Statement::SubtableBreak);
            }
            statements.extend(subtable.rules.iter().map(Statement::Rule));
        }
        statements
    }

    /// One block per ligature feature, each carrying the same statements.
    pub fn feature_blocks(&self) -> Vec<FeatureBlock<'_>> {
        LIGATURE_FEATURES
            .iter()
            .map(|&tag| FeatureBlock { tag, statements: self.statements() })
            .collect()
    }
}
