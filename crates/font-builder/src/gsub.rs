//! Compile a rule program into a `GSUB` table.

use std::collections::BTreeMap;

use feature_compiler::{LANGUAGE_SYSTEMS, RuleProgram, Subtable};
use font_types::{GlyphId16, Tag};
use log::warn;
use write_fonts::tables::{
    gsub::{
        Gsub, Ligature, LigatureSet, LigatureSubstFormat1, SubstitutionLookup,
        SubstitutionLookupList,
    },
    layout::{
        CoverageTable, Feature, FeatureList, FeatureRecord, LangSys, Lookup, LookupFlag, Script,
        ScriptList, ScriptRecord,
    },
};

use crate::{Error, GlyphSet, Result};

fn tag(name: &str) -> Result<Tag> {
    let bytes: [u8; 4] =
        name.as_bytes().try_into().map_err(|_| Error::InvalidTag(name.to_string()))?;
    Ok(Tag::new(&bytes))
}

/// Outcome of compiling a program against a glyph set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Rules present in the lookup.
    pub merged: usize,
    /// Rules left out because they name a glyph the font lacks.
    pub dropped: usize,
}

fn resolve(glyphs: &GlyphSet, name: &str) -> Result<Option<GlyphId16>> {
    let Some(gid) = glyphs.glyph_id(name) else {
        return Ok(None);
    };
    let gid = u16::try_from(gid.to_u32()).map_err(|_| Error::TooManyGlyphs(glyphs.len()))?;
    Ok(Some(GlyphId16::new(gid)))
}

/// One ligature substitution subtable, `None` when none of its rules resolve.
///
/// Ligature sets are keyed by first glyph in coverage (glyph id) order;
/// within a set, ligatures keep program order. Rules naming a glyph the
/// font lacks are skipped with a warning.
fn build_subtable(
    glyphs: &GlyphSet,
    subtable: &Subtable,
    summary: &mut MergeSummary,
) -> Result<Option<LigatureSubstFormat1>> {
    let mut sets: BTreeMap<GlyphId16, Vec<Ligature>> = BTreeMap::new();

    for rule in subtable.rules() {
        let mut ids = Vec::with_capacity(rule.input.len() + 1);
        let mut missing = None;
        for name in std::iter::once(rule.output.as_str()).chain(rule.input.iter().copied()) {
            match resolve(glyphs, name)? {
                Some(gid) => ids.push(gid),
                None => {
                    missing = Some(name);
                    break;
                }
            }
        }
        if let Some(name) = missing {
            let input = rule.input.join(" ");
            warn!("Dropping ligature {input} -> {}: no glyph '{name}'", rule.output);
            summary.dropped += 1;
            continue;
        }
        let [output, first, components @ ..] = ids.as_slice() else {
            continue;
        };
        sets.entry(*first).or_default().push(Ligature::new(*output, components.to_vec()));
        summary.merged += 1;
    }

    if sets.is_empty() {
        return Ok(None);
    }
    let coverage = CoverageTable::format_1(sets.keys().copied().collect());
    let ligature_sets = sets.into_values().map(LigatureSet::new).collect();
    Ok(Some(LigatureSubstFormat1::new(coverage, ligature_sets)))
}

/// Build `GSUB` with a single ligature lookup shared by every ligature feature.
///
/// Each program subtable with at least one resolvable rule becomes one
/// lookup subtable, so lookup-level evaluation order matches the program.
/// The returned summary counts merged and dropped rules; when nothing
/// merges the table has an empty lookup and should not be written.
pub fn build_gsub(glyphs: &GlyphSet, program: &RuleProgram) -> Result<(Gsub, MergeSummary)> {
    let mut summary = MergeSummary::default();
    let mut subtables = Vec::new();
    for subtable in program.subtables() {
        if let Some(built) = build_subtable(glyphs, subtable, &mut summary)? {
            subtables.push(built);
        }
    }
    let lookup = SubstitutionLookup::Ligature(Lookup::new(LookupFlag::empty(), subtables));
    let lookup_list = SubstitutionLookupList::new(vec![lookup]);

    let mut feature_tags = program
        .feature_blocks()
        .iter()
        .map(|block| tag(block.tag))
        .collect::<Result<Vec<_>>>()?;
    feature_tags.sort();
    feature_tags.dedup();

    let feature_records = feature_tags
        .iter()
        .map(|&feature_tag| FeatureRecord::new(feature_tag, Feature::new(None, vec![0])))
        .collect();
    let feature_list = FeatureList::new(feature_records);

    let feature_indices: Vec<u16> = (0..feature_tags.len() as u16).collect();
    let mut script_records = LANGUAGE_SYSTEMS
        .iter()
        .map(|(script, _)| {
            let lang_sys = LangSys::new(feature_indices.clone());
            Ok(ScriptRecord::new(tag(script)?, Script::new(Some(lang_sys), vec![])))
        })
        .collect::<Result<Vec<_>>>()?;
    script_records.sort_by_key(|record| record.script_tag);
    let script_list = ScriptList::new(script_records);

    Ok((Gsub::new(script_list, feature_list, lookup_list), summary))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use feature_compiler::{LigatureMapping, RuleCompiler};
    use write_fonts::tables::glyf::Glyph;

    use super::*;
    use crate::GlyphEntry;

    fn glyph_set(names: &[&str]) -> GlyphSet {
        let mut set = GlyphSet::new();
        for name in names {
            let entry = GlyphEntry { advance_width: 600, codepoint: None, glyph: Glyph::Empty };
            set.insert(*name, entry).unwrap();
        }
        set
    }

    fn digits_and(extra: &[&str]) -> GlyphSet {
        let mut names = vec![
            ".notdef", "zero", "one", "two", "three", "four", "five", "six", "seven", "eight",
            "nine",
        ];
        names.extend_from_slice(extra);
        glyph_set(&names)
    }

    fn ligature_subtables(gsub: &Gsub) -> Vec<&LigatureSubstFormat1> {
        match &*gsub.lookup_list.lookups[0] {
            SubstitutionLookup::Ligature(lookup) => lookup.subtables.iter().map(|s| &**s).collect(),
            _ => panic!("expected ligature lookup"),
        }
    }

    #[test]
    fn test_tag() {
        assert_eq!(tag("liga").unwrap(), Tag::new(b"liga"));
        assert!(matches!(tag("lig"), Err(Error::InvalidTag(_))));
    }

    #[test]
    fn test_one_lookup_subtable_per_program_subtable() {
        let glyphs = digits_and(&["X", "Y", "Z"]);
        let mappings = [
            LigatureMapping::new("12", "X"),
            LigatureMapping::new("123", "Y"),
            LigatureMapping::new("45", "Z"),
        ];
        let capacity = NonZeroUsize::new(2).unwrap();
        let program = RuleCompiler::new(capacity).compile(&mappings).unwrap();
        let (gsub, _) = build_gsub(&glyphs, &program).unwrap();

        let subtables = ligature_subtables(&gsub);
        assert_eq!(subtables.len(), 2);
        assert_eq!(subtables[0].ligature_sets.len(), 1);
        let ligatures = &subtables[0].ligature_sets[0].ligatures;
        let outputs: Vec<_> = ligatures.iter().map(|l| l.ligature_glyph).collect();
        assert_eq!(outputs, [GlyphId16::new(12), GlyphId16::new(11)]);
    }

    #[test]
    fn test_features_and_scripts() {
        let glyphs = digits_and(&["X"]);
        let program = RuleCompiler::default().compile(&[LigatureMapping::new("7", "X")]).unwrap();
        let (gsub, _) = build_gsub(&glyphs, &program).unwrap();

        let features: Vec<_> =
            gsub.feature_list.feature_records.iter().map(|r| r.feature_tag).collect();
        assert_eq!(features, [Tag::new(b"dlig"), Tag::new(b"liga")]);
        assert!(
            gsub.feature_list.feature_records.iter().all(|r| r.feature.lookup_list_indices == [0])
        );

        let scripts: Vec<_> = gsub.script_list.script_records.iter().map(|r| r.script_tag).collect();
        assert_eq!(scripts, [Tag::new(b"DFLT"), Tag::new(b"latn")]);
    }

    #[test]
    fn test_rules_with_unknown_glyphs_are_dropped() {
        let glyphs = digits_and(&["X", "Y"]);
        let mappings = [
            LigatureMapping::new("12", "X"),
            LigatureMapping::new("34", "missing"),
            LigatureMapping::new("5", "Y"),
        ];
        let program = RuleCompiler::default().compile(&mappings).unwrap();
        let (gsub, summary) = build_gsub(&glyphs, &program).unwrap();

        assert_eq!(summary, MergeSummary { merged: 2, dropped: 1 });
        let subtables = ligature_subtables(&gsub);
        assert_eq!(subtables.len(), 1);
        let outputs: Vec<_> = subtables[0]
            .ligature_sets
            .iter()
            .flat_map(|set| set.ligatures.iter().map(|l| l.ligature_glyph))
            .collect();
        assert_eq!(outputs, [GlyphId16::new(11), GlyphId16::new(12)]);
    }

    #[test]
    fn test_subtable_with_no_resolvable_rules_is_omitted() {
        let glyphs = digits_and(&["X"]);
        let mappings = [
            LigatureMapping::new("123", "gone"),
            LigatureMapping::new("456", "lost"),
            LigatureMapping::new("7", "X"),
        ];
        let capacity = NonZeroUsize::new(2).unwrap();
        let program = RuleCompiler::new(capacity).compile(&mappings).unwrap();
        assert_eq!(program.subtables().len(), 2);

        let (gsub, summary) = build_gsub(&glyphs, &program).unwrap();
        assert_eq!(summary, MergeSummary { merged: 1, dropped: 2 });
        assert_eq!(ligature_subtables(&gsub).len(), 1);
    }

    #[test]
    fn test_unknown_output_glyph() {
        let glyphs = digits_and(&[]);
        let program =
            RuleCompiler::default().compile(&[LigatureMapping::new("1", "missing")]).unwrap();
        let (gsub, summary) = build_gsub(&glyphs, &program).unwrap();
        assert_eq!(summary, MergeSummary { merged: 0, dropped: 1 });
        assert!(ligature_subtables(&gsub).is_empty());
    }
}
