//! Ligature mappings and the digit glyph table.

use std::collections::HashMap;

use crate::{Error, Result};

/// Maximum number of digits a single ligature may consume.
pub const MAX_INPUT_LEN: usize = 4;

/// Standard glyph names for the ASCII decimal digits.
pub const DIGIT_GLYPH_NAMES: [(char, &str); 10] = [
    ('0', "zero"),
    ('1', "one"),
    ('2', "two"),
    ('3', "three"),
    ('4', "four"),
    ('5', "five"),
    ('6', "six"),
    ('7', "seven"),
    ('8', "eight"),
    ('9', "nine"),
];

/// Look up the standard glyph name for a digit character.
pub fn digit_glyph_name(c: char) -> Option<&'static str> {
    DIGIT_GLYPH_NAMES
        .iter()
        .find(|(digit, _)| *digit == c)
        .map(|(_, name)| *name)
}

/// A digit sequence that should be replaced by a single numeral glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigatureMapping {
    /// Digit characters, `"0"`..`"9999"`.
    pub input: String,
    /// Output glyph name, used verbatim.
    pub output: String,
}

impl LigatureMapping {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self { input: input.into(), output: output.into() }
    }

    /// Number of input characters.
    pub fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Validate the input and translate it to glyph names.
    ///
    /// `index` is the mapping's position in its table and only feeds error
    /// messages.
    pub fn input_glyph_names(&self, index: usize) -> Result<Vec<&'static str>> {
        let len = self.input_len();
        if !(1..=MAX_INPUT_LEN).contains(&len) {
            return Err(Error::InvalidLength { index, input: self.input.clone(), len });
        }

        self.input
            .chars()
            .map(|character| {
                digit_glyph_name(character).ok_or_else(|| Error::InvalidCharacter {
                    index,
                    input: self.input.clone(),
                    character,
                })
            })
            .collect()
    }
}

/// A mapping whose input repeats an earlier mapping's input.
///
/// Under first-match-wins evaluation the later rule can never fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateInput {
    pub input: String,
    /// Index of the first mapping with this input.
    pub first: usize,
    /// Index of the shadowed mapping.
    pub duplicate: usize,
}

/// Report every mapping whose input digits were already used earlier in the table.
pub fn find_duplicate_inputs(mappings: &[LigatureMapping]) -> Vec<DuplicateInput> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for (index, mapping) in mappings.iter().enumerate() {
        match seen.get(mapping.input.as_str()) {
            Some(&first) => duplicates.push(DuplicateInput {
                input: mapping.input.clone(),
                first,
                duplicate: index,
            }),
            None => {
                seen.insert(&mapping.input, index);
            }
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_table_covers_all_digits() {
        for (value, c) in ('0'..='9').enumerate() {
            assert_eq!(digit_glyph_name(c), Some(DIGIT_GLYPH_NAMES[value].1));
        }
        assert_eq!(digit_glyph_name('a'), None);
        assert_eq!(digit_glyph_name('٣'), None);
    }

    #[test]
    fn test_input_glyph_names() {
        let mapping = LigatureMapping::new("1907", "cistercian_1907");
        assert_eq!(mapping.input_glyph_names(0).unwrap(), ["one", "nine", "zero", "seven"]);
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = LigatureMapping::new("", "X").input_glyph_names(3).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { index: 3, len: 0, .. }));
    }

    #[test]
    fn test_rejects_long_input() {
        let err = LigatureMapping::new("12345", "X").input_glyph_names(0).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { len: 5, .. }));
    }

    #[test]
    fn test_rejects_non_digit() {
        let err = LigatureMapping::new("1a", "Q").input_glyph_names(7).unwrap_err();
        match err {
            Error::InvalidCharacter { index, character, input } => {
                assert_eq!(index, 7);
                assert_eq!(character, 'a');
                assert_eq!(input, "1a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_duplicate_inputs() {
        let mappings = vec![
            LigatureMapping::new("12", "A"),
            LigatureMapping::new("3", "B"),
            LigatureMapping::new("12", "C"),
            LigatureMapping::new("12", "D"),
        ];
        let duplicates = find_duplicate_inputs(&mappings);
        assert_eq!(
            duplicates,
            vec![
                DuplicateInput { input: "12".to_string(), first: 0, duplicate: 2 },
                DuplicateInput { input: "12".to_string(), first: 0, duplicate: 3 },
            ]
        );
    }

    #[test]
    fn test_no_duplicates() {
        let mappings = vec![LigatureMapping::new("1", "A"), LigatureMapping::new("11", "B")];
        assert!(find_duplicate_inputs(&mappings).is_empty());
    }
}
