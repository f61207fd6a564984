//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// SQL pattern to be used for fuzzy searching.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the given `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "({})",
            input.split_ascii_whitespace().format_with("|", |word, f| {
                f(&format_args!(
                    "%{}%",
                    word.replace('\\', r"\\")
                        .replace('%', r"\%")
                        .replace('|', r"\|")
                        .replace('*', r"\*")
                        .replace('+', r"\+")
                        .replace('?', r"\?")
                        .replace('{', r"\{")
                        .replace('}', r"\}")
                        .replace('(', r"\(")
                        .replace(')', r"\)")
                        .replace('[', r"\[")
                        .replace(']', r"\]")
                        .replace('_', r"\_")
                ))
            }),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn single_word_becomes_substring_pattern() {
        assert_eq!(FuzzPattern::new("loft").to_string(), "(%loft%)");
    }

    #[test]
    fn words_are_alternated() {
        assert_eq!(
            FuzzPattern::new("sunny loft").to_string(),
            "(%sunny%|%loft%)",
        );
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(
            FuzzPattern::new("50%_off").to_string(),
            r"(%50\%\_off%)",
        );
    }
}
