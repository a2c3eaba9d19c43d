//! Three-valued predicates over single fields and whole rows
//!
//! Composition rules:
//! - `And` yields the first child result that is not `Matched`
//! - `Or` yields the first child result that is not `NotMatched`
//! - `Not` swaps `Matched`/`NotMatched` and passes `Error` through

mod row;
mod value;

pub use row::RowCondition;
pub use value::{TextMatchMode, ValueCondition};

/// Outcome of evaluating a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Matched,
    NotMatched,
    Error,
}

impl MatchResult {
    /// Map a boolean test onto Matched/NotMatched
    pub fn from_bool(matched: bool) -> Self {
        if matched {
            MatchResult::Matched
        } else {
            MatchResult::NotMatched
        }
    }

    /// Negation; `Error` stays `Error`
    pub fn invert(self) -> Self {
        match self {
            MatchResult::Matched => MatchResult::NotMatched,
            MatchResult::NotMatched => MatchResult::Matched,
            MatchResult::Error => MatchResult::Error,
        }
    }

    pub fn is_matched(self) -> bool {
        self == MatchResult::Matched
    }
}

/// Ordinal ignore-case folding; upper case, so `_` orders after letters
pub(crate) fn fold_case(value: &str) -> String {
    value.to_uppercase()
}

/// AND over lazily evaluated results
pub(crate) fn all_of(results: impl IntoIterator<Item = MatchResult>) -> MatchResult {
    results
        .into_iter()
        .find(|r| *r != MatchResult::Matched)
        .unwrap_or(MatchResult::Matched)
}

/// OR over lazily evaluated results
pub(crate) fn any_of(results: impl IntoIterator<Item = MatchResult>) -> MatchResult {
    results
        .into_iter()
        .find(|r| *r != MatchResult::NotMatched)
        .unwrap_or(MatchResult::NotMatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use MatchResult::*;

    #[test]
    fn test_all_of_stops_at_first_non_match() {
        assert_eq!(all_of([Matched, Matched]), Matched);
        assert_eq!(all_of([Matched, NotMatched, Error]), NotMatched);
        assert_eq!(all_of([Error, NotMatched]), Error);
        assert_eq!(all_of(Vec::<MatchResult>::new()), Matched);
    }

    #[test]
    fn test_any_of_stops_at_first_non_miss() {
        assert_eq!(any_of([NotMatched, Matched]), Matched);
        assert_eq!(any_of([NotMatched, Error, Matched]), Error);
        assert_eq!(any_of([NotMatched]), NotMatched);
        assert_eq!(any_of(Vec::<MatchResult>::new()), NotMatched);
    }

    #[test]
    fn test_all_of_is_lazy() {
        let mut evaluated = 0;
        let result = all_of([NotMatched, Matched, Matched].into_iter().inspect(|_| evaluated += 1));
        assert_eq!(result, NotMatched);
        assert_eq!(evaluated, 1);
    }

    #[test]
    fn test_invert() {
        assert_eq!(Matched.invert(), NotMatched);
        assert_eq!(NotMatched.invert(), Matched);
        assert_eq!(Error.invert(), Error);
    }
}
