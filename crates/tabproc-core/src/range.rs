//! Sets of non-negative integers written as merged intervals, e.g. `1-3,5,10`

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A closed interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValueRangeEntry {
    pub start: u32,
    pub end: u32,
}

impl ValueRangeEntry {
    /// Create an entry, normalising the bounds to ascending order
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Whether `value` lies inside the interval
    pub fn contains(&self, value: u32) -> bool {
        self.start <= value && value <= self.end
    }
}

impl fmt::Display for ValueRangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Ordered set of non-overlapping, non-adjacent intervals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueRange {
    entries: Vec<ValueRangeEntry>,
}

impl ValueRange {
    /// Parse range text such as `"1-3, 5, 10-8"`
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let mut entries = text
            .split(',')
            .map(parse_entry)
            .collect::<Result<Vec<_>>>()?;
        entries.sort();

        let mut merged: Vec<ValueRangeEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match merged.last_mut() {
                Some(last) if u64::from(entry.start) <= u64::from(last.end) + 1 => {
                    last.end = last.end.max(entry.end);
                }
                _ => merged.push(entry),
            }
        }

        Ok(Self { entries: merged })
    }

    /// The merged intervals in ascending order
    pub fn entries(&self) -> &[ValueRangeEntry] {
        &self.entries
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of values in the set
    pub fn len(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.end - e.start) + 1)
            .sum()
    }

    /// Whether `value` is in the set
    pub fn contains(&self, value: u32) -> bool {
        self.entries
            .binary_search_by(|e| {
                if e.end < value {
                    std::cmp::Ordering::Less
                } else if e.start > value {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Ascending enumeration of all values
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().flat_map(|e| e.start..=e.end)
    }
}

impl FromStr for ValueRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

fn parse_entry(token: &str) -> Result<ValueRangeEntry> {
    let token = token.trim();
    let error = |reason: &str| Error::RangeFormat {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    if token.is_empty() {
        return Err(error("empty entry"));
    }

    if let Ok(value) = token.parse::<i64>() {
        let value = to_bound(value).map_err(|r| error(r))?;
        return Ok(ValueRangeEntry::new(value, value));
    }

    let (a, b) = token
        .split_once('-')
        .ok_or_else(|| error("expected N or N1-N2"))?;
    let a = parse_bound(a).map_err(|r| error(r))?;
    let b = parse_bound(b).map_err(|r| error(r))?;
    Ok(ValueRangeEntry::new(a, b))
}

fn parse_bound(text: &str) -> std::result::Result<u32, &'static str> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b'+') {
        return Err("expected a base-10 integer");
    }
    let value = text
        .parse::<i64>()
        .map_err(|_| "expected a base-10 integer")?;
    to_bound(value)
}

fn to_bound(value: i64) -> std::result::Result<u32, &'static str> {
    if value < 0 {
        return Err("negative values are not allowed");
    }
    if value > i64::from(i32::MAX) {
        return Err("value exceeds the 32-bit range");
    }
    u32::try_from(value).map_err(|_| "value exceeds the 32-bit range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1-3,5,10", "1-3,5,10")]
    #[case("1-3,4", "1-4")]
    #[case("3-1", "1-3")]
    #[case(" 7 , 2-4 ", "2-4,7")]
    #[case("1-5,3-8", "1-8")]
    #[case("0", "0")]
    #[case("", "")]
    fn test_canonical_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ValueRange::parse(input).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("1-3,5,10")]
    #[case("9,8,7,1-2")]
    #[case("100-50,51")]
    fn test_parse_is_idempotent(#[case] input: &str) {
        let once = ValueRange::parse(input).unwrap();
        let twice = ValueRange::parse(&once.to_string()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), twice.to_string());
    }

    #[rstest]
    #[case("-3")]
    #[case("1--3")]
    #[case("a")]
    #[case("1-")]
    #[case("1,,2")]
    #[case("1-2-3")]
    #[case("0x10")]
    #[case("3000000000")]
    fn test_malformed(#[case] input: &str) {
        assert!(matches!(
            ValueRange::parse(input),
            Err(Error::RangeFormat { .. })
        ));
    }

    #[test]
    fn test_contains_and_iter() {
        let range: ValueRange = "1-3,5,10".parse().unwrap();
        assert!(range.contains(1));
        assert!(range.contains(3));
        assert!(!range.contains(4));
        assert!(range.contains(10));
        assert!(!range.contains(11));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![1, 2, 3, 5, 10]);
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn test_empty_range() {
        let range = ValueRange::parse("   ").unwrap();
        assert!(range.is_empty());
        assert!(!range.contains(0));
        assert_eq!(range.iter().count(), 0);
    }
}
