//! Character-indexed string helpers for text conversions

use crate::pattern;
use regex::NoExpand;

/// Byte offset of the `position`-th character, clamped to the end
fn byte_offset(value: &str, position: usize) -> usize {
    value
        .char_indices()
        .nth(position)
        .map_or(value.len(), |(offset, _)| offset)
}

pub(crate) fn insert(value: &str, position: usize, text: &str) -> String {
    let offset = byte_offset(value, position);
    let mut result = String::with_capacity(value.len() + text.len());
    result.push_str(&value[..offset]);
    result.push_str(text);
    result.push_str(&value[offset..]);
    result
}

/// Overwrite characters starting at `position`, extending the value if needed
pub(crate) fn overwrite(value: &str, position: usize, text: &str) -> String {
    let start = byte_offset(value, position);
    let end = byte_offset(value, position + text.chars().count());
    let end = end.max(start);
    let mut result = String::with_capacity(value.len() + text.len());
    result.push_str(&value[..start]);
    result.push_str(text);
    result.push_str(&value[end..]);
    result
}

pub(crate) fn substring(value: &str, start: usize, length: usize) -> String {
    value.chars().skip(start).take(length).collect()
}

/// Literal replacement of every occurrence of `query`
pub(crate) fn replace(
    value: &str,
    query: &str,
    replacer: &str,
    case_sensitive: bool,
) -> Result<String, String> {
    if case_sensitive {
        return Ok(value.replace(query, replacer));
    }
    let regex = pattern::compile(&regex::escape(query), false).map_err(|e| e.to_string())?;
    Ok(regex.replace_all(value, NoExpand(replacer)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert() {
        assert_eq!(insert("abcd", 2, "XY"), "abXYcd");
        assert_eq!(insert("abcd", 0, "X"), "Xabcd");
        assert_eq!(insert("ab", 10, "X"), "abX");
        assert_eq!(insert("äöü", 1, "-"), "ä-öü");
    }

    #[test]
    fn test_overwrite() {
        assert_eq!(overwrite("abcdef", 2, "XY"), "abXYef");
        assert_eq!(overwrite("abc", 2, "XYZ"), "abXYZ");
        assert_eq!(overwrite("abc", 5, "X"), "abcX");
        assert_eq!(overwrite("äöü", 0, "a"), "aöü");
    }

    #[test]
    fn test_substring() {
        assert_eq!(substring("hello world", 6, 5), "world");
        assert_eq!(substring("hello", 3, 10), "lo");
        assert_eq!(substring("hello", 10, 2), "");
        assert_eq!(substring("äöü", 1, 1), "ö");
    }

    #[test]
    fn test_replace() {
        assert_eq!(replace("foo boo", "o", "0", true).unwrap(), "f00 b00");
        assert_eq!(replace("Foo", "f", "g", true).unwrap(), "Foo");
        assert_eq!(replace("Foo", "f", "g", false).unwrap(), "goo");
        assert_eq!(replace("a.b", ".", "$1", false).unwrap(), "a$1b");
    }
}
