//! Process-wide cache of compiled regular expressions
//!
//! Conditions and conversions evaluate the same pattern once per cell, so
//! compiled patterns are kept keyed by their source text and case mode.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::Mutex;

/// Compiled patterns kept per case mode before the cache is flushed
const CAPACITY: usize = 256;

#[derive(Default)]
struct Cache {
    sensitive: HashMap<String, Regex>,
    insensitive: HashMap<String, Regex>,
}

impl Cache {
    fn map(&mut self, case_sensitive: bool) -> &mut HashMap<String, Regex> {
        if case_sensitive {
            &mut self.sensitive
        } else {
            &mut self.insensitive
        }
    }
}

static CACHE: Lazy<Mutex<Cache>> = Lazy::new(|| Mutex::new(Cache::default()));

/// Compile `pattern`, reusing an earlier compilation when possible
pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    let mut cache = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let map = cache.map(case_sensitive);
    if let Some(regex) = map.get(pattern) {
        return Ok(regex.clone());
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()?;
    if map.len() >= CAPACITY {
        map.clear();
    }
    map.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

#[cfg(test)]
fn cached(case_sensitive: bool) -> usize {
    let mut cache = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.map(case_sensitive).len()
}

/// Validate a pattern, returning the compiler's message on failure
pub fn validate(pattern: &str) -> Result<(), String> {
    compile(pattern, true).map(|_| ()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_is_cached() {
        let a = compile(r"^\d+$", true).unwrap();
        let b = compile(r"^\d+$", true).unwrap();
        assert_eq!(a.as_str(), b.as_str());
        assert!(a.is_match("123"));
    }

    #[test]
    fn test_case_insensitive() {
        let re = compile("abc", false).unwrap();
        assert!(re.is_match("xABCx"));
        assert!(!compile("abc", true).unwrap().is_match("ABC"));
    }

    #[test]
    fn test_cache_is_bounded() {
        for i in 0..CAPACITY * 2 {
            let regex = compile(&format!("^bounded{}$", i), false).unwrap();
            assert!(regex.is_match(&format!("BOUNDED{}", i)));
            assert!(cached(false) <= CAPACITY);
        }
    }

    #[test]
    fn test_validate_invalid_pattern() {
        assert!(validate(r"[invalid").is_err());
        assert!(validate(r"^\d+$").is_ok());
    }
}
