//! Delimiter-separated-value line codec
//!
//! Fields are unquoted by default. A field whose content is wrapped in the
//! quote character has the quotes stripped and keeps its inner text verbatim,
//! separators included. The quote is `"` unless the separator contains `"`,
//! in which case it is `'`. There is no escaped-quote syntax: a quote that
//! never closes leaves the raw token in place.

use crate::error::{Error, Result};
use crate::pattern;
use once_cell::sync::Lazy;
use regex::Regex;

static TAB: Lazy<Option<Dsv>> = Lazy::new(|| Dsv::new("\t").ok());
static COMMA: Lazy<Option<Dsv>> = Lazy::new(|| Dsv::new(",").ok());

/// Codec bound to one separator
#[derive(Debug, Clone)]
pub struct Dsv {
    separator: String,
    quote: char,
    quoted: Regex,
}

impl Dsv {
    /// Build a codec for an arbitrary separator
    pub fn new(separator: &str) -> Result<Self> {
        if separator.is_empty() {
            return Err(Error::EmptySeparator);
        }
        let quote = quote_for(separator);
        let source = format!(
            "^{q}(?s:(.*?)){q}(?:({sep})|$)",
            q = regex::escape(&quote.to_string()),
            sep = regex::escape(separator)
        );
        let quoted = pattern::compile(&source, true).map_err(|e| Error::InvalidRegex {
            pattern: source.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            separator: separator.to_string(),
            quote,
            quoted,
        })
    }

    /// Get a codec, using the precompiled ones for tab and comma
    pub fn for_separator(separator: &str) -> Result<Self> {
        let precompiled = match separator {
            "\t" => TAB.as_ref(),
            "," => COMMA.as_ref(),
            _ => None,
        };
        match precompiled {
            Some(dsv) => Ok(dsv.clone()),
            None => Self::new(separator),
        }
    }

    /// The separator this codec splits on
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The quote character this codec recognises
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Split a line into fields
    pub fn split(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut rest = line;

        loop {
            if let Some(caps) = self.quoted.captures(rest) {
                fields.push(caps.get(1).map_or("", |m| m.as_str()).to_string());
                if caps.get(2).is_none() {
                    break;
                }
                let end = caps.get(0).map_or(rest.len(), |m| m.end());
                rest = &rest[end..];
                continue;
            }

            match rest.find(self.separator.as_str()) {
                Some(pos) => {
                    fields.push(rest[..pos].to_string());
                    rest = &rest[pos + self.separator.len()..];
                }
                None => {
                    fields.push(rest.to_string());
                    break;
                }
            }
        }

        fields
    }

    /// Join fields into a line, quoting fields that contain the separator
    pub fn write_row<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push_str(&self.separator);
            }
            let field = field.as_ref();
            if field.contains(self.separator.as_str()) {
                line.push(self.quote);
                line.push_str(field);
                line.push(self.quote);
            } else {
                line.push_str(field);
            }
        }
        line
    }
}

/// Split a line with the given separator
pub fn split(line: &str, separator: &str) -> Result<Vec<String>> {
    Ok(Dsv::for_separator(separator)?.split(line))
}

/// Join fields with the given separator
pub fn write_row<S: AsRef<str>>(fields: &[S], separator: &str) -> Result<String> {
    Ok(Dsv::for_separator(separator)?.write_row(fields))
}

fn quote_for(separator: &str) -> char {
    if separator.contains('"') {
        '\''
    } else {
        '"'
    }
}
