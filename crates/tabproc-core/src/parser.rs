//! DSV file loading

use crate::dsv::Dsv;
use crate::error::{Error, Result};
use crate::table::Table;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// How a DSV file is laid out on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsvOptions {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub has_header: bool,
    /// WHATWG encoding label, e.g. `utf-8`, `windows-1252`, `shift_jis`
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_separator() -> String {
    "\t".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl Default for DsvOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            has_header: false,
            encoding: default_encoding(),
        }
    }
}

impl DsvOptions {
    /// Options for a separator, everything else default
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            ..Self::default()
        }
    }

    /// Builder-style header flag
    pub fn header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Resolve the configured encoding label
    pub fn resolve_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(self.encoding.clone()))
    }
}

/// Parse DSV text into a table.
///
/// Lines end at `\n` with an optional `\r`; one trailing empty line is
/// dropped, so text ending in a newline does not gain a blank row.
pub fn parse_table(text: &str, options: &DsvOptions) -> Result<Table> {
    let dsv = Dsv::for_separator(&options.separator)?;
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    let rows = lines.into_iter().map(|line| dsv.split(line)).collect();
    Ok(Table::from_rows(rows, options.has_header))
}

/// Decode bytes, honouring a byte order mark over the configured encoding
pub fn decode(bytes: &[u8], encoding: &'static Encoding, path: &Path) -> Result<String> {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::Decode {
            path: path.to_path_buf(),
            encoding: actual.name(),
        });
    }
    Ok(text.into_owned())
}

/// Load a DSV file
pub fn read_table<P: AsRef<Path>>(path: P, options: &DsvOptions) -> Result<Table> {
    let path = path.as_ref();
    let encoding = options.resolve_encoding()?;
    let bytes = std::fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = decode(&bytes, encoding, path)?;
    let table = parse_table(&text, options)?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_table_lines() {
        let table = parse_table("a\tb\r\nc\n\nd\n", &DsvOptions::default()).unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.rows()[0], vec!["a", "b"]);
        assert_eq!(table.rows()[2], vec![""]);
        assert_eq!(table.rows()[3], vec!["d"]);
    }

    #[test]
    fn test_parse_empty_text() {
        let table = parse_table("", &DsvOptions::default()).unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_with_header_and_quotes() {
        let options = DsvOptions::with_separator(",").header(true);
        let table = parse_table("name,city\n\"Smith, J\",Oslo\n", &options).unwrap();
        assert!(table.has_header());
        assert_eq!(table.data_rows()[0], vec!["Smith, J", "Oslo"]);
    }

    #[test]
    fn test_empty_separator() {
        let result = parse_table("a", &DsvOptions::with_separator(""));
        assert!(matches!(result, Err(Error::EmptySeparator)));
    }

    #[test]
    fn test_unknown_encoding() {
        let options = DsvOptions {
            encoding: "klingon".to_string(),
            ..DsvOptions::default()
        };
        assert!(matches!(
            options.resolve_encoding(),
            Err(Error::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_read_table_legacy_encoding() {
        let mut file = NamedTempFile::new().unwrap();
        // "café\tx" in windows-1252
        file.write_all(&[0x63, 0x61, 0x66, 0xE9, 0x09, 0x78, 0x0A]).unwrap();
        let options = DsvOptions {
            encoding: "windows-1252".to_string(),
            ..DsvOptions::default()
        };
        let table = read_table(file.path(), &options).unwrap();
        assert_eq!(table.rows()[0], vec!["café", "x"]);
    }

    #[test]
    fn test_read_table_bom_wins() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        file.write_all("é\n".as_bytes()).unwrap();
        let options = DsvOptions {
            encoding: "windows-1252".to_string(),
            ..DsvOptions::default()
        };
        let table = read_table(file.path(), &options).unwrap();
        assert_eq!(table.rows()[0], vec!["é"]);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x61, 0xFF, 0x0A]).unwrap();
        let result = read_table(file.path(), &DsvOptions::default());
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = read_table("/nonexistent/table.tsv", &DsvOptions::default());
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
