//! DSV file output

use crate::dsv::Dsv;
use crate::error::{Error, Result};
use crate::parser::DsvOptions;
use crate::table::Table;
use std::path::Path;
use tracing::info;

/// Serialise a table, one line per row, each line terminated by `\n`
pub fn format_table(table: &Table, separator: &str) -> Result<String> {
    let dsv = Dsv::for_separator(separator)?;
    let mut out = String::new();
    for row in table.rows() {
        out.push_str(&dsv.write_row(row));
        out.push('\n');
    }
    Ok(out)
}

/// Write a table to disk in the configured separator and encoding
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P, options: &DsvOptions) -> Result<()> {
    let path = path.as_ref();
    let encoding = options.resolve_encoding()?;
    let text = format_table(table, &options.separator)?;
    let (bytes, actual, had_unmappable) = encoding.encode(&text);
    if had_unmappable {
        return Err(Error::Encode {
            path: path.to_path_buf(),
            encoding: actual.name(),
        });
    }
    std::fs::write(path, &bytes).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), rows = table.row_count(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_table, read_table};
    use tempfile::tempdir;

    #[test]
    fn test_format_quotes_only_when_needed() {
        let table = Table::from_str_rows(&[&["a,b", "c"], &["d"]], false);
        assert_eq!(format_table(&table, ",").unwrap(), "\"a,b\",c\nd\n");
    }

    #[test]
    fn test_format_parse_round_trip() {
        let options = DsvOptions::default().header(true);
        let table = Table::from_str_rows(&[&["h1", "h2"], &["x", ""], &["", "y"]], true);
        let text = format_table(&table, &options.separator).unwrap();
        assert_eq!(parse_table(&text, &options).unwrap(), table);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let options = DsvOptions {
            separator: ";".to_string(),
            has_header: false,
            encoding: "windows-1252".to_string(),
        };
        let table = Table::from_str_rows(&[&["naïve", "a;b"]], false);
        write_table(&table, &path, &options).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes[2], 0xEF);
        assert_eq!(read_table(&path, &options).unwrap(), table);
    }

    #[test]
    fn test_unmappable_characters_fail_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let options = DsvOptions {
            encoding: "windows-1252".to_string(),
            ..DsvOptions::default()
        };
        let table = Table::from_str_rows(&[&["日本", "x"]], false);
        let result = write_table(&table, &path, &options);
        assert!(matches!(
            result,
            Err(Error::Encode { encoding: "windows-1252", .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_missing_directory() {
        let table = Table::new();
        let result = write_table(&table, "/nonexistent/dir/out.tsv", &DsvOptions::default());
        assert!(matches!(result, Err(Error::FileWrite { .. })));
    }
}
