//! Duplicate-row removal

use super::non_negative;
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::condition::fold_case;
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Drop later duplicates, keeping the first occurrence.
///
/// With `is_all` whole rows are compared after trimming trailing blank
/// fields; otherwise only the field at `key_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distinct {
    pub is_all: bool,
    pub key_index: i64,
    pub case_sensitive: bool,
}

impl Default for Distinct {
    fn default() -> Self {
        Self {
            is_all: true,
            key_index: 0,
            case_sensitive: true,
        }
    }
}

impl Distinct {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if !self.is_all && self.key_index < 0 {
            status.argument_error("key_index", "column index must not be negative");
        }
    }

    fn fold(&self, value: &str) -> String {
        if self.case_sensitive {
            value.to_string()
        } else {
            fold_case(value)
        }
    }

    fn key(&self, row: &[String], column: Option<usize>) -> Vec<String> {
        match column {
            Some(column) => vec![self.fold(row.get(column).map_or("", String::as_str))],
            None => {
                let used = row
                    .iter()
                    .rposition(|v| !v.is_empty())
                    .map_or(0, |last| last + 1);
                row[..used].iter().map(|v| self.fold(v)).collect()
            }
        }
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let column = if self.is_all {
            None
        } else {
            match non_negative(self.key_index, "key_index", status) {
                Some(column) => Some(column),
                None => return,
            }
        };

        let offset = table.header_offset();
        let mut seen = HashSet::new();
        let keep: Vec<bool> = table
            .data_rows()
            .iter()
            .map(|row| seen.insert(self.key(row, column)))
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            status.message("rows are already unique");
            return;
        }

        let mut position = 0usize;
        table.rows_mut().retain(|_| {
            let current = position;
            position += 1;
            current < offset || keep[current - offset]
        });
        status.message(format!("removed {} duplicate rows", removed));
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![
            Argument::new("is_all", ArgumentValue::Boolean(self.is_all)),
            Argument::new("key_index", ArgumentValue::Index(self.key_index)),
            Argument::new("case_sensitive", ArgumentValue::Boolean(self.case_sensitive)),
        ]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![
            ArgumentSlot::new("is_all", ArgumentMut::Boolean(&mut self.is_all)),
            ArgumentSlot::new("key_index", ArgumentMut::Index(&mut self.key_index)),
            ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(&mut self.case_sensitive)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_str_rows(
            &[
                &["a", "1"],
                &["b", "2"],
                &["a", "1", ""],
                &["A", "1"],
                &["b", "3"],
            ],
            false,
        )
    }

    #[test]
    fn test_whole_row_ignores_trailing_blanks() {
        let mut table = sample();
        let mut status = ProcessStatus::new();
        Distinct::default().apply(&mut table, &mut status);
        assert_eq!(table.row_count(), 4);
        assert_eq!(status.messages[0].message, "removed 1 duplicate rows");
    }

    #[test]
    fn test_case_insensitive_key_column() {
        let mut table = sample();
        let distinct = Distinct {
            is_all: false,
            key_index: 0,
            case_sensitive: false,
        };
        let mut status = ProcessStatus::new();
        distinct.apply(&mut table, &mut status);
        let keys: Vec<&str> = table.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(table.rows()[1][1], "2");
    }

    #[test]
    fn test_idempotent() {
        let mut table = sample();
        let mut status = ProcessStatus::new();
        Distinct::default().apply(&mut table, &mut status);
        let once = table.clone();
        let mut status = ProcessStatus::new();
        Distinct::default().apply(&mut table, &mut status);
        assert_eq!(table, once);
        assert_eq!(status.messages[0].message, "rows are already unique");
    }

    #[test]
    fn test_header_is_never_a_duplicate() {
        let mut table = Table::from_str_rows(&[&["x"], &["x"], &["x"]], true);
        let mut status = ProcessStatus::new();
        Distinct::default().apply(&mut table, &mut status);
        assert_eq!(table.row_count(), 2);
        assert!(table.has_header());
    }
}
