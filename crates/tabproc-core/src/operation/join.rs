//! Hash joins against another table
//!
//! Joined rows are the left row padded to the pre-join column count followed
//! by the right row without its key field. Keys compare as plain strings,
//! optionally case-folded.

use super::concat::promote_header;
use super::{non_negative, TableOperand};
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::condition::fold_case;
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which rows survive a join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Only rows whose key exists on both sides
    Inner,
    /// Every left row, blank-padded when unmatched
    LeftOuter,
    /// Every left row plus every unmatched right row
    FullOuter,
}

/// Join parameters shared by all join kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub key_index: i64,
    pub target: TableOperand,
    pub target_key_index: i64,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Strip the key column from the joined result
    #[serde(default)]
    pub remove_key: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Join {
    fn default() -> Self {
        Self {
            key_index: 0,
            target: TableOperand::default(),
            target_key_index: 0,
            case_sensitive: true,
            remove_key: false,
        }
    }
}

fn without(row: &[String], skip: usize) -> impl Iterator<Item = String> + '_ {
    row.iter()
        .enumerate()
        .filter(move |(i, _)| *i != skip)
        .map(|(_, v)| v.clone())
}

impl Join {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if self.key_index < 0 {
            status.argument_error("key_index", "column index must not be negative");
        }
        if self.target_key_index < 0 {
            status.argument_error("target_key_index", "column index must not be negative");
        }
        self.target.verify(status);
    }

    fn fold(&self, key: &str) -> String {
        if self.case_sensitive {
            key.to_string()
        } else {
            fold_case(key)
        }
    }

    pub(crate) fn apply(&self, kind: JoinKind, table: &mut Table, status: &mut ProcessStatus) {
        let Some(key) = non_negative(self.key_index, "key_index", status) else {
            return;
        };
        let Some(target_key) = non_negative(self.target_key_index, "target_key_index", status)
        else {
            return;
        };
        let Some(other) = self.target.resolve(status) else {
            return;
        };

        let width = table.column_count();
        let source_rows = table.data_row_count();
        promote_header(table, other.header().is_some(), width);

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in other.data_rows().iter().enumerate() {
            let value = row.get(target_key).map_or("", String::as_str);
            index.entry(self.fold(value)).or_default().push(i);
        }

        let right = other.data_rows();
        let mut matched = vec![false; right.len()];
        let mut joined = Vec::new();
        for left in table.data_rows() {
            let value = left.get(key).map_or("", String::as_str);
            match index.get(&self.fold(value)) {
                Some(hits) => {
                    for &r in hits {
                        matched[r] = true;
                        let mut row = left.clone();
                        row.resize(width.max(row.len()), String::new());
                        row.extend(without(&right[r], target_key));
                        joined.push(row);
                    }
                }
                None if kind != JoinKind::Inner => {
                    let mut row = left.clone();
                    row.resize(width.max(row.len()), String::new());
                    joined.push(row);
                }
                None => {}
            }
        }
        if kind == JoinKind::FullOuter {
            for (_, row) in right.iter().enumerate().filter(|(r, _)| !matched[*r]) {
                let mut fresh = vec![String::new(); width];
                fresh.extend(without(row, target_key));
                joined.push(fresh);
            }
        }

        let offset = table.header_offset();
        let rows = table.rows_mut();
        rows.truncate(offset);
        if offset == 1 {
            let header = &mut rows[0];
            header.resize(width, String::new());
            if let Some(other_header) = other.header() {
                header.extend(without(other_header, target_key));
            }
        }
        rows.extend(joined);

        if self.remove_key {
            for row in rows.iter_mut() {
                if key < row.len() {
                    row.remove(key);
                }
            }
        }

        let result_rows = table.data_row_count();
        if result_rows == 0 && source_rows > 0 {
            status.warn("no matching records");
        } else {
            status.message(format!("joined into {} rows", result_rows));
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![
            Argument::new("key_index", ArgumentValue::Index(self.key_index)),
            Argument::new("target", ArgumentValue::Table(&self.target)),
            Argument::new("target_key_index", ArgumentValue::Index(self.target_key_index)),
            Argument::new("case_sensitive", ArgumentValue::Boolean(self.case_sensitive)),
            Argument::new("remove_key", ArgumentValue::Boolean(self.remove_key)),
        ]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![
            ArgumentSlot::new("key_index", ArgumentMut::Index(&mut self.key_index)),
            ArgumentSlot::new("target", ArgumentMut::Table(&mut self.target)),
            ArgumentSlot::new(
                "target_key_index",
                ArgumentMut::Index(&mut self.target_key_index),
            ),
            ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(&mut self.case_sensitive)),
            ArgumentSlot::new("remove_key", ArgumentMut::Boolean(&mut self.remove_key)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn orders() -> Table {
        Table::from_str_rows(
            &[
                &["customer", "item"],
                &["1", "apple"],
                &["2", "pear"],
                &["1", "plum"],
                &["4", "fig"],
            ],
            true,
        )
    }

    fn customers() -> Rc<Table> {
        Rc::new(Table::from_str_rows(
            &[
                &["id", "name"],
                &["1", "ann"],
                &["2", "bob"],
                &["2", "bo"],
                &["3", "cid"],
            ],
            true,
        ))
    }

    fn join(target: Rc<Table>) -> Join {
        Join {
            target: TableOperand::bound("customers", target),
            ..Join::default()
        }
    }

    fn run(kind: JoinKind, join: &Join, table: &mut Table) -> ProcessStatus {
        let mut status = ProcessStatus::new();
        join.apply(kind, table, &mut status);
        table.normalize();
        status
    }

    #[test]
    fn test_inner_join_cross_product_within_key() {
        let mut table = orders();
        let status = run(JoinKind::Inner, &join(customers()), &mut table);
        assert!(status.is_success());
        // key 1: 2 left x 1 right, key 2: 1 left x 2 right
        assert_eq!(table.data_row_count(), 4);
        assert_eq!(table.rows()[0], vec!["customer", "item", "name"]);
        assert_eq!(table.rows()[1], vec!["1", "apple", "ann"]);
        assert_eq!(table.rows()[2], vec!["2", "pear", "bob"]);
        assert_eq!(table.rows()[3], vec!["2", "pear", "bo"]);
        assert_eq!(table.rows()[4], vec!["1", "plum", "ann"]);
    }

    #[test]
    fn test_left_outer_keeps_unmatched_left() {
        let mut table = orders();
        run(JoinKind::LeftOuter, &join(customers()), &mut table);
        assert_eq!(table.data_row_count(), 5);
        assert_eq!(table.rows()[5], vec!["4", "fig", ""]);
    }

    #[test]
    fn test_full_outer_adds_unmatched_right() {
        let mut table = orders();
        run(JoinKind::FullOuter, &join(customers()), &mut table);
        assert_eq!(table.data_row_count(), 6);
        assert_eq!(table.rows()[6], vec!["", "", "cid"]);
    }

    #[test]
    fn test_remove_key() {
        let mut table = orders();
        let mut join = join(customers());
        join.remove_key = true;
        run(JoinKind::Inner, &join, &mut table);
        assert_eq!(table.rows()[0], vec!["item", "name"]);
        assert_eq!(table.rows()[1], vec!["apple", "ann"]);
    }

    #[test]
    fn test_full_outer_remove_key_strips_blank_left_key() {
        let mut table = orders();
        let mut join = join(customers());
        join.remove_key = true;
        run(JoinKind::FullOuter, &join, &mut table);
        assert_eq!(table.data_row_count(), 6);
        assert_eq!(table.rows()[0], vec!["item", "name"]);
        assert_eq!(table.rows()[5], vec!["fig", ""]);
        assert_eq!(table.rows()[6], vec!["", "cid"]);
    }

    #[test]
    fn test_headerless_target_pads_left_header_only() {
        let mut table = Table::from_str_rows(&[&["customer"], &["1", "apple"]], true);
        let target = Rc::new(Table::from_str_rows(&[&["1", "ann"], &["2", "bob"]], false));
        let mut status = ProcessStatus::new();
        join(target).apply(JoinKind::Inner, &mut table, &mut status);
        assert!(table.has_header());
        assert_eq!(table.rows()[0], vec!["customer", ""]);
        assert_eq!(table.rows()[1], vec!["1", "apple", "ann"]);
        assert_eq!(table.data_row_count(), 1);
    }

    #[test]
    fn test_case_insensitive_keys() {
        let mut table = Table::from_str_rows(&[&["ABC", "x"]], false);
        let target = Rc::new(Table::from_str_rows(&[&["abc", "y"]], false));
        let mut join = join(target);
        let status = run(JoinKind::Inner, &join, &mut table.clone());
        assert_eq!(status.warnings[0].message, "no matching records");

        join.case_sensitive = false;
        run(JoinKind::Inner, &join, &mut table);
        assert_eq!(table.rows()[0], vec!["ABC", "x", "y"]);
    }

    #[test]
    fn test_headerless_left_gets_blank_header() {
        let mut table = Table::from_str_rows(&[&["1", "apple"]], false);
        run(JoinKind::Inner, &join(customers()), &mut table);
        assert!(table.has_header());
        assert_eq!(table.rows()[0], vec!["", "", "name"]);
        assert_eq!(table.rows()[1], vec!["1", "apple", "ann"]);
    }

    #[test]
    fn test_short_left_rows_pad_before_right_fields() {
        let mut table = Table::from_str_rows(&[&["k", "a", "b"], &["1"]], false);
        let target = Rc::new(Table::from_str_rows(&[&["1", "r"]], false));
        run(JoinKind::Inner, &join(target), &mut table);
        assert_eq!(table.data_row_count(), 1);
        assert_eq!(table.rows()[0], vec!["1", "", "", "r"]);
    }
}
