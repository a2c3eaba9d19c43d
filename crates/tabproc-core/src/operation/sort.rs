//! Single-key stable sort over the data rows

use super::non_negative;
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::condition::fold_case;
use crate::numeric::{self, Numeric};
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sort {
    pub key_index: i64,
    /// Compare as decimals; unparsable cells sort as NaN (smallest)
    pub as_number: bool,
    pub reverse: bool,
    pub case_sensitive: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            key_index: 0,
            as_number: false,
            reverse: false,
            case_sensitive: true,
        }
    }
}

enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => numeric::sort_order(*a, *b),
            _ => Ordering::Equal,
        }
    }
}

impl Sort {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if self.key_index < 0 {
            status.argument_error("key_index", "column index must not be negative");
        }
    }

    fn key(&self, row: &[String], column: usize) -> SortKey {
        let value = row.get(column).map_or("", String::as_str);
        if self.as_number {
            SortKey::Number(f64::parse(value).unwrap_or(f64::NAN))
        } else if self.case_sensitive {
            SortKey::Text(value.to_string())
        } else {
            SortKey::Text(fold_case(value))
        }
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(column) = non_negative(self.key_index, "key_index", status) else {
            return;
        };
        if !table.has_column(column) {
            status.warn(format!("column {} does not exist", column));
        }

        let offset = table.header_offset();
        let rows = table.rows_mut();
        let data = rows.split_off(offset);
        let mut keyed: Vec<(SortKey, Vec<String>)> = data
            .into_iter()
            .map(|row| (self.key(&row, column), row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| {
            if self.reverse {
                b.compare(a)
            } else {
                a.compare(b)
            }
        });
        rows.extend(keyed.into_iter().map(|(_, row)| row));
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![
            Argument::new("key_index", ArgumentValue::Index(self.key_index)),
            Argument::new("as_number", ArgumentValue::Boolean(self.as_number)),
            Argument::new("reverse", ArgumentValue::Boolean(self.reverse)),
            Argument::new("case_sensitive", ArgumentValue::Boolean(self.case_sensitive)),
        ]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![
            ArgumentSlot::new("key_index", ArgumentMut::Index(&mut self.key_index)),
            ArgumentSlot::new("as_number", ArgumentMut::Boolean(&mut self.as_number)),
            ArgumentSlot::new("reverse", ArgumentMut::Boolean(&mut self.reverse)),
            ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(&mut self.case_sensitive)),
        ]
    }
}
