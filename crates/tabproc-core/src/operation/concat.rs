//! Row-wise and column-wise concatenation with another table

use super::TableOperand;
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Add another table's data rows after this table's
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Append {
    pub table: TableOperand,
}

/// Add another table's data rows before this table's
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prepend {
    pub table: TableOperand,
}

/// Place another table's columns to the right of this table's, row by row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paste {
    pub table: TableOperand,
}

pub(crate) fn table_arguments(table: &TableOperand) -> Vec<Argument<'_>> {
    vec![Argument::new("table", ArgumentValue::Table(table))]
}

pub(crate) fn table_slots(table: &mut TableOperand) -> Vec<ArgumentSlot<'_>> {
    vec![ArgumentSlot::new("table", ArgumentMut::Table(table))]
}

impl Append {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        self.table.verify(status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(other) = self.table.resolve(status) else {
            return;
        };
        let added = other.data_row_count();
        table.rows_mut().extend(other.data_rows().iter().cloned());
        status.message(format!("appended {} rows", added));
    }
}

impl Prepend {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        self.table.verify(status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(other) = self.table.resolve(status) else {
            return;
        };
        let added = other.data_row_count();
        let offset = table.header_offset();
        let rows = table.rows_mut();
        let tail = rows.split_off(offset);
        rows.extend(other.data_rows().iter().cloned());
        rows.extend(tail);
        status.message(format!("prepended {} rows", added));
    }
}

impl Paste {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        self.table.verify(status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(other) = self.table.resolve(status) else {
            return;
        };
        let width = table.column_count();
        promote_header(table, other.header().is_some(), width);

        let offset = table.header_offset();
        let other_offset = other.header_offset();
        let rows = table.rows_mut();

        if offset == 1 {
            let header = &mut rows[0];
            header.resize(width, String::new());
            if let Some(other_header) = other.header() {
                header.extend(other_header.iter().cloned());
            }
        }

        let other_data = &other.rows()[other_offset..];
        let needed = offset + other_data.len();
        if rows.len() < needed {
            rows.resize(needed, Vec::new());
        }
        for (row, pasted) in rows[offset..].iter_mut().zip(other_data) {
            row.resize(width, String::new());
            row.extend(pasted.iter().cloned());
        }
    }
}

/// Give a headerless table a blank header row when the other side brings one
pub(crate) fn promote_header(table: &mut Table, other_has_header: bool, width: usize) {
    if other_has_header && !table.has_header() {
        table.insert_row(0, vec![String::new(); width]);
        table.set_has_header(true);
    }
}
