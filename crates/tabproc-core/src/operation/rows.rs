//! Row-selection stages

use super::non_negative;
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::condition::{MatchResult, RowCondition};
use crate::range::ValueRange;
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Keep the first `count` data rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Head {
    pub count: i64,
}

/// Keep the last `count` data rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tail {
    pub count: i64,
}

/// Drop the first `count` data rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipHead {
    pub count: i64,
}

/// Drop the last `count` data rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipTail {
    pub count: i64,
}

/// Keep the data rows whose zero-based index falls in a range such as `0-4,9`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectRows {
    pub range: String,
}

/// Remove one data row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteRow {
    pub index: i64,
}

/// Keep only the data rows matching a condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRow {
    pub condition: RowCondition,
}

fn verify_count(count: i64, status: &mut ProcessStatus) {
    if count < 0 {
        status.argument_error("count", "count must not be negative");
    }
}

fn count_arguments(count: &i64) -> Vec<Argument<'_>> {
    vec![Argument::new("count", ArgumentValue::Integer(*count))]
}

fn count_slots(count: &mut i64) -> Vec<ArgumentSlot<'_>> {
    vec![ArgumentSlot::new("count", ArgumentMut::Integer(count))]
}

/// Replace the data rows with the given absolute row range, keeping the header
fn keep_data(table: &mut Table, start: usize, end: usize) {
    let offset = table.header_offset();
    let rows = table.rows_mut();
    rows.truncate(offset + end);
    rows.drain(offset..offset + start);
}

impl Head {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_count(self.count, status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(count) = non_negative(self.count, "count", status) else {
            return;
        };
        let total = table.data_row_count();
        if count < total {
            keep_data(table, 0, count);
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        count_arguments(&self.count)
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        count_slots(&mut self.count)
    }
}

impl Tail {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_count(self.count, status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(count) = non_negative(self.count, "count", status) else {
            return;
        };
        let total = table.data_row_count();
        if count < total {
            keep_data(table, total - count, total);
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        count_arguments(&self.count)
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        count_slots(&mut self.count)
    }
}

fn skip(count: usize, from_end: bool, table: &mut Table, status: &mut ProcessStatus) {
    let total = table.data_row_count();
    if count == 0 {
        status.warn("nothing skipped");
        return;
    }
    if count >= total {
        keep_data(table, 0, 0);
        status.warn("all rows skipped");
        return;
    }
    if from_end {
        keep_data(table, 0, total - count);
    } else {
        keep_data(table, count, total);
    }
    status.message(format!("skipped {} rows", count));
}

impl SkipHead {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_count(self.count, status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        if let Some(count) = non_negative(self.count, "count", status) {
            skip(count, false, table, status);
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        count_arguments(&self.count)
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        count_slots(&mut self.count)
    }
}

impl SkipTail {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_count(self.count, status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        if let Some(count) = non_negative(self.count, "count", status) {
            skip(count, true, table, status);
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        count_arguments(&self.count)
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        count_slots(&mut self.count)
    }
}

impl SelectRows {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if let Err(e) = ValueRange::parse(&self.range) {
            status.argument_error("range", e.to_string());
        }
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let range = match ValueRange::parse(&self.range) {
            Ok(range) => range,
            Err(e) => {
                status.argument_error("range", e.to_string());
                return;
            }
        };
        let offset = table.header_offset();
        let before = table.data_row_count();
        let mut index = 0usize;
        table.rows_mut().retain(|_| {
            let position = index;
            index += 1;
            if position < offset {
                return true;
            }
            u32::try_from(position - offset).is_ok_and(|i| range.contains(i))
        });
        let kept = table.data_row_count();
        if kept == 0 && before > 0 {
            status.warn("no rows selected");
        } else {
            status.message(format!("selected {} of {} rows", kept, before));
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![Argument::new("range", ArgumentValue::Text(&self.range))]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![ArgumentSlot::new("range", ArgumentMut::Text(&mut self.range))]
    }
}

impl DeleteRow {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if self.index < 0 {
            status.argument_error("index", "row index must not be negative");
        }
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(index) = non_negative(self.index, "index", status) else {
            return;
        };
        if index >= table.data_row_count() {
            status.warn(format!("row {} does not exist", index));
            return;
        }
        let offset = table.header_offset();
        table.remove_row(index + offset);
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![Argument::new("index", ArgumentValue::Index(self.index))]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![ArgumentSlot::new("index", ArgumentMut::Index(&mut self.index))]
    }
}

impl FilterRow {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        status.merge(self.condition.verify_arguments());
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let mut keep = Vec::with_capacity(table.data_row_count());
        for (index, row) in table.data_rows().iter().enumerate() {
            match self.condition.match_row(row) {
                MatchResult::Matched => keep.push(true),
                MatchResult::NotMatched => keep.push(false),
                MatchResult::Error => {
                    status.argument_error(
                        "condition",
                        format!("condition could not be evaluated for row {}", index),
                    );
                    return;
                }
            }
        }

        let total = keep.len();
        let kept = keep.iter().filter(|k| **k).count();
        if kept == total {
            status.message("all rows satisfy the condition");
            return;
        }

        let offset = table.header_offset();
        let mut position = 0usize;
        table.rows_mut().retain(|_| {
            let current = position;
            position += 1;
            current < offset || keep[current - offset]
        });
        if kept == 0 {
            status.warn("no rows satisfy the condition");
        } else {
            status.message(format!("removed {} rows", total - kept));
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![Argument::new("condition", ArgumentValue::RowCondition(&self.condition))]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![ArgumentSlot::new(
            "condition",
            ArgumentMut::RowCondition(&mut self.condition),
        )]
    }
}
