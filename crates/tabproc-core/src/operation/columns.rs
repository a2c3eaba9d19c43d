//! Column-shaping stages

use super::non_negative;
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::conversion::{replace_text, ValueConversion};
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Collapse every row to the single field at `index`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectColumn {
    pub index: i64,
}

/// Remove the field at `index` from every row that has it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteColumn {
    pub index: i64,
}

/// Insert a column computed from another one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateColumn {
    pub source_index: i64,
    pub insert_index: i64,
    #[serde(default)]
    pub header_name: String,
    #[serde(default)]
    pub conversion: ValueConversion,
}

/// Rewrite a column in place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditColumn {
    pub source_index: i64,
    #[serde(default)]
    pub conversion: ValueConversion,
}

/// Literal search and replace inside one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replace {
    pub query: String,
    #[serde(default)]
    pub replacer: String,
    pub target_column: i64,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Replace {
    fn default() -> Self {
        Self {
            query: String::new(),
            replacer: String::new(),
            target_column: 0,
            case_sensitive: true,
        }
    }
}

fn verify_index(index: i64, argument: &str, status: &mut ProcessStatus) {
    if index < 0 {
        status.argument_error(argument, "column index must not be negative");
    }
}

impl SelectColumn {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_index(self.index, "index", status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(index) = non_negative(self.index, "index", status) else {
            return;
        };
        if !table.has_column(index) {
            status.warn(format!("column {} does not exist", index));
        }
        for row in table.rows_mut() {
            let value = row.get(index).cloned().unwrap_or_default();
            *row = vec![value];
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![Argument::new("index", ArgumentValue::Index(self.index))]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![ArgumentSlot::new("index", ArgumentMut::Index(&mut self.index))]
    }
}

impl DeleteColumn {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_index(self.index, "index", status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(index) = non_negative(self.index, "index", status) else {
            return;
        };
        if !table.has_column(index) {
            status.warn(format!("column {} does not exist", index));
            return;
        }
        for row in table.rows_mut() {
            if index < row.len() {
                row.remove(index);
            }
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![Argument::new("index", ArgumentValue::Index(self.index))]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![ArgumentSlot::new("index", ArgumentMut::Index(&mut self.index))]
    }
}

/// Check a source column against the table, reporting an error if it is missing
fn source_column(index: i64, table: &Table, status: &mut ProcessStatus) -> Option<usize> {
    let index = non_negative(index, "source_index", status)?;
    if index >= table.column_count() {
        status.argument_error(
            "source_index",
            format!(
                "source column {} does not exist (table has {} columns)",
                index,
                table.column_count()
            ),
        );
        return None;
    }
    Some(index)
}

/// Convert the source field of every data row; the first failure aborts
fn convert_column(
    conversion: &ValueConversion,
    source: usize,
    table: &Table,
    status: &mut ProcessStatus,
) -> Option<Vec<String>> {
    let mut values = Vec::with_capacity(table.data_row_count());
    for (index, row) in table.data_rows().iter().enumerate() {
        let value = row.get(source).map_or("", String::as_str);
        match conversion.convert(value) {
            Ok(converted) => values.push(converted),
            Err(entry) => {
                status.push_error(entry.reparent(&format!("Row {}", index)));
                return None;
            }
        }
    }
    Some(values)
}

impl GenerateColumn {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_index(self.source_index, "source_index", status);
        verify_index(self.insert_index, "insert_index", status);
        status.merge(self.conversion.verify_arguments());
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(source) = source_column(self.source_index, table, status) else {
            return;
        };
        let Some(insert) = non_negative(self.insert_index, "insert_index", status) else {
            return;
        };
        let width = table.column_count();
        if insert > width {
            status.argument_error(
                "insert_index",
                format!("insert position {} is past the last column ({})", insert, width),
            );
            return;
        }
        let Some(values) = convert_column(&self.conversion, source, table, status) else {
            return;
        };

        let has_header = table.header_offset() == 1;
        let mut values = values.into_iter();
        for (index, row) in table.rows_mut().iter_mut().enumerate() {
            row.resize(width.max(row.len()), String::new());
            let value = if has_header && index == 0 {
                self.header_name.clone()
            } else {
                values.next().unwrap_or_default()
            };
            row.insert(insert, value);
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![
            Argument::new("source_index", ArgumentValue::Index(self.source_index)),
            Argument::new("insert_index", ArgumentValue::Index(self.insert_index)),
            Argument::new("header_name", ArgumentValue::Text(&self.header_name)),
            Argument::new("conversion", ArgumentValue::Conversion(&self.conversion)),
        ]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![
            ArgumentSlot::new("source_index", ArgumentMut::Index(&mut self.source_index)),
            ArgumentSlot::new("insert_index", ArgumentMut::Index(&mut self.insert_index)),
            ArgumentSlot::new("header_name", ArgumentMut::Text(&mut self.header_name)),
            ArgumentSlot::new("conversion", ArgumentMut::Conversion(&mut self.conversion)),
        ]
    }
}

impl EditColumn {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        verify_index(self.source_index, "source_index", status);
        status.merge(self.conversion.verify_arguments());
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        let Some(source) = source_column(self.source_index, table, status) else {
            return;
        };
        let Some(values) = convert_column(&self.conversion, source, table, status) else {
            return;
        };
        let offset = table.header_offset();
        for (index, value) in values.into_iter().enumerate() {
            table.set_cell(index + offset, source, value);
        }
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![
            Argument::new("source_index", ArgumentValue::Index(self.source_index)),
            Argument::new("conversion", ArgumentValue::Conversion(&self.conversion)),
        ]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![
            ArgumentSlot::new("source_index", ArgumentMut::Index(&mut self.source_index)),
            ArgumentSlot::new("conversion", ArgumentMut::Conversion(&mut self.conversion)),
        ]
    }
}

impl Replace {
    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if self.query.is_empty() {
            status.argument_error("query", "search text must not be empty");
        }
        verify_index(self.target_column, "target_column", status);
    }

    pub(crate) fn apply(&self, table: &mut Table, status: &mut ProcessStatus) {
        if self.query.is_empty() {
            status.argument_error("query", "search text must not be empty");
            return;
        }
        let Some(column) = non_negative(self.target_column, "target_column", status) else {
            return;
        };
        if !table.has_column(column) {
            status.warn(format!("column {} does not exist", column));
            return;
        }

        let offset = table.header_offset();
        let mut changes = Vec::new();
        for (index, row) in table.data_rows().iter().enumerate() {
            let Some(value) = row.get(column) else {
                continue;
            };
            match replace_text(value, &self.query, &self.replacer, self.case_sensitive) {
                Ok(replaced) if replaced != *value => changes.push((index + offset, replaced)),
                Ok(_) => {}
                Err(message) => {
                    status.argument_error("query", message);
                    return;
                }
            }
        }

        let changed = changes.len();
        for (row, value) in changes {
            table.set_cell(row, column, value);
        }
        status.message(format!("replaced text in {} cells", changed));
    }

    pub(crate) fn arguments(&self) -> Vec<Argument<'_>> {
        vec![
            Argument::new("query", ArgumentValue::Text(&self.query)),
            Argument::new("replacer", ArgumentValue::Text(&self.replacer)),
            Argument::new("target_column", ArgumentValue::Index(self.target_column)),
            Argument::new("case_sensitive", ArgumentValue::Boolean(self.case_sensitive)),
        ]
    }

    pub(crate) fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        vec![
            ArgumentSlot::new("query", ArgumentMut::Text(&mut self.query)),
            ArgumentSlot::new("replacer", ArgumentMut::Text(&mut self.replacer)),
            ArgumentSlot::new("target_column", ArgumentMut::Index(&mut self.target_column)),
            ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(&mut self.case_sensitive)),
        ]
    }
}
