//! Pipeline stages that mutate a [`Table`]
//!
//! Every stage offers `verify_arguments()`, a static check that never looks at
//! a table, and `operate()`, which applies the stage and then pads every row
//! to the widest row. Both report through [`ProcessStatus`] with entries
//! re-parented under the stage title.

mod columns;
mod concat;
mod distinct;
mod join;
mod rows;
mod sort;

pub use columns::{DeleteColumn, EditColumn, GenerateColumn, Replace, SelectColumn};
pub use concat::{Append, Paste, Prepend};
pub use distinct::Distinct;
pub use join::{Join, JoinKind};
pub use rows::{DeleteRow, FilterRow, Head, SelectRows, SkipHead, SkipTail, Tail};
pub use sort::Sort;

use crate::argument::{Argument, ArgumentSlot};
use crate::status::ProcessStatus;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A reference to another table used by joins and concatenations.
///
/// Serialises as the table's name. Cloning shares the bound table; stages
/// only ever read it.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TableOperand {
    name: String,
    table: Option<Rc<Table>>,
}

impl TableOperand {
    /// An operand that still has to be bound
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
        }
    }

    /// An operand bound to a loaded table
    pub fn bound(name: impl Into<String>, table: Rc<Table>) -> Self {
        Self {
            name: name.into(),
            table: Some(table),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.table = None;
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.table.is_some()
    }

    pub fn bind(&mut self, table: Rc<Table>) {
        self.table = Some(table);
    }

    pub(crate) fn verify(&self, status: &mut ProcessStatus) {
        if !self.is_bound() {
            let message = if self.name.is_empty() {
                "no table selected".to_string()
            } else {
                format!("table '{}' is not loaded", self.name)
            };
            status.argument_error("table", message);
        }
    }

    pub(crate) fn resolve(&self, status: &mut ProcessStatus) -> Option<&Table> {
        let table = self.table();
        if table.is_none() {
            self.verify(status);
        }
        table
    }
}

impl PartialEq for TableOperand {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && match (&self.table, &other.table) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Debug for TableOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOperand")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl From<String> for TableOperand {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<TableOperand> for String {
    fn from(operand: TableOperand) -> Self {
        operand.name
    }
}

/// Convert an argument to an index, recording an error if it is negative
pub(crate) fn non_negative(value: i64, argument: &str, status: &mut ProcessStatus) -> Option<usize> {
    match usize::try_from(value) {
        Ok(value) => Some(value),
        Err(_) => {
            status.argument_error(argument, format!("{} must not be negative", argument));
            None
        }
    }
}

/// One pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Head(Head),
    Tail(Tail),
    SkipHead(SkipHead),
    SkipTail(SkipTail),
    SelectRows(SelectRows),
    DeleteRow(DeleteRow),
    FilterRow(FilterRow),
    SelectColumn(SelectColumn),
    DeleteColumn(DeleteColumn),
    GenerateColumn(GenerateColumn),
    EditColumn(EditColumn),
    Replace(Replace),
    Sort(Sort),
    Distinct(Distinct),
    Append(Append),
    Prepend(Prepend),
    Paste(Paste),
    InnerJoin(Join),
    LeftOuterJoin(Join),
    FullOuterJoin(Join),
}

impl Operation {
    pub fn title(&self) -> &'static str {
        match self {
            Operation::Head(_) => "Head",
            Operation::Tail(_) => "Tail",
            Operation::SkipHead(_) => "Skip head",
            Operation::SkipTail(_) => "Skip tail",
            Operation::SelectRows(_) => "Select rows",
            Operation::DeleteRow(_) => "Delete row",
            Operation::FilterRow(_) => "Filter rows",
            Operation::SelectColumn(_) => "Select column",
            Operation::DeleteColumn(_) => "Delete column",
            Operation::GenerateColumn(_) => "Generate column",
            Operation::EditColumn(_) => "Edit column",
            Operation::Replace(_) => "Replace",
            Operation::Sort(_) => "Sort",
            Operation::Distinct(_) => "Distinct",
            Operation::Append(_) => "Append",
            Operation::Prepend(_) => "Prepend",
            Operation::Paste(_) => "Paste",
            Operation::InnerJoin(_) => "Inner join",
            Operation::LeftOuterJoin(_) => "Left outer join",
            Operation::FullOuterJoin(_) => "Full outer join",
        }
    }

    /// Static validation; never touches a table
    pub fn verify_arguments(&self) -> ProcessStatus {
        let mut status = ProcessStatus::new();
        match self {
            Operation::Head(op) => op.verify(&mut status),
            Operation::Tail(op) => op.verify(&mut status),
            Operation::SkipHead(op) => op.verify(&mut status),
            Operation::SkipTail(op) => op.verify(&mut status),
            Operation::SelectRows(op) => op.verify(&mut status),
            Operation::DeleteRow(op) => op.verify(&mut status),
            Operation::FilterRow(op) => op.verify(&mut status),
            Operation::SelectColumn(op) => op.verify(&mut status),
            Operation::DeleteColumn(op) => op.verify(&mut status),
            Operation::GenerateColumn(op) => op.verify(&mut status),
            Operation::EditColumn(op) => op.verify(&mut status),
            Operation::Replace(op) => op.verify(&mut status),
            Operation::Sort(op) => op.verify(&mut status),
            Operation::Distinct(op) => op.verify(&mut status),
            Operation::Append(op) => op.verify(&mut status),
            Operation::Prepend(op) => op.verify(&mut status),
            Operation::Paste(op) => op.verify(&mut status),
            Operation::InnerJoin(op) | Operation::LeftOuterJoin(op) | Operation::FullOuterJoin(op) => {
                op.verify(&mut status)
            }
        }
        status.reparent(self.title())
    }

    /// Apply the stage, then pad every row to the widest row
    pub fn operate(&self, table: &mut Table) -> ProcessStatus {
        let mut status = ProcessStatus::new();
        match self {
            Operation::Head(op) => op.apply(table, &mut status),
            Operation::Tail(op) => op.apply(table, &mut status),
            Operation::SkipHead(op) => op.apply(table, &mut status),
            Operation::SkipTail(op) => op.apply(table, &mut status),
            Operation::SelectRows(op) => op.apply(table, &mut status),
            Operation::DeleteRow(op) => op.apply(table, &mut status),
            Operation::FilterRow(op) => op.apply(table, &mut status),
            Operation::SelectColumn(op) => op.apply(table, &mut status),
            Operation::DeleteColumn(op) => op.apply(table, &mut status),
            Operation::GenerateColumn(op) => op.apply(table, &mut status),
            Operation::EditColumn(op) => op.apply(table, &mut status),
            Operation::Replace(op) => op.apply(table, &mut status),
            Operation::Sort(op) => op.apply(table, &mut status),
            Operation::Distinct(op) => op.apply(table, &mut status),
            Operation::Append(op) => op.apply(table, &mut status),
            Operation::Prepend(op) => op.apply(table, &mut status),
            Operation::Paste(op) => op.apply(table, &mut status),
            Operation::InnerJoin(op) => op.apply(JoinKind::Inner, table, &mut status),
            Operation::LeftOuterJoin(op) => op.apply(JoinKind::LeftOuter, table, &mut status),
            Operation::FullOuterJoin(op) => op.apply(JoinKind::FullOuter, table, &mut status),
        }
        table.normalize();
        status.reparent(self.title())
    }

    pub fn arguments(&self) -> Vec<Argument<'_>> {
        match self {
            Operation::Head(op) => op.arguments(),
            Operation::Tail(op) => op.arguments(),
            Operation::SkipHead(op) => op.arguments(),
            Operation::SkipTail(op) => op.arguments(),
            Operation::SelectRows(op) => op.arguments(),
            Operation::DeleteRow(op) => op.arguments(),
            Operation::FilterRow(op) => op.arguments(),
            Operation::SelectColumn(op) => op.arguments(),
            Operation::DeleteColumn(op) => op.arguments(),
            Operation::GenerateColumn(op) => op.arguments(),
            Operation::EditColumn(op) => op.arguments(),
            Operation::Replace(op) => op.arguments(),
            Operation::Sort(op) => op.arguments(),
            Operation::Distinct(op) => op.arguments(),
            Operation::Append(Append { table })
            | Operation::Prepend(Prepend { table })
            | Operation::Paste(Paste { table }) => concat::table_arguments(table),
            Operation::InnerJoin(op) | Operation::LeftOuterJoin(op) | Operation::FullOuterJoin(op) => {
                op.arguments()
            }
        }
    }

    pub fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        match self {
            Operation::Head(op) => op.arguments_mut(),
            Operation::Tail(op) => op.arguments_mut(),
            Operation::SkipHead(op) => op.arguments_mut(),
            Operation::SkipTail(op) => op.arguments_mut(),
            Operation::SelectRows(op) => op.arguments_mut(),
            Operation::DeleteRow(op) => op.arguments_mut(),
            Operation::FilterRow(op) => op.arguments_mut(),
            Operation::SelectColumn(op) => op.arguments_mut(),
            Operation::DeleteColumn(op) => op.arguments_mut(),
            Operation::GenerateColumn(op) => op.arguments_mut(),
            Operation::EditColumn(op) => op.arguments_mut(),
            Operation::Replace(op) => op.arguments_mut(),
            Operation::Sort(op) => op.arguments_mut(),
            Operation::Distinct(op) => op.arguments_mut(),
            Operation::Append(Append { table })
            | Operation::Prepend(Prepend { table })
            | Operation::Paste(Paste { table }) => concat::table_slots(table),
            Operation::InnerJoin(op) | Operation::LeftOuterJoin(op) | Operation::FullOuterJoin(op) => {
                op.arguments_mut()
            }
        }
    }

    /// External tables this stage reads, for binding after load
    pub fn table_operands_mut(&mut self) -> Vec<&mut TableOperand> {
        match self {
            Operation::Append(Append { table })
            | Operation::Prepend(Prepend { table })
            | Operation::Paste(Paste { table }) => vec![table],
            Operation::InnerJoin(op) | Operation::LeftOuterJoin(op) | Operation::FullOuterJoin(op) => {
                vec![&mut op.target]
            }
            _ => Vec::new(),
        }
    }
}
