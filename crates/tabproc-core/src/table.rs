//! In-memory table model
//!
//! A [`Table`] is an ordered list of rows, each an independently sized list of
//! field strings. Reading a field past the end of a row yields an empty string.
//! Every structural mutation bumps the table's generation so that
//! [`RowView`]/[`ColumnView`] handles captured earlier can detect that they
//! are stale. Views also carry the identity of the table that issued them;
//! a clone is a distinct table.

use crate::error::{Error, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A mutable row/column store
#[derive(Debug, Serialize)]
pub struct Table {
    rows: Vec<Vec<String>>,
    has_header: bool,
    #[serde(skip)]
    id: u64,
    #[serde(skip)]
    generation: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self::from_rows(Vec::new(), false)
    }
}

impl Clone for Table {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            has_header: self.has_header,
            id: next_id(),
            generation: self.generation,
        }
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.has_header == other.has_header && self.rows == other.rows
    }
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from raw rows
    pub fn from_rows(rows: Vec<Vec<String>>, has_header: bool) -> Self {
        Self {
            rows,
            has_header,
            id: next_id(),
            generation: 0,
        }
    }

    /// Convenience constructor for tests and fixtures
    pub fn from_str_rows(rows: &[&[&str]], has_header: bool) -> Self {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        Self::from_rows(rows, has_header)
    }

    /// Whether row 0 is a header rather than data
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Mark or unmark row 0 as the header
    pub fn set_has_header(&mut self, has_header: bool) {
        if self.has_header != has_header {
            self.has_header = has_header;
            self.bump();
        }
    }

    /// Structural generation counter
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of leading rows that are not data (0 or 1)
    pub fn header_offset(&self) -> usize {
        if self.has_header && !self.rows.is_empty() {
            1
        } else {
            0
        }
    }

    /// Total number of rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of data rows
    pub fn data_row_count(&self) -> usize {
        self.rows.len() - self.header_offset()
    }

    /// Widest row length
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether any row actually has a field at `index`
    pub fn has_column(&self, index: usize) -> bool {
        self.rows.iter().any(|r| r.len() > index)
    }

    /// All rows, header included
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Data rows only
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[self.header_offset()..]
    }

    /// The header row, if the table has one
    pub fn header(&self) -> Option<&[String]> {
        if self.header_offset() == 1 {
            self.rows.first().map(Vec::as_slice)
        } else {
            None
        }
    }

    /// Get a row by absolute index
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get a field; missing rows and columns read as empty
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Overwrite a field, extending the row with blanks if it is too short.
    ///
    /// Returns `false` if the row does not exist. Extending a row counts as a
    /// structural change; overwriting an existing field does not.
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> bool {
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        let extended = r.len() <= column;
        if extended {
            r.resize(column + 1, String::new());
        }
        r[column] = value.into();
        if extended {
            self.bump();
        }
        true
    }

    /// Append a row at the end
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
        self.bump();
    }

    /// Insert a row at an absolute index
    pub fn insert_row(&mut self, index: usize, row: Vec<String>) {
        self.rows.insert(index, row);
        self.bump();
    }

    /// Remove a row by absolute index
    pub fn remove_row(&mut self, index: usize) -> Option<Vec<String>> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        self.bump();
        Some(row)
    }

    /// Mutable access to the row storage; always counts as a structural change
    pub fn rows_mut(&mut self) -> &mut Vec<Vec<String>> {
        self.bump();
        &mut self.rows
    }

    /// Replace all rows at once
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
        self.bump();
    }

    /// Pad every row with empty fields up to the widest row
    pub fn normalize(&mut self) {
        let width = self.column_count();
        if self.rows.iter().all(|r| r.len() == width) {
            return;
        }
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        self.bump();
    }

    /// Capture a view of a row at the current generation
    pub fn row_view(&self, index: usize) -> Option<RowView> {
        (index < self.rows.len()).then_some(RowView {
            index,
            table: self.id,
            generation: self.generation,
        })
    }

    /// Capture a view of a column at the current generation
    pub fn column_view(&self, index: usize) -> ColumnView {
        ColumnView {
            index,
            table: self.id,
            generation: self.generation,
        }
    }

    /// Dereference a row view
    pub fn resolve_row(&self, view: &RowView) -> Result<&[String]> {
        self.check("row", view.table, view.generation)?;
        self.rows
            .get(view.index)
            .map(Vec::as_slice)
            .ok_or(Error::ForeignView { kind: "row" })
    }

    /// Dereference a column view, yielding one field per row
    pub fn resolve_column(&self, view: &ColumnView) -> Result<Vec<&str>> {
        self.check("column", view.table, view.generation)?;
        Ok((0..self.rows.len())
            .map(|r| self.cell(r, view.index))
            .collect())
    }

    fn check(&self, kind: &'static str, table: u64, captured: u64) -> Result<()> {
        if table != self.id {
            return Err(Error::ForeignView { kind });
        }
        if captured != self.generation {
            return Err(Error::StaleView {
                kind,
                captured,
                current: self.generation,
            });
        }
        Ok(())
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

/// Handle to a row, valid until the next structural mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowView {
    index: usize,
    table: u64,
    generation: u64,
}

impl RowView {
    /// Absolute row index
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle to a column, valid until the next structural mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnView {
    index: usize,
    table: u64,
    generation: u64,
}

impl ColumnView {
    /// Column index
    pub fn index(&self) -> usize {
        self.index
    }
}
