//! tabproc-core: Core library for transforming delimiter-separated tables
//!
//! This library provides functionality to:
//! - Load and save DSV text files with configurable separator and encoding
//! - Hold tables in memory with generation-checked row and column views
//! - Build three-valued condition trees and string conversion trees
//! - Apply pipelines of operations (filters, column edits, sort, distinct, joins)
//! - Report every outcome as structured, breadcrumbed diagnostics

pub mod argument;
pub mod catalog;
pub mod condition;
pub mod conversion;
pub mod dsv;
pub mod error;
pub mod numeric;
pub mod operation;
pub mod parser;
mod pattern;
pub mod pipeline;
pub mod range;
pub mod status;
pub mod table;
pub mod writer;

pub use argument::{Argument, ArgumentKind, ArgumentMut, ArgumentSlot, ArgumentValue};
pub use catalog::CatalogEntry;
pub use condition::{MatchResult, RowCondition, TextMatchMode, ValueCondition};
pub use conversion::{RoundMode, ValueConversion};
pub use dsv::Dsv;
pub use error::{Error, Result};
pub use numeric::{ArithmeticOp, CompareOp, NumericDomain};
pub use operation::{Operation, TableOperand};
pub use parser::{parse_table, read_table, DsvOptions};
pub use pipeline::{Pipeline, PipelineFile, TableSource};
pub use range::{ValueRange, ValueRangeEntry};
pub use status::{ProcessStatus, Severity, StatusEntry};
pub use table::{ColumnView, RowView, Table};
pub use writer::{format_table, write_table};
