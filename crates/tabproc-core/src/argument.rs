//! Typed argument introspection for operations, conditions and conversions
//!
//! Front ends list a node's arguments to render and edit them. Reading goes
//! through [`Argument`], writing through [`ArgumentSlot`]; both carry a
//! variant from a closed set so no dynamic typing is needed.

use crate::condition::{RowCondition, ValueCondition};
use crate::conversion::ValueConversion;
use crate::operation::TableOperand;

/// Shape of an argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    Text,
    Integer,
    Decimal,
    Index,
    Boolean,
    Condition,
    RowCondition,
    Conversion,
    Table,
    List(Box<ArgumentKind>),
}

/// Read access to one argument
#[derive(Debug, Clone, Copy)]
pub enum ArgumentValue<'a> {
    Text(&'a str),
    Integer(i64),
    Decimal(f64),
    Index(i64),
    Boolean(bool),
    Condition(&'a ValueCondition),
    RowCondition(&'a RowCondition),
    Conversion(&'a ValueConversion),
    Table(&'a TableOperand),
    Conditions(&'a [ValueCondition]),
    RowConditions(&'a [RowCondition]),
    Conversions(&'a [ValueConversion]),
}

impl ArgumentValue<'_> {
    /// The argument's shape
    pub fn kind(&self) -> ArgumentKind {
        match self {
            ArgumentValue::Text(_) => ArgumentKind::Text,
            ArgumentValue::Integer(_) => ArgumentKind::Integer,
            ArgumentValue::Decimal(_) => ArgumentKind::Decimal,
            ArgumentValue::Index(_) => ArgumentKind::Index,
            ArgumentValue::Boolean(_) => ArgumentKind::Boolean,
            ArgumentValue::Condition(_) => ArgumentKind::Condition,
            ArgumentValue::RowCondition(_) => ArgumentKind::RowCondition,
            ArgumentValue::Conversion(_) => ArgumentKind::Conversion,
            ArgumentValue::Table(_) => ArgumentKind::Table,
            ArgumentValue::Conditions(_) => ArgumentKind::List(Box::new(ArgumentKind::Condition)),
            ArgumentValue::RowConditions(_) => {
                ArgumentKind::List(Box::new(ArgumentKind::RowCondition))
            }
            ArgumentValue::Conversions(_) => {
                ArgumentKind::List(Box::new(ArgumentKind::Conversion))
            }
        }
    }
}

/// Write access to one argument
#[derive(Debug)]
pub enum ArgumentMut<'a> {
    Text(&'a mut String),
    Integer(&'a mut i64),
    Decimal(&'a mut f64),
    Index(&'a mut i64),
    Boolean(&'a mut bool),
    Condition(&'a mut ValueCondition),
    RowCondition(&'a mut RowCondition),
    Conversion(&'a mut ValueConversion),
    Table(&'a mut TableOperand),
    Conditions(&'a mut Vec<ValueCondition>),
    RowConditions(&'a mut Vec<RowCondition>),
    Conversions(&'a mut Vec<ValueConversion>),
}

/// A named argument for reading
#[derive(Debug, Clone, Copy)]
pub struct Argument<'a> {
    pub name: &'static str,
    pub value: ArgumentValue<'a>,
}

impl<'a> Argument<'a> {
    pub fn new(name: &'static str, value: ArgumentValue<'a>) -> Self {
        Self { name, value }
    }
}

/// A named argument for editing
#[derive(Debug)]
pub struct ArgumentSlot<'a> {
    pub name: &'static str,
    pub value: ArgumentMut<'a>,
}

impl<'a> ArgumentSlot<'a> {
    pub fn new(name: &'static str, value: ArgumentMut<'a>) -> Self {
        Self { name, value }
    }
}

/// Find an argument by name
pub fn find<'l, 'a>(arguments: &'l [Argument<'a>], name: &str) -> Option<&'l Argument<'a>> {
    arguments.iter().find(|a| a.name == name)
}
