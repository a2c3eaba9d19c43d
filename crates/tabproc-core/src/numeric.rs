//! Numeric domains shared by comparisons and arithmetic conversions
//!
//! Cells are text; typed operations parse them into a [`Numeric`] domain,
//! compute, and format the result back.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which numeric type a typed node parses into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericDomain {
    /// 64-bit signed integers
    Integer,
    /// 64-bit floating point
    Decimal,
}

impl NumericDomain {
    /// Lowercase name used in titles and messages
    pub fn name(self) -> &'static str {
        match self {
            NumericDomain::Integer => "integer",
            NumericDomain::Decimal => "decimal",
        }
    }

    /// Whether `text` parses in this domain
    pub fn accepts(self, text: &str) -> bool {
        match self {
            NumericDomain::Integer => i64::parse(text).is_some(),
            NumericDomain::Decimal => f64::parse(text).is_some(),
        }
    }
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOp {
    /// Operator symbol
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "%",
        }
    }

    /// Whether a zero right-hand operand is undefined for this operator
    pub fn divides(self) -> bool {
        matches!(self, ArithmeticOp::Divide | ArithmeticOp::Modulo)
    }
}

/// Comparison operators, evaluated as `value OP literal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
}

impl CompareOp {
    /// Operator symbol
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Greater => ">",
            CompareOp::Less => "<",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Equal => "==",
        }
    }

    /// Evaluate against the ordering of `value` relative to the literal.
    /// An unordered pair (NaN) satisfies nothing.
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Equal => ordering == Ordering::Equal,
        }
    }
}

/// A numeric type cells can be parsed into
pub trait Numeric: Copy + PartialOrd + fmt::Display {
    /// Domain tag for this type
    const DOMAIN: NumericDomain;

    /// Parse a cell; surrounding whitespace is ignored
    fn parse(text: &str) -> Option<Self>;

    /// Apply an operator, returning `None` when the result is undefined
    fn apply(op: ArithmeticOp, lhs: Self, rhs: Self) -> Option<Self>;

    /// Whether this value is zero
    fn is_zero(self) -> bool;

    /// Compare two values
    fn compare(self, other: Self) -> Option<Ordering> {
        self.partial_cmp(&other)
    }
}

impl Numeric for i64 {
    const DOMAIN: NumericDomain = NumericDomain::Integer;

    fn parse(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn apply(op: ArithmeticOp, lhs: Self, rhs: Self) -> Option<Self> {
        match op {
            ArithmeticOp::Add => lhs.checked_add(rhs),
            ArithmeticOp::Subtract => lhs.checked_sub(rhs),
            ArithmeticOp::Multiply => lhs.checked_mul(rhs),
            ArithmeticOp::Divide => lhs.checked_div(rhs),
            ArithmeticOp::Modulo => lhs.checked_rem(rhs),
        }
    }

    fn is_zero(self) -> bool {
        self == 0
    }
}

impl Numeric for f64 {
    const DOMAIN: NumericDomain = NumericDomain::Decimal;

    fn parse(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn apply(op: ArithmeticOp, lhs: Self, rhs: Self) -> Option<Self> {
        Some(match op {
            ArithmeticOp::Add => lhs + rhs,
            ArithmeticOp::Subtract => lhs - rhs,
            ArithmeticOp::Multiply => lhs * rhs,
            ArithmeticOp::Divide => lhs / rhs,
            ArithmeticOp::Modulo => lhs % rhs,
        })
    }

    fn is_zero(self) -> bool {
        self == 0.0
    }
}

/// Compare a cell against a literal in domain `T`; `None` if either fails to parse
pub fn compare<T: Numeric>(value: &str, literal: &str, op: CompareOp) -> Option<bool> {
    let value = T::parse(value)?;
    let literal = T::parse(literal)?;
    Some(op.holds(value.compare(literal)))
}

/// Compute `value OP operand` in domain `T`, formatting the result
pub fn arithmetic<T: Numeric>(
    value: &str,
    operand: &str,
    op: ArithmeticOp,
) -> Result<String, String> {
    let lhs = T::parse(value)
        .ok_or_else(|| format!("'{}' is not a valid {}", value, T::DOMAIN.name()))?;
    let rhs = T::parse(operand)
        .ok_or_else(|| format!("operand '{}' is not a valid {}", operand, T::DOMAIN.name()))?;
    T::apply(op, lhs, rhs)
        .map(|result| result.to_string())
        .ok_or_else(|| {
            format!(
                "{} {} {} is undefined in the {} domain",
                lhs,
                op.symbol(),
                rhs,
                T::DOMAIN.name()
            )
        })
}

/// Total order used by numeric sorting: NaN sorts below everything else
pub fn sort_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
