//! String-to-string transforms applied to single fields
//!
//! A conversion either produces a new value or fails with a [`StatusEntry`]
//! whose target is the breadcrumb of conversion titles leading to the
//! failing leaf.

mod text;

pub(crate) use text::replace as replace_text;

use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::condition::{MatchResult, ValueCondition};
use crate::numeric::{self, ArithmeticOp, Numeric, NumericDomain};
use crate::pattern;
use crate::status::{ProcessStatus, StatusEntry};
use serde::{Deserialize, Serialize};

const MAX_DIGITS: i64 = 15;

/// Rounding flavour for [`ValueConversion::Round`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundMode {
    /// Nearest, halves away from zero
    Round,
    /// Toward zero
    Truncate,
    /// Toward positive infinity
    Ceiling,
}

impl RoundMode {
    fn title(self) -> &'static str {
        match self {
            RoundMode::Round => "Round",
            RoundMode::Truncate => "Truncate",
            RoundMode::Ceiling => "Ceiling",
        }
    }

    fn apply(self, value: f64, digits: i64) -> f64 {
        let factor = 10f64.powi(digits.clamp(0, MAX_DIGITS) as i32);
        let scaled = value * factor;
        // Values this large are already integral
        if !scaled.is_finite() || value.abs() >= 2f64.powi(53) {
            return value;
        }
        let rounded = match self {
            RoundMode::Round => scaled.round(),
            RoundMode::Truncate => scaled.trunc(),
            RoundMode::Ceiling => scaled.ceil(),
        };
        rounded / factor
    }
}

/// A transform over one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueConversion {
    /// Apply each conversion in order, stopping at the first failure
    Sequence {
        conversions: Vec<ValueConversion>,
    },
    Prepend {
        text: String,
    },
    Append {
        text: String,
    },
    Insert {
        position: i64,
        text: String,
    },
    Overwrite {
        position: i64,
        text: String,
    },
    Substring {
        start: i64,
        length: i64,
    },
    Upper,
    Lower,
    Trim,
    Replace {
        query: String,
        replacer: String,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    /// First regex match, or empty when nothing matches
    RegexExtract {
        pattern: String,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    Arithmetic {
        domain: NumericDomain,
        op: ArithmeticOp,
        operand: String,
    },
    Round {
        mode: RoundMode,
        #[serde(default)]
        digits: i64,
    },
    /// `TRUE`, `FALSE`, or `error_text` depending on the condition's outcome
    ConditionText {
        condition: ValueCondition,
        #[serde(default = "default_error_text")]
        error_text: String,
    },
    /// Route to one of two conversions based on a condition
    Branch {
        condition: ValueCondition,
        matched: Box<ValueConversion>,
        not_matched: Box<ValueConversion>,
    },
}

fn default_true() -> bool {
    true
}

fn default_error_text() -> String {
    "ERROR".to_string()
}

impl Default for ValueConversion {
    fn default() -> Self {
        Self::Sequence {
            conversions: Vec::new(),
        }
    }
}

impl ValueConversion {
    pub fn sequence(conversions: Vec<ValueConversion>) -> Self {
        Self::Sequence { conversions }
    }

    pub fn arithmetic(domain: NumericDomain, op: ArithmeticOp, operand: impl Into<String>) -> Self {
        Self::Arithmetic {
            domain,
            op,
            operand: operand.into(),
        }
    }

    pub fn branch(condition: ValueCondition, matched: ValueConversion, not_matched: ValueConversion) -> Self {
        Self::Branch {
            condition,
            matched: Box::new(matched),
            not_matched: Box::new(not_matched),
        }
    }

    pub fn condition_text(condition: ValueCondition) -> Self {
        Self::ConditionText {
            condition,
            error_text: default_error_text(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Sequence { .. } => "Sequence".to_string(),
            Self::Prepend { .. } => "Prepend".to_string(),
            Self::Append { .. } => "Append".to_string(),
            Self::Insert { .. } => "Insert".to_string(),
            Self::Overwrite { .. } => "Overwrite".to_string(),
            Self::Substring { .. } => "Substring".to_string(),
            Self::Upper => "Upper case".to_string(),
            Self::Lower => "Lower case".to_string(),
            Self::Trim => "Trim".to_string(),
            Self::Replace { .. } => "Replace".to_string(),
            Self::RegexExtract { .. } => "Regex extract".to_string(),
            Self::Arithmetic { domain, op, .. } => format!("{} {}", domain.name(), op.symbol()),
            Self::Round { mode, .. } => mode.title().to_string(),
            Self::ConditionText { .. } => "Condition to text".to_string(),
            Self::Branch { .. } => "If".to_string(),
        }
    }

    /// Transform a value
    pub fn convert(&self, value: &str) -> Result<String, StatusEntry> {
        self.convert_own(value)
            .map_err(|entry| entry.reparent(&self.title()))
    }

    fn convert_own(&self, value: &str) -> Result<String, StatusEntry> {
        match self {
            Self::Sequence { conversions } => {
                let mut current = value.to_string();
                for conversion in conversions {
                    current = conversion.convert(&current)?;
                }
                Ok(current)
            }
            Self::Prepend { text } => Ok(format!("{}{}", text, value)),
            Self::Append { text } => Ok(format!("{}{}", value, text)),
            Self::Insert { position, text } => {
                Ok(text::insert(value, non_negative(*position, "position")?, text))
            }
            Self::Overwrite { position, text } => {
                Ok(text::overwrite(value, non_negative(*position, "position")?, text))
            }
            Self::Substring { start, length } => Ok(text::substring(
                value,
                non_negative(*start, "start")?,
                non_negative(*length, "length")?,
            )),
            Self::Upper => Ok(value.to_uppercase()),
            Self::Lower => Ok(value.to_lowercase()),
            Self::Trim => Ok(value.trim().to_string()),
            Self::Replace {
                query,
                replacer,
                case_sensitive,
            } => text::replace(value, query, replacer, *case_sensitive)
                .map_err(|message| StatusEntry::new(message).with_argument("query")),
            Self::RegexExtract {
                pattern,
                case_sensitive,
            } => {
                let regex = pattern::compile(pattern, *case_sensitive).map_err(|e| {
                    StatusEntry::new(format!("invalid regex: {}", e)).with_argument("pattern")
                })?;
                Ok(regex
                    .find(value)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default())
            }
            Self::Arithmetic {
                domain,
                op,
                operand,
            } => {
                let result = match domain {
                    NumericDomain::Integer => numeric::arithmetic::<i64>(value, operand, *op),
                    NumericDomain::Decimal => numeric::arithmetic::<f64>(value, operand, *op),
                };
                result.map_err(StatusEntry::new)
            }
            Self::Round { mode, digits } => {
                let parsed = f64::parse(value).ok_or_else(|| {
                    StatusEntry::new(format!("'{}' is not a valid decimal", value))
                })?;
                Ok(mode.apply(parsed, *digits).to_string())
            }
            Self::ConditionText {
                condition,
                error_text,
            } => Ok(match condition.match_value(value) {
                MatchResult::Matched => "TRUE".to_string(),
                MatchResult::NotMatched => "FALSE".to_string(),
                MatchResult::Error => error_text.clone(),
            }),
            Self::Branch {
                condition,
                matched,
                not_matched,
            } => match condition.match_value(value) {
                MatchResult::Matched => matched.convert(value),
                MatchResult::NotMatched => not_matched.convert(value),
                MatchResult::Error => Err(StatusEntry::new(format!(
                    "condition '{}' could not be evaluated for '{}'",
                    condition.title(),
                    value
                ))
                .with_argument("condition")),
            },
        }
    }

    /// Static validation of this conversion and every nested node
    pub fn verify_arguments(&self) -> ProcessStatus {
        let mut status = ProcessStatus::new();
        match self {
            Self::Sequence { conversions } => {
                for conversion in conversions {
                    status.merge(conversion.verify_arguments());
                }
            }
            Self::Prepend { .. } | Self::Append { .. } | Self::Upper | Self::Lower | Self::Trim => {}
            Self::Insert { position, .. } | Self::Overwrite { position, .. } => {
                if *position < 0 {
                    status.argument_error("position", "position must not be negative");
                }
            }
            Self::Substring { start, length } => {
                if *start < 0 {
                    status.argument_error("start", "start must not be negative");
                }
                if *length < 0 {
                    status.argument_error("length", "length must not be negative");
                }
            }
            Self::Replace { query, .. } => {
                if query.is_empty() {
                    status.argument_error("query", "search text must not be empty");
                }
            }
            Self::RegexExtract { pattern, .. } => {
                if let Err(message) = pattern::validate(pattern) {
                    status.argument_error("pattern", format!("invalid regex: {}", message));
                }
            }
            Self::Arithmetic {
                domain,
                op,
                operand,
            } => match domain {
                NumericDomain::Integer => verify_operand::<i64>(&mut status, *op, operand),
                NumericDomain::Decimal => verify_operand::<f64>(&mut status, *op, operand),
            },
            Self::Round { digits, .. } => {
                if !(0..=MAX_DIGITS).contains(digits) {
                    status.argument_error(
                        "digits",
                        format!("digits must be between 0 and {}", MAX_DIGITS),
                    );
                }
            }
            Self::ConditionText { condition, .. } => status.merge(condition.verify_arguments()),
            Self::Branch {
                condition,
                matched,
                not_matched,
            } => {
                status.merge(condition.verify_arguments());
                status.merge(matched.verify_arguments().reparent("Then"));
                status.merge(not_matched.verify_arguments().reparent("Else"));
            }
        }
        status.reparent(&self.title())
    }

    pub fn arguments(&self) -> Vec<Argument<'_>> {
        match self {
            Self::Sequence { conversions } => {
                vec![Argument::new("conversions", ArgumentValue::Conversions(conversions))]
            }
            Self::Prepend { text } | Self::Append { text } => {
                vec![Argument::new("text", ArgumentValue::Text(text))]
            }
            Self::Insert { position, text } | Self::Overwrite { position, text } => vec![
                Argument::new("position", ArgumentValue::Integer(*position)),
                Argument::new("text", ArgumentValue::Text(text)),
            ],
            Self::Substring { start, length } => vec![
                Argument::new("start", ArgumentValue::Integer(*start)),
                Argument::new("length", ArgumentValue::Integer(*length)),
            ],
            Self::Upper | Self::Lower | Self::Trim => Vec::new(),
            Self::Replace {
                query,
                replacer,
                case_sensitive,
            } => vec![
                Argument::new("query", ArgumentValue::Text(query)),
                Argument::new("replacer", ArgumentValue::Text(replacer)),
                Argument::new("case_sensitive", ArgumentValue::Boolean(*case_sensitive)),
            ],
            Self::RegexExtract {
                pattern,
                case_sensitive,
            } => vec![
                Argument::new("pattern", ArgumentValue::Text(pattern)),
                Argument::new("case_sensitive", ArgumentValue::Boolean(*case_sensitive)),
            ],
            Self::Arithmetic { operand, .. } => {
                vec![Argument::new("operand", ArgumentValue::Text(operand))]
            }
            Self::Round { digits, .. } => {
                vec![Argument::new("digits", ArgumentValue::Integer(*digits))]
            }
            Self::ConditionText {
                condition,
                error_text,
            } => vec![
                Argument::new("condition", ArgumentValue::Condition(condition)),
                Argument::new("error_text", ArgumentValue::Text(error_text)),
            ],
            Self::Branch {
                condition,
                matched,
                not_matched,
            } => vec![
                Argument::new("condition", ArgumentValue::Condition(condition)),
                Argument::new("matched", ArgumentValue::Conversion(matched)),
                Argument::new("not_matched", ArgumentValue::Conversion(not_matched)),
            ],
        }
    }

    pub fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        match self {
            Self::Sequence { conversions } => {
                vec![ArgumentSlot::new("conversions", ArgumentMut::Conversions(conversions))]
            }
            Self::Prepend { text } | Self::Append { text } => {
                vec![ArgumentSlot::new("text", ArgumentMut::Text(text))]
            }
            Self::Insert { position, text } | Self::Overwrite { position, text } => vec![
                ArgumentSlot::new("position", ArgumentMut::Integer(position)),
                ArgumentSlot::new("text", ArgumentMut::Text(text)),
            ],
            Self::Substring { start, length } => vec![
                ArgumentSlot::new("start", ArgumentMut::Integer(start)),
                ArgumentSlot::new("length", ArgumentMut::Integer(length)),
            ],
            Self::Upper | Self::Lower | Self::Trim => Vec::new(),
            Self::Replace {
                query,
                replacer,
                case_sensitive,
            } => vec![
                ArgumentSlot::new("query", ArgumentMut::Text(query)),
                ArgumentSlot::new("replacer", ArgumentMut::Text(replacer)),
                ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(case_sensitive)),
            ],
            Self::RegexExtract {
                pattern,
                case_sensitive,
            } => vec![
                ArgumentSlot::new("pattern", ArgumentMut::Text(pattern)),
                ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(case_sensitive)),
            ],
            Self::Arithmetic { operand, .. } => {
                vec![ArgumentSlot::new("operand", ArgumentMut::Text(operand))]
            }
            Self::Round { digits, .. } => {
                vec![ArgumentSlot::new("digits", ArgumentMut::Integer(digits))]
            }
            Self::ConditionText {
                condition,
                error_text,
            } => vec![
                ArgumentSlot::new("condition", ArgumentMut::Condition(condition)),
                ArgumentSlot::new("error_text", ArgumentMut::Text(error_text)),
            ],
            Self::Branch {
                condition,
                matched,
                not_matched,
            } => vec![
                ArgumentSlot::new("condition", ArgumentMut::Condition(condition)),
                ArgumentSlot::new("matched", ArgumentMut::Conversion(matched)),
                ArgumentSlot::new("not_matched", ArgumentMut::Conversion(not_matched)),
            ],
        }
    }
}

fn non_negative(value: i64, name: &str) -> Result<usize, StatusEntry> {
    usize::try_from(value).map_err(|_| {
        StatusEntry::new(format!("{} must not be negative", name)).with_argument(name)
    })
}

fn verify_operand<T: Numeric>(status: &mut ProcessStatus, op: ArithmeticOp, operand: &str) {
    match T::parse(operand) {
        None => status.argument_error(
            "operand",
            format!("'{}' is not a valid {}", operand, T::DOMAIN.name()),
        ),
        Some(rhs) if op.divides() && rhs.is_zero() && T::DOMAIN == NumericDomain::Integer => {
            status.argument_error("operand", "division by zero")
        }
        Some(_) => {}
    }
}
