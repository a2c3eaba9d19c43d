//! Conditions over a whole row

use super::{all_of, any_of, MatchResult, ValueCondition};
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::status::ProcessStatus;
use serde::{Deserialize, Serialize};

/// A predicate over one row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowCondition {
    /// Placeholder that forces the user to pick a real condition
    #[default]
    Unset,
    And {
        conditions: Vec<RowCondition>,
    },
    Or {
        conditions: Vec<RowCondition>,
    },
    Not {
        condition: Box<RowCondition>,
    },
    /// Test the field at `index`; a missing field reads as empty
    Column {
        index: i64,
        condition: ValueCondition,
    },
    /// Every field must match
    AllColumns {
        condition: ValueCondition,
    },
    /// At least one field must match
    AnyColumn {
        condition: ValueCondition,
    },
}

impl RowCondition {
    pub fn column(index: i64, condition: ValueCondition) -> Self {
        Self::Column { index, condition }
    }

    pub fn all_columns(condition: ValueCondition) -> Self {
        Self::AllColumns { condition }
    }

    pub fn any_column(condition: ValueCondition) -> Self {
        Self::AnyColumn { condition }
    }

    pub fn and(conditions: Vec<RowCondition>) -> Self {
        Self::And { conditions }
    }

    pub fn or(conditions: Vec<RowCondition>) -> Self {
        Self::Or { conditions }
    }

    pub fn not(condition: RowCondition) -> Self {
        Self::Not {
            condition: Box::new(condition),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Unset => "Unset".to_string(),
            Self::And { .. } => "And".to_string(),
            Self::Or { .. } => "Or".to_string(),
            Self::Not { .. } => "Not".to_string(),
            Self::Column { index, .. } => format!("Column {}", index),
            Self::AllColumns { .. } => "All columns".to_string(),
            Self::AnyColumn { .. } => "Any column".to_string(),
        }
    }

    /// Evaluate against a row
    pub fn match_row<S: AsRef<str>>(&self, row: &[S]) -> MatchResult {
        match self {
            Self::Unset => MatchResult::Error,
            Self::And { conditions } => all_of(conditions.iter().map(|c| c.match_row(row))),
            Self::Or { conditions } => any_of(conditions.iter().map(|c| c.match_row(row))),
            Self::Not { condition } => condition.match_row(row).invert(),
            Self::Column { index, condition } => match usize::try_from(*index) {
                Ok(index) => {
                    let value = row.get(index).map_or("", |v| v.as_ref());
                    condition.match_value(value)
                }
                Err(_) => MatchResult::Error,
            },
            Self::AllColumns { condition } => {
                all_of(row.iter().map(|v| condition.match_value(v.as_ref())))
            }
            Self::AnyColumn { condition } => {
                any_of(row.iter().map(|v| condition.match_value(v.as_ref())))
            }
        }
    }

    /// Static validation of this condition and every nested one
    pub fn verify_arguments(&self) -> ProcessStatus {
        let mut status = ProcessStatus::new();
        match self {
            Self::Unset => status.error("no condition selected"),
            Self::And { conditions } | Self::Or { conditions } => {
                if conditions.is_empty() {
                    status.argument_error("conditions", "at least one condition is required");
                }
                for condition in conditions {
                    status.merge(condition.verify_arguments());
                }
            }
            Self::Not { condition } => status.merge(condition.verify_arguments()),
            Self::Column { index, condition } => {
                if *index < 0 {
                    status.argument_error("index", "column index must not be negative");
                }
                status.merge(condition.verify_arguments());
            }
            Self::AllColumns { condition } | Self::AnyColumn { condition } => {
                status.merge(condition.verify_arguments());
            }
        }
        status.reparent(&self.title())
    }

    pub fn arguments(&self) -> Vec<Argument<'_>> {
        match self {
            Self::Unset => Vec::new(),
            Self::And { conditions } | Self::Or { conditions } => {
                vec![Argument::new("conditions", ArgumentValue::RowConditions(conditions))]
            }
            Self::Not { condition } => {
                vec![Argument::new("condition", ArgumentValue::RowCondition(condition))]
            }
            Self::Column { index, condition } => vec![
                Argument::new("index", ArgumentValue::Index(*index)),
                Argument::new("condition", ArgumentValue::Condition(condition)),
            ],
            Self::AllColumns { condition } | Self::AnyColumn { condition } => {
                vec![Argument::new("condition", ArgumentValue::Condition(condition))]
            }
        }
    }

    pub fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        match self {
            Self::Unset => Vec::new(),
            Self::And { conditions } | Self::Or { conditions } => {
                vec![ArgumentSlot::new("conditions", ArgumentMut::RowConditions(conditions))]
            }
            Self::Not { condition } => {
                vec![ArgumentSlot::new("condition", ArgumentMut::RowCondition(condition))]
            }
            Self::Column { index, condition } => vec![
                ArgumentSlot::new("index", ArgumentMut::Index(index)),
                ArgumentSlot::new("condition", ArgumentMut::Condition(condition)),
            ],
            Self::AllColumns { condition } | Self::AnyColumn { condition } => {
                vec![ArgumentSlot::new("condition", ArgumentMut::Condition(condition))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::TextMatchMode;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_condition() {
        let condition = RowCondition::column(1, ValueCondition::IsInteger);
        assert!(condition.match_row(&row(&["a", "12"])).is_matched());
        assert_eq!(condition.match_row(&row(&["a", "b"])), MatchResult::NotMatched);
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let condition = RowCondition::column(5, ValueCondition::IsEmpty);
        assert!(condition.match_row(&row(&["a"])).is_matched());
    }

    #[test]
    fn test_all_and_any_columns() {
        let digits = ValueCondition::IsInteger;
        let all = RowCondition::all_columns(digits.clone());
        let any = RowCondition::any_column(digits);

        assert!(all.match_row(&row(&["1", "2"])).is_matched());
        assert!(!all.match_row(&row(&["1", "x"])).is_matched());
        assert!(any.match_row(&row(&["x", "2"])).is_matched());
        assert!(!any.match_row(&row(&["x", "y"])).is_matched());

        let empty: Vec<String> = Vec::new();
        assert!(all.match_row(&empty).is_matched());
        assert!(!any.match_row(&empty).is_matched());
    }

    #[test]
    fn test_any_column_propagates_error() {
        let compare = ValueCondition::compare(
            crate::numeric::NumericDomain::Integer,
            crate::numeric::CompareOp::Greater,
            "5",
        );
        let any = RowCondition::any_column(compare);
        assert_eq!(any.match_row(&row(&["1", "x", "9"])), MatchResult::Error);
        assert!(any.match_row(&row(&["9", "x"])).is_matched());
    }

    #[test]
    fn test_unset_and_validation() {
        assert_eq!(RowCondition::Unset.match_row(&row(&["a"])), MatchResult::Error);
        assert!(!RowCondition::Unset.verify_arguments().is_success());

        let nested = RowCondition::and(vec![RowCondition::column(-1, ValueCondition::Unset)]);
        let status = nested.verify_arguments();
        assert_eq!(status.errors.len(), 2);
        assert_eq!(status.errors[0].target, "And > Column -1");
        assert_eq!(status.errors[1].target, "And > Column -1 > Unset");
    }

    #[test]
    fn test_composites() {
        let first_a = RowCondition::column(
            0,
            ValueCondition::text(TextMatchMode::Exact, "a", true),
        );
        let second_empty = RowCondition::column(1, ValueCondition::IsEmpty);
        let condition = RowCondition::or(vec![
            RowCondition::and(vec![first_a.clone(), second_empty]),
            RowCondition::not(first_a),
        ]);
        assert!(condition.match_row(&row(&["a", ""])).is_matched());
        assert!(!condition.match_row(&row(&["a", "x"])).is_matched());
        assert!(condition.match_row(&row(&["b", "x"])).is_matched());
    }

    #[test]
    fn test_serde_round_trip() {
        let condition = RowCondition::column(2, ValueCondition::regex("^x", false));
        let json = serde_json::to_string(&condition).unwrap();
        let back: RowCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, condition);
    }
}
