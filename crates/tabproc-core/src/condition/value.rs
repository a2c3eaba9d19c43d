//! Conditions over a single field

use super::{all_of, any_of, fold_case, MatchResult};
use crate::argument::{Argument, ArgumentMut, ArgumentSlot, ArgumentValue};
use crate::numeric::{self, CompareOp, NumericDomain};
use crate::pattern;
use crate::status::ProcessStatus;
use serde::{Deserialize, Serialize};

/// How a text condition compares the field with its search text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatchMode {
    Exact,
    Contains,
    StartsWith,
    EndsWith,
}

impl TextMatchMode {
    fn title(self) -> &'static str {
        match self {
            TextMatchMode::Exact => "Equals",
            TextMatchMode::Contains => "Contains",
            TextMatchMode::StartsWith => "Starts with",
            TextMatchMode::EndsWith => "Ends with",
        }
    }

    fn test(self, value: &str, text: &str) -> bool {
        match self {
            TextMatchMode::Exact => value == text,
            TextMatchMode::Contains => value.contains(text),
            TextMatchMode::StartsWith => value.starts_with(text),
            TextMatchMode::EndsWith => value.ends_with(text),
        }
    }
}

/// A predicate over one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueCondition {
    /// Placeholder that forces the user to pick a real condition
    #[default]
    Unset,
    And {
        conditions: Vec<ValueCondition>,
    },
    Or {
        conditions: Vec<ValueCondition>,
    },
    Not {
        condition: Box<ValueCondition>,
    },
    IsEmpty,
    /// Parseable as a 64-bit signed integer
    IsInteger,
    /// Parseable as a double
    IsDecimal,
    Text {
        mode: TextMatchMode,
        text: String,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    Regex {
        pattern: String,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    /// `field OP value`, both parsed in `domain`
    Compare {
        domain: NumericDomain,
        op: CompareOp,
        value: String,
    },
}

fn default_true() -> bool {
    true
}

impl ValueCondition {
    pub fn text(mode: TextMatchMode, text: impl Into<String>, case_sensitive: bool) -> Self {
        Self::Text {
            mode,
            text: text.into(),
            case_sensitive,
        }
    }

    pub fn regex(pattern: impl Into<String>, case_sensitive: bool) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            case_sensitive,
        }
    }

    pub fn compare(domain: NumericDomain, op: CompareOp, value: impl Into<String>) -> Self {
        Self::Compare {
            domain,
            op,
            value: value.into(),
        }
    }

    pub fn and(conditions: Vec<ValueCondition>) -> Self {
        Self::And { conditions }
    }

    pub fn or(conditions: Vec<ValueCondition>) -> Self {
        Self::Or { conditions }
    }

    pub fn not(condition: ValueCondition) -> Self {
        Self::Not {
            condition: Box::new(condition),
        }
    }

    /// Display title, also used as the breadcrumb segment in diagnostics
    pub fn title(&self) -> String {
        match self {
            Self::Unset => "Unset".to_string(),
            Self::And { .. } => "And".to_string(),
            Self::Or { .. } => "Or".to_string(),
            Self::Not { .. } => "Not".to_string(),
            Self::IsEmpty => "Is empty".to_string(),
            Self::IsInteger => "Is integer".to_string(),
            Self::IsDecimal => "Is decimal".to_string(),
            Self::Text { mode, .. } => mode.title().to_string(),
            Self::Regex { .. } => "Matches regex".to_string(),
            Self::Compare { domain, op, .. } => format!("{} {}", domain.name(), op.symbol()),
        }
    }

    /// Evaluate against a field
    pub fn match_value(&self, value: &str) -> MatchResult {
        match self {
            Self::Unset => MatchResult::Error,
            Self::And { conditions } => all_of(conditions.iter().map(|c| c.match_value(value))),
            Self::Or { conditions } => any_of(conditions.iter().map(|c| c.match_value(value))),
            Self::Not { condition } => condition.match_value(value).invert(),
            Self::IsEmpty => MatchResult::from_bool(value.is_empty()),
            Self::IsInteger => MatchResult::from_bool(NumericDomain::Integer.accepts(value)),
            Self::IsDecimal => MatchResult::from_bool(NumericDomain::Decimal.accepts(value)),
            Self::Text {
                mode,
                text,
                case_sensitive,
            } => {
                let matched = if *case_sensitive {
                    mode.test(value, text)
                } else {
                    mode.test(&fold_case(value), &fold_case(text))
                };
                MatchResult::from_bool(matched)
            }
            Self::Regex {
                pattern,
                case_sensitive,
            } => match pattern::compile(pattern, *case_sensitive) {
                Ok(regex) => MatchResult::from_bool(regex.is_match(value)),
                Err(_) => MatchResult::Error,
            },
            Self::Compare { domain, op, value: literal } => {
                let result = match domain {
                    NumericDomain::Integer => numeric::compare::<i64>(value, literal, *op),
                    NumericDomain::Decimal => numeric::compare::<f64>(value, literal, *op),
                };
                result.map_or(MatchResult::Error, MatchResult::from_bool)
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
            Self::IsEmpty | Self::IsInteger | Self::IsDecimal => {}
            Self::Text { text, .. } => {
                if text.is_empty() {
                    status.argument_error("text", "search text must not be empty");
                }
            }
            Self::Regex { pattern, .. } => {
                if let Err(message) = pattern::validate(pattern) {
                    status.argument_error("pattern", format!("invalid regex: {}", message));
                }
            }
            Self::Compare { domain, value, .. } => {
                if !domain.accepts(value) {
                    status.argument_error(
                        "value",
                        format!("'{}' is not a valid {}", value, domain.name()),
                    );
                }
            }
        }
        status.reparent(&self.title())
    }

    /// Arguments for display
    pub fn arguments(&self) -> Vec<Argument<'_>> {
        match self {
            Self::Unset | Self::IsEmpty | Self::IsInteger | Self::IsDecimal => Vec::new(),
            Self::And { conditions } | Self::Or { conditions } => {
                vec![Argument::new("conditions", ArgumentValue::Conditions(conditions))]
            }
            Self::Not { condition } => {
                vec![Argument::new("condition", ArgumentValue::Condition(condition))]
            }
            Self::Text {
                text,
                case_sensitive,
                ..
            } => vec![
                Argument::new("text", ArgumentValue::Text(text)),
                Argument::new("case_sensitive", ArgumentValue::Boolean(*case_sensitive)),
            ],
            Self::Regex {
                pattern,
                case_sensitive,
            } => vec![
                Argument::new("pattern", ArgumentValue::Text(pattern)),
                Argument::new("case_sensitive", ArgumentValue::Boolean(*case_sensitive)),
            ],
            Self::Compare { value, .. } => vec![Argument::new("value", ArgumentValue::Text(value))],
        }
    }

    /// Arguments for editing
    pub fn arguments_mut(&mut self) -> Vec<ArgumentSlot<'_>> {
        match self {
            Self::Unset | Self::IsEmpty | Self::IsInteger | Self::IsDecimal => Vec::new(),
            Self::And { conditions } | Self::Or { conditions } => {
                vec![ArgumentSlot::new("conditions", ArgumentMut::Conditions(conditions))]
            }
            Self::Not { condition } => {
                vec![ArgumentSlot::new("condition", ArgumentMut::Condition(condition))]
            }
            Self::Text {
                text,
                case_sensitive,
                ..
            } => vec![
                ArgumentSlot::new("text", ArgumentMut::Text(text)),
                ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(case_sensitive)),
            ],
            Self::Regex {
                pattern,
                case_sensitive,
            } => vec![
                ArgumentSlot::new("pattern", ArgumentMut::Text(pattern)),
                ArgumentSlot::new("case_sensitive", ArgumentMut::Boolean(case_sensitive)),
            ],
            Self::Compare { value, .. } => {
                vec![ArgumentSlot::new("value", ArgumentMut::Text(value))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_unset_always_errors() {
        let condition = ValueCondition::Unset;
        assert_eq!(condition.match_value("anything"), MatchResult::Error);
        let status = condition.verify_arguments();
        assert!(!status.is_success());
        assert_eq!(status.errors[0].target, "Unset");
    }

    #[rstest]
    #[case("", true)]
    #[case(" ", false)]
    #[case("x", false)]
    fn test_is_empty(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(
            ValueCondition::IsEmpty.match_value(value).is_matched(),
            expected
        );
    }

    #[rstest]
    #[case("42", true, true)]
    #[case("-7", true, true)]
    #[case("4.5", false, true)]
    #[case("1e3", false, true)]
    #[case("abc", false, false)]
    #[case("9223372036854775808", false, true)]
    fn test_numeric_predicates(#[case] value: &str, #[case] integer: bool, #[case] decimal: bool) {
        assert_eq!(ValueCondition::IsInteger.match_value(value).is_matched(), integer);
        assert_eq!(ValueCondition::IsDecimal.match_value(value).is_matched(), decimal);
    }

    #[rstest]
    #[case(TextMatchMode::Exact, "Hello", "Hello", true)]
    #[case(TextMatchMode::Exact, "Hello", "hello", false)]
    #[case(TextMatchMode::Contains, "Hello World", "o W", true)]
    #[case(TextMatchMode::StartsWith, "Hello", "He", true)]
    #[case(TextMatchMode::EndsWith, "Hello", "He", false)]
    fn test_text_case_sensitive(
        #[case] mode: TextMatchMode,
        #[case] value: &str,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        let condition = ValueCondition::text(mode, text, true);
        assert_eq!(condition.match_value(value).is_matched(), expected);
    }

    #[test]
    fn test_text_case_insensitive() {
        let condition = ValueCondition::text(TextMatchMode::EndsWith, "WORLD", false);
        assert!(condition.match_value("hello world").is_matched());
    }

    #[test]
    fn test_empty_search_text_fails_validation() {
        let status = ValueCondition::text(TextMatchMode::Contains, "", true).verify_arguments();
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].argument.as_deref(), Some("text"));
    }

    #[test]
    fn test_regex_match() {
        let condition = ValueCondition::regex(r"^\d{3}-\d{4}$", true);
        assert!(condition.match_value("555-1234").is_matched());
        assert_eq!(condition.match_value("5551234"), MatchResult::NotMatched);

        let insensitive = ValueCondition::regex("^abc", false);
        assert!(insensitive.match_value("ABCdef").is_matched());
    }

    #[test]
    fn test_invalid_regex() {
        let condition = ValueCondition::regex("[invalid", true);
        assert_eq!(condition.match_value("x"), MatchResult::Error);
        let status = condition.verify_arguments();
        assert_eq!(status.errors[0].argument.as_deref(), Some("pattern"));
    }

    #[test]
    fn test_compare_unparsable_field_is_error() {
        let condition = ValueCondition::compare(NumericDomain::Integer, CompareOp::Greater, "10");
        assert!(condition.match_value("11").is_matched());
        assert_eq!(condition.match_value("9"), MatchResult::NotMatched);
        assert_eq!(condition.match_value("ten"), MatchResult::Error);
        assert_eq!(condition.match_value(""), MatchResult::Error);
    }

    #[test]
    fn test_compare_invalid_literal() {
        let condition = ValueCondition::compare(NumericDomain::Integer, CompareOp::Equal, "1.5");
        assert!(!condition.verify_arguments().is_success());
        assert_eq!(condition.match_value("1"), MatchResult::Error);

        let decimal = ValueCondition::compare(NumericDomain::Decimal, CompareOp::Equal, "1.5");
        assert!(decimal.verify_arguments().is_success());
        assert!(decimal.match_value("1.50").is_matched());
    }

    #[test]
    fn test_composites() {
        let digits = ValueCondition::IsInteger;
        let short = ValueCondition::regex("^.{1,2}$", true);
        let both = ValueCondition::and(vec![digits.clone(), short.clone()]);
        assert!(both.match_value("42").is_matched());
        assert!(!both.match_value("421").is_matched());

        let either = ValueCondition::or(vec![digits, short]);
        assert!(either.match_value("ab").is_matched());
        assert!(!either.match_value("abc").is_matched());

        let negated = ValueCondition::not(ValueCondition::IsEmpty);
        assert!(negated.match_value("x").is_matched());
        assert_eq!(
            ValueCondition::not(ValueCondition::Unset).match_value("x"),
            MatchResult::Error
        );
    }

    #[test]
    fn test_and_short_circuits_before_error() {
        let condition = ValueCondition::and(vec![ValueCondition::IsEmpty, ValueCondition::Unset]);
        assert_eq!(condition.match_value("x"), MatchResult::NotMatched);
        assert_eq!(condition.match_value(""), MatchResult::Error);
    }

    #[test]
    fn test_nested_validation_reparents() {
        let condition = ValueCondition::or(vec![
            ValueCondition::IsEmpty,
            ValueCondition::not(ValueCondition::text(TextMatchMode::Contains, "", true)),
        ]);
        let status = condition.verify_arguments();
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].target, "Or > Not > Contains");
    }

    #[test]
    fn test_empty_composite_fails_validation() {
        assert!(!ValueCondition::and(vec![]).verify_arguments().is_success());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = ValueCondition::not(ValueCondition::text(TextMatchMode::Exact, "a", true));
        let mut copy = original.clone();
        if let ValueCondition::Not { condition } = &mut copy {
            for slot in condition.arguments_mut() {
                if let ArgumentMut::Text(text) = slot.value {
                    text.push('b');
                }
            }
        }
        assert_ne!(original, copy);
        assert!(!original.match_value("a").is_matched());
        assert!(copy.match_value("a").is_matched());
    }

    #[test]
    fn test_serde_round_trip() {
        let condition = ValueCondition::and(vec![
            ValueCondition::compare(NumericDomain::Decimal, CompareOp::GreaterOrEqual, "2.5"),
            ValueCondition::text(TextMatchMode::StartsWith, "a", false),
        ]);
        let json = serde_json::to_string(&condition).unwrap();
        assert!(json.contains("\"type\":\"and\""));
        let back: ValueCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, condition);
    }

    #[test]
    fn test_arguments_listing() {
        let condition = ValueCondition::regex("x", false);
        let names: Vec<&str> = condition.arguments().iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["pattern", "case_sensitive"]);
    }
}
