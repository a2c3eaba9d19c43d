//! Static registries of every node type, for "add new" pickers
//!
//! Enum-valued parameters (match mode, numeric domain, operator, rounding
//! mode) are fixed per entry rather than exposed as arguments, so each
//! combination has its own entry.

use crate::condition::{RowCondition, TextMatchMode, ValueCondition};
use crate::conversion::{RoundMode, ValueConversion};
use crate::numeric::{ArithmeticOp, CompareOp, NumericDomain};
use crate::operation::*;

/// One creatable node type
pub struct CatalogEntry<T: 'static> {
    /// Stable identifier
    pub name: &'static str,
    /// Display title
    pub title: &'static str,
    /// Build a node with default arguments
    pub create: fn() -> T,
}

/// Look an entry up by name
pub fn find<T>(
    catalog: &'static [CatalogEntry<T>],
    name: &str,
) -> Option<&'static CatalogEntry<T>> {
    catalog.iter().find(|entry| entry.name == name)
}

pub static OPERATIONS: &[CatalogEntry<Operation>] = &[
    CatalogEntry {
        name: "head",
        title: "Head",
        create: || Operation::Head(Head::default()),
    },
    CatalogEntry {
        name: "tail",
        title: "Tail",
        create: || Operation::Tail(Tail::default()),
    },
    CatalogEntry {
        name: "skip_head",
        title: "Skip head",
        create: || Operation::SkipHead(SkipHead::default()),
    },
    CatalogEntry {
        name: "skip_tail",
        title: "Skip tail",
        create: || Operation::SkipTail(SkipTail::default()),
    },
    CatalogEntry {
        name: "select_rows",
        title: "Select rows",
        create: || Operation::SelectRows(SelectRows::default()),
    },
    CatalogEntry {
        name: "delete_row",
        title: "Delete row",
        create: || Operation::DeleteRow(DeleteRow::default()),
    },
    CatalogEntry {
        name: "filter_row",
        title: "Filter rows",
        create: || Operation::FilterRow(FilterRow::default()),
    },
    CatalogEntry {
        name: "select_column",
        title: "Select column",
        create: || Operation::SelectColumn(SelectColumn::default()),
    },
    CatalogEntry {
        name: "delete_column",
        title: "Delete column",
        create: || Operation::DeleteColumn(DeleteColumn::default()),
    },
    CatalogEntry {
        name: "generate_column",
        title: "Generate column",
        create: || Operation::GenerateColumn(GenerateColumn::default()),
    },
    CatalogEntry {
        name: "edit_column",
        title: "Edit column",
        create: || Operation::EditColumn(EditColumn::default()),
    },
    CatalogEntry {
        name: "replace",
        title: "Replace",
        create: || Operation::Replace(Replace::default()),
    },
    CatalogEntry {
        name: "sort",
        title: "Sort",
        create: || Operation::Sort(Sort::default()),
    },
    CatalogEntry {
        name: "distinct",
        title: "Distinct",
        create: || Operation::Distinct(Distinct::default()),
    },
    CatalogEntry {
        name: "append",
        title: "Append",
        create: || Operation::Append(Append::default()),
    },
    CatalogEntry {
        name: "prepend",
        title: "Prepend",
        create: || Operation::Prepend(Prepend::default()),
    },
    CatalogEntry {
        name: "paste",
        title: "Paste",
        create: || Operation::Paste(Paste::default()),
    },
    CatalogEntry {
        name: "inner_join",
        title: "Inner join",
        create: || Operation::InnerJoin(Join::default()),
    },
    CatalogEntry {
        name: "left_outer_join",
        title: "Left outer join",
        create: || Operation::LeftOuterJoin(Join::default()),
    },
    CatalogEntry {
        name: "full_outer_join",
        title: "Full outer join",
        create: || Operation::FullOuterJoin(Join::default()),
    },
];

pub static VALUE_CONDITIONS: &[CatalogEntry<ValueCondition>] = &[
    CatalogEntry {
        name: "and",
        title: "And",
        create: || ValueCondition::and(vec![ValueCondition::Unset]),
    },
    CatalogEntry {
        name: "or",
        title: "Or",
        create: || ValueCondition::or(vec![ValueCondition::Unset]),
    },
    CatalogEntry {
        name: "not",
        title: "Not",
        create: || ValueCondition::not(ValueCondition::Unset),
    },
    CatalogEntry {
        name: "is_empty",
        title: "Is empty",
        create: || ValueCondition::IsEmpty,
    },
    CatalogEntry {
        name: "is_integer",
        title: "Is integer",
        create: || ValueCondition::IsInteger,
    },
    CatalogEntry {
        name: "is_decimal",
        title: "Is decimal",
        create: || ValueCondition::IsDecimal,
    },
    CatalogEntry {
        name: "equals",
        title: "Equals",
        create: || ValueCondition::text(TextMatchMode::Exact, "", true),
    },
    CatalogEntry {
        name: "contains",
        title: "Contains",
        create: || ValueCondition::text(TextMatchMode::Contains, "", true),
    },
    CatalogEntry {
        name: "starts_with",
        title: "Starts with",
        create: || ValueCondition::text(TextMatchMode::StartsWith, "", true),
    },
    CatalogEntry {
        name: "ends_with",
        title: "Ends with",
        create: || ValueCondition::text(TextMatchMode::EndsWith, "", true),
    },
    CatalogEntry {
        name: "regex",
        title: "Matches regex",
        create: || ValueCondition::regex("", true),
    },
    CatalogEntry {
        name: "integer_greater",
        title: "integer >",
        create: || ValueCondition::compare(NumericDomain::Integer, CompareOp::Greater, "0"),
    },
    CatalogEntry {
        name: "integer_less",
        title: "integer <",
        create: || ValueCondition::compare(NumericDomain::Integer, CompareOp::Less, "0"),
    },
    CatalogEntry {
        name: "integer_greater_or_equal",
        title: "integer >=",
        create: || ValueCondition::compare(NumericDomain::Integer, CompareOp::GreaterOrEqual, "0"),
    },
    CatalogEntry {
        name: "integer_less_or_equal",
        title: "integer <=",
        create: || ValueCondition::compare(NumericDomain::Integer, CompareOp::LessOrEqual, "0"),
    },
    CatalogEntry {
        name: "integer_equal",
        title: "integer ==",
        create: || ValueCondition::compare(NumericDomain::Integer, CompareOp::Equal, "0"),
    },
    CatalogEntry {
        name: "decimal_greater",
        title: "decimal >",
        create: || ValueCondition::compare(NumericDomain::Decimal, CompareOp::Greater, "0"),
    },
    CatalogEntry {
        name: "decimal_less",
        title: "decimal <",
        create: || ValueCondition::compare(NumericDomain::Decimal, CompareOp::Less, "0"),
    },
    CatalogEntry {
        name: "decimal_greater_or_equal",
        title: "decimal >=",
        create: || ValueCondition::compare(NumericDomain::Decimal, CompareOp::GreaterOrEqual, "0"),
    },
    CatalogEntry {
        name: "decimal_less_or_equal",
        title: "decimal <=",
        create: || ValueCondition::compare(NumericDomain::Decimal, CompareOp::LessOrEqual, "0"),
    },
    CatalogEntry {
        name: "decimal_equal",
        title: "decimal ==",
        create: || ValueCondition::compare(NumericDomain::Decimal, CompareOp::Equal, "0"),
    },
];

pub static ROW_CONDITIONS: &[CatalogEntry<RowCondition>] = &[
    CatalogEntry {
        name: "and",
        title: "And",
        create: || RowCondition::and(vec![RowCondition::Unset]),
    },
    CatalogEntry {
        name: "or",
        title: "Or",
        create: || RowCondition::or(vec![RowCondition::Unset]),
    },
    CatalogEntry {
        name: "not",
        title: "Not",
        create: || RowCondition::not(RowCondition::Unset),
    },
    CatalogEntry {
        name: "column",
        title: "Column",
        create: || RowCondition::column(0, ValueCondition::Unset),
    },
    CatalogEntry {
        name: "all_columns",
        title: "All columns",
        create: || RowCondition::all_columns(ValueCondition::Unset),
    },
    CatalogEntry {
        name: "any_column",
        title: "Any column",
        create: || RowCondition::any_column(ValueCondition::Unset),
    },
];

pub static CONVERSIONS: &[CatalogEntry<ValueConversion>] = &[
    CatalogEntry {
        name: "sequence",
        title: "Sequence",
        create: ValueConversion::default,
    },
    CatalogEntry {
        name: "prepend",
        title: "Prepend",
        create: || ValueConversion::Prepend {
            text: String::new(),
        },
    },
    CatalogEntry {
        name: "append",
        title: "Append",
        create: || ValueConversion::Append {
            text: String::new(),
        },
    },
    CatalogEntry {
        name: "insert",
        title: "Insert",
        create: || ValueConversion::Insert {
            position: 0,
            text: String::new(),
        },
    },
    CatalogEntry {
        name: "overwrite",
        title: "Overwrite",
        create: || ValueConversion::Overwrite {
            position: 0,
            text: String::new(),
        },
    },
    CatalogEntry {
        name: "substring",
        title: "Substring",
        create: || ValueConversion::Substring {
            start: 0,
            length: 1,
        },
    },
    CatalogEntry {
        name: "upper",
        title: "Upper case",
        create: || ValueConversion::Upper,
    },
    CatalogEntry {
        name: "lower",
        title: "Lower case",
        create: || ValueConversion::Lower,
    },
    CatalogEntry {
        name: "trim",
        title: "Trim",
        create: || ValueConversion::Trim,
    },
    CatalogEntry {
        name: "replace",
        title: "Replace",
        create: || ValueConversion::Replace {
            query: String::new(),
            replacer: String::new(),
            case_sensitive: true,
        },
    },
    CatalogEntry {
        name: "regex_extract",
        title: "Regex extract",
        create: || ValueConversion::RegexExtract {
            pattern: String::new(),
            case_sensitive: true,
        },
    },
    CatalogEntry {
        name: "integer_add",
        title: "integer +",
        create: || ValueConversion::arithmetic(NumericDomain::Integer, ArithmeticOp::Add, "0"),
    },
    CatalogEntry {
        name: "integer_subtract",
        title: "integer -",
        create: || ValueConversion::arithmetic(NumericDomain::Integer, ArithmeticOp::Subtract, "0"),
    },
    CatalogEntry {
        name: "integer_multiply",
        title: "integer *",
        create: || ValueConversion::arithmetic(NumericDomain::Integer, ArithmeticOp::Multiply, "1"),
    },
    CatalogEntry {
        name: "integer_divide",
        title: "integer /",
        create: || ValueConversion::arithmetic(NumericDomain::Integer, ArithmeticOp::Divide, "1"),
    },
    CatalogEntry {
        name: "integer_modulo",
        title: "integer %",
        create: || ValueConversion::arithmetic(NumericDomain::Integer, ArithmeticOp::Modulo, "1"),
    },
    CatalogEntry {
        name: "decimal_add",
        title: "decimal +",
        create: || ValueConversion::arithmetic(NumericDomain::Decimal, ArithmeticOp::Add, "0"),
    },
    CatalogEntry {
        name: "decimal_subtract",
        title: "decimal -",
        create: || ValueConversion::arithmetic(NumericDomain::Decimal, ArithmeticOp::Subtract, "0"),
    },
    CatalogEntry {
        name: "decimal_multiply",
        title: "decimal *",
        create: || ValueConversion::arithmetic(NumericDomain::Decimal, ArithmeticOp::Multiply, "1"),
    },
    CatalogEntry {
        name: "decimal_divide",
        title: "decimal /",
        create: || ValueConversion::arithmetic(NumericDomain::Decimal, ArithmeticOp::Divide, "1"),
    },
    CatalogEntry {
        name: "decimal_modulo",
        title: "decimal %",
        create: || ValueConversion::arithmetic(NumericDomain::Decimal, ArithmeticOp::Modulo, "1"),
    },
    CatalogEntry {
        name: "round",
        title: "Round",
        create: || ValueConversion::Round {
            mode: RoundMode::Round,
            digits: 0,
        },
    },
    CatalogEntry {
        name: "truncate",
        title: "Truncate",
        create: || ValueConversion::Round {
            mode: RoundMode::Truncate,
            digits: 0,
        },
    },
    CatalogEntry {
        name: "ceiling",
        title: "Ceiling",
        create: || ValueConversion::Round {
            mode: RoundMode::Ceiling,
            digits: 0,
        },
    },
    CatalogEntry {
        name: "condition_text",
        title: "Condition to text",
        create: || ValueConversion::condition_text(ValueCondition::Unset),
    },
    CatalogEntry {
        name: "branch",
        title: "If",
        create: || {
            ValueConversion::branch(
                ValueCondition::Unset,
                ValueConversion::default(),
                ValueConversion::default(),
            )
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn unique_names<T>(catalog: &[CatalogEntry<T>]) -> bool {
        let names: HashSet<&str> = catalog.iter().map(|e| e.name).collect();
        names.len() == catalog.len()
    }

    #[test]
    fn test_names_are_unique() {
        assert!(unique_names(OPERATIONS));
        assert!(unique_names(VALUE_CONDITIONS));
        assert!(unique_names(ROW_CONDITIONS));
        assert!(unique_names(CONVERSIONS));
    }

    #[test]
    fn test_titles_match_created_nodes() {
        for entry in OPERATIONS {
            assert_eq!((entry.create)().title(), entry.title);
        }
        for entry in VALUE_CONDITIONS {
            assert_eq!((entry.create)().title(), entry.title);
        }
        for entry in CONVERSIONS {
            assert_eq!((entry.create)().title(), entry.title);
        }
    }

    #[test]
    fn test_operation_names_match_serde_tags() {
        for entry in OPERATIONS {
            let json = serde_json::to_value((entry.create)()).unwrap();
            assert_eq!(json["type"], entry.name);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find(OPERATIONS, "sort").unwrap().title, "Sort");
        assert!(find(CONVERSIONS, "nope").is_none());
    }

    #[test]
    fn test_fresh_unset_nodes_fail_validation() {
        let filter = (find(OPERATIONS, "filter_row").unwrap().create)();
        assert!(!filter.verify_arguments().is_success());
        let branch = (find(CONVERSIONS, "branch").unwrap().create)();
        assert!(!branch.verify_arguments().is_success());
    }
}
