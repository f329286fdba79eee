//! Client-side filtering over records

use crate::error::ListsError;
use crate::record::{Record, column_text};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a filter compares a column against its value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Column contains the value
    #[default]
    Contains,
    /// Column equals the value
    Equals,
    /// Column differs from the value
    NotEquals,
    /// Column does not contain the value
    NotContains,
    /// Column is present and non-empty
    Exists,
    /// Column is missing or empty
    NotExists,
}

impl FilterOperator {
    /// Every operator
    pub const ALL: [Self; 6] = [
        Self::Contains,
        Self::Equals,
        Self::NotEquals,
        Self::NotContains,
        Self::Exists,
        Self::NotExists,
    ];

    /// Wire token
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::NotContains => "not_contains",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
        }
    }

    /// Whether the operator compares against a value
    #[must_use]
    pub const fn requires_value(self) -> bool {
        !matches!(self, Self::Exists | Self::NotExists)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ListsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| {
                ListsError::validation(format!(
                    "unknown filter operator '{s}'; expected one of contains, equals, not_equals, not_contains, exists, not_exists"
                ))
            })
    }
}

/// A single-column filter
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterPredicate {
    column_id: String,
    operator: FilterOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl FilterPredicate {
    /// Build a predicate
    ///
    /// # Errors
    ///
    /// Returns `ListsError::Validation` if the column id is empty or the
    /// operator needs a value and none was given
    pub fn new(
        column_id: impl Into<String>,
        operator: FilterOperator,
        value: Option<String>,
    ) -> Result<Self, ListsError> {
        let column_id = column_id.into();
        if column_id.trim().is_empty() {
            return Err(ListsError::validation("filter column_id must not be empty"));
        }
        if operator.requires_value() && value.is_none() {
            return Err(ListsError::validation(format!(
                "filter operator '{operator}' requires a filter_value"
            )));
        }

        Ok(Self {
            column_id,
            operator,
            value,
        })
    }

    /// Filtered column
    #[must_use]
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// Operator
    #[must_use]
    pub const fn operator(&self) -> FilterOperator {
        self.operator
    }

    /// Comparison value
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether `record` passes this predicate
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        matches(record, self)
    }
}

/// Evaluate `predicate` against `record`, case-insensitively
///
/// A missing column reads as the empty string.
#[must_use]
pub fn matches(record: &Record, predicate: &FilterPredicate) -> bool {
    let actual = column_text(record, &predicate.column_id).to_lowercase();
    let expected = predicate.value.as_deref().unwrap_or_default().to_lowercase();

    match predicate.operator {
        FilterOperator::Contains => actual.contains(&expected),
        FilterOperator::NotContains => !actual.contains(&expected),
        FilterOperator::Equals => actual == expected,
        FilterOperator::NotEquals => actual != expected,
        FilterOperator::Exists => !actual.is_empty(),
        FilterOperator::NotExists => actual.is_empty(),
    }
}

/// Keep the records that pass `predicate`, preserving order
#[must_use]
pub fn filter_records(records: Vec<Record>, predicate: &FilterPredicate) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| predicate.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }

    fn predicate(column: &str, op: FilterOperator, value: Option<&str>) -> FilterPredicate {
        FilterPredicate::new(column, op, value.map(str::to_string)).expect("valid predicate")
    }

    #[test]
    fn test_equals_is_case_insensitive() {
        let r = record(json!({"status": "done"}));
        assert!(matches(&r, &predicate("status", FilterOperator::Equals, Some("Done"))));
        assert!(!matches(&r, &predicate("status", FilterOperator::NotEquals, Some("DONE"))));
    }

    #[test]
    fn test_contains_substring() {
        let r = record(json!({"title": "Fix Login Bug"}));
        assert!(matches(&r, &predicate("title", FilterOperator::Contains, Some("login"))));
        assert!(matches(&r, &predicate("title", FilterOperator::NotContains, Some("signup"))));
        assert!(!matches(&r, &predicate("title", FilterOperator::NotContains, Some("BUG"))));
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let r = record(json!({"other": "x"}));
        assert!(!matches(&r, &predicate("status", FilterOperator::Contains, Some("x"))));
        assert!(matches(&r, &predicate("status", FilterOperator::NotContains, Some("x"))));
        assert!(matches(&r, &predicate("status", FilterOperator::Equals, Some(""))));
        assert!(matches(&r, &predicate("status", FilterOperator::NotExists, None)));
        assert!(!matches(&r, &predicate("status", FilterOperator::Exists, None)));
    }

    #[test]
    fn test_empty_string_does_not_exist() {
        let r = record(json!({"status": ""}));
        assert!(matches(&r, &predicate("status", FilterOperator::NotExists, None)));
    }

    #[test]
    fn test_value_required_for_comparisons() {
        for op in [
            FilterOperator::Contains,
            FilterOperator::Equals,
            FilterOperator::NotEquals,
            FilterOperator::NotContains,
        ] {
            assert!(matches!(
                FilterPredicate::new("Col1", op, None),
                Err(ListsError::Validation(_))
            ));
        }
        assert!(FilterPredicate::new("Col1", FilterOperator::Exists, None).is_ok());
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("NOT_EQUALS".parse::<FilterOperator>(), Ok(FilterOperator::NotEquals));
        assert!("starts_with".parse::<FilterOperator>().is_err());
        assert_eq!(FilterOperator::default(), FilterOperator::Contains);
    }

    #[test]
    fn test_filter_records_keeps_order() {
        let records = vec![
            record(json!({"id": "1", "p": "High"})),
            record(json!({"id": "2", "p": "Low"})),
            record(json!({"id": "3", "p": "high"})),
        ];
        let kept = filter_records(records, &predicate("p", FilterOperator::Equals, Some("high")));
        let ids: Vec<&str> = kept.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    proptest! {
        #[test]
        fn prop_exists_and_not_exists_are_complements(
            present in proptest::option::of(".{0,8}"),
            column in "[A-Za-z0-9]{1,6}",
        ) {
            let mut r = Record::new();
            if let Some(value) = present {
                r.insert(column.clone(), Value::String(value));
            }
            let exists = matches(&r, &predicate(&column, FilterOperator::Exists, None));
            let not_exists = matches(&r, &predicate(&column, FilterOperator::NotExists, None));
            prop_assert!(exists != not_exists);
        }

        #[test]
        fn prop_negated_operators_are_complements(
            actual in ".{0,10}",
            expected in ".{0,4}",
        ) {
            let mut r = Record::new();
            r.insert("c".to_string(), Value::String(actual));
            let eq = matches(&r, &predicate("c", FilterOperator::Equals, Some(&expected)));
            let ne = matches(&r, &predicate("c", FilterOperator::NotEquals, Some(&expected)));
            let has = matches(&r, &predicate("c", FilterOperator::Contains, Some(&expected)));
            let lacks = matches(&r, &predicate("c", FilterOperator::NotContains, Some(&expected)));
            prop_assert!(eq != ne);
            prop_assert!(has != lacks);
        }
    }
}
