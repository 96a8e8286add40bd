//! Request-scoped filter values
//!
//! These types are created per request by the boundary parser, consumed once
//! by the compiler and then dropped.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use super::capability::ComparisonMode;
use crate::domain::schema::BaseType;

/// Date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single typed literal
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl FilterValue {
    /// Convert a JSON scalar into a literal of the given base type.
    ///
    /// Returns `None` on a type mismatch. Ints are accepted for float fields.
    pub fn from_json(base_type: BaseType, value: &serde_json::Value) -> Option<Self> {
        match base_type {
            BaseType::Int => value.as_i64().map(Self::Int),
            BaseType::Float => value.as_f64().map(Self::Float),
            BaseType::Text => value.as_str().map(|s| Self::Text(s.to_string())),
            BaseType::Bool => value.as_bool().map(Self::Bool),
            BaseType::Date => value.as_str().and_then(|s| Self::parse_str(BaseType::Date, s)),
        }
    }

    /// Parse a literal from its textual form (path segments, CLI input)
    pub fn parse_str(base_type: BaseType, s: &str) -> Option<Self> {
        match base_type {
            BaseType::Int => s.parse().ok().map(Self::Int),
            BaseType::Float => s.parse().ok().map(Self::Float),
            BaseType::Text => Some(Self::Text(s.to_string())),
            BaseType::Bool => s.parse().ok().map(Self::Bool),
            BaseType::Date => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(Self::Date),
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            Self::Int(_) => BaseType::Int,
            Self::Float(_) => BaseType::Float,
            Self::Text(_) => BaseType::Text,
            Self::Bool(_) => BaseType::Bool,
            Self::Date(_) => BaseType::Date,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
        }
    }
}

/// The `equals` branch of a comparison input
#[derive(Debug, Clone, PartialEq)]
pub enum EqualsValue {
    Scalar(FilterValue),
    ListOf(Vec<FilterValue>),
}

/// Bounds supplied in the `comparison` branch, one slot per mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonBounds {
    pub lt: Option<FilterValue>,
    pub gt: Option<FilterValue>,
    pub lte: Option<FilterValue>,
    pub gte: Option<FilterValue>,
    pub like: Option<FilterValue>,
}

impl ComparisonBounds {
    pub fn get(&self, mode: ComparisonMode) -> Option<&FilterValue> {
        match mode {
            ComparisonMode::Lt => self.lt.as_ref(),
            ComparisonMode::Gt => self.gt.as_ref(),
            ComparisonMode::Lte => self.lte.as_ref(),
            ComparisonMode::Gte => self.gte.as_ref(),
            ComparisonMode::Like => self.like.as_ref(),
        }
    }

    pub fn set(&mut self, mode: ComparisonMode, value: FilterValue) {
        let slot = match mode {
            ComparisonMode::Lt => &mut self.lt,
            ComparisonMode::Gt => &mut self.gt,
            ComparisonMode::Lte => &mut self.lte,
            ComparisonMode::Gte => &mut self.gte,
            ComparisonMode::Like => &mut self.like,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        ComparisonMode::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// What a caller supplied for one filterable field
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SuppliedFilterValue {
    #[default]
    Absent,
    Scalar(FilterValue),
    ListOf(Vec<FilterValue>),
    Comparison {
        equals: Option<EqualsValue>,
        bounds: Option<ComparisonBounds>,
    },
}

/// Arguments of one list-operation call, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListArguments {
    values: HashMap<String, SuppliedFilterValue>,
}

impl ListArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for typed callers and tests
    pub fn with(mut self, field: impl Into<String>, value: SuppliedFilterValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: SuppliedFilterValue) {
        self.values.insert(field.into(), value);
    }

    /// Supplied value for a field; missing entries read as `Absent`
    pub fn get(&self, field: &str) -> &SuppliedFilterValue {
        const ABSENT: &SuppliedFilterValue = &SuppliedFilterValue::Absent;
        self.values.get(field).unwrap_or(ABSENT)
    }

    pub fn len(&self) -> usize {
        self.values
            .values()
            .filter(|v| !matches!(v, SuppliedFilterValue::Absent))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_int() {
        assert_eq!(
            FilterValue::from_json(BaseType::Int, &json!(5)),
            Some(FilterValue::Int(5))
        );
        assert_eq!(FilterValue::from_json(BaseType::Int, &json!("5")), None);
        assert_eq!(FilterValue::from_json(BaseType::Int, &json!(1.5)), None);
    }

    #[test]
    fn test_from_json_float_accepts_int() {
        assert_eq!(
            FilterValue::from_json(BaseType::Float, &json!(3)),
            Some(FilterValue::Float(3.0))
        );
    }

    #[test]
    fn test_from_json_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            FilterValue::from_json(BaseType::Date, &json!("2024-02-29")),
            Some(FilterValue::Date(date))
        );
        assert_eq!(FilterValue::from_json(BaseType::Date, &json!("2023-02-29")), None);
        assert_eq!(FilterValue::from_json(BaseType::Date, &json!(20240229)), None);
    }

    #[test]
    fn test_parse_str() {
        assert_eq!(
            FilterValue::parse_str(BaseType::Int, "99"),
            Some(FilterValue::Int(99))
        );
        assert_eq!(FilterValue::parse_str(BaseType::Int, "abc"), None);
        assert_eq!(
            FilterValue::parse_str(BaseType::Bool, "true"),
            Some(FilterValue::Bool(true))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterValue::Int(7).to_string(), "7");
        assert_eq!(FilterValue::Text("abc".into()).to_string(), "abc");
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(FilterValue::Date(date).to_string(), "2024-01-05");
    }

    #[test]
    fn test_bounds_get_set() {
        let mut bounds = ComparisonBounds::default();
        assert!(bounds.is_empty());
        bounds.set(ComparisonMode::Gte, FilterValue::Int(15));
        assert!(!bounds.is_empty());
        assert_eq!(bounds.get(ComparisonMode::Gte), Some(&FilterValue::Int(15)));
        assert_eq!(bounds.get(ComparisonMode::Lt), None);
    }

    #[test]
    fn test_arguments_missing_reads_absent() {
        let args = ListArguments::new().with("age", SuppliedFilterValue::Scalar(FilterValue::Int(1)));
        assert_eq!(args.get("name"), &SuppliedFilterValue::Absent);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_arguments_absent_entries_not_counted() {
        let args = ListArguments::new().with("age", SuppliedFilterValue::Absent);
        assert!(args.is_empty());
    }
}
