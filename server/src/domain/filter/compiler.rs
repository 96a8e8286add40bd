//! Filter compiler
//!
//! Translates validated [`ListArguments`] into a [`CompiledPredicate`]: an
//! ordered conjunction of atomic conditions, one or more per supplied field.
//! Input is assumed well-typed (see [`super::parser`]); nothing is re-validated.

use super::capability::ComparisonMode;
use super::value::{ComparisonBounds, EqualsValue, FilterValue, ListArguments, SuppliedFilterValue};
use crate::domain::schema::RecordKind;
use crate::utils::sql::escape_like_pattern;

/// Positional parameters collected while rendering SQL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    pub values: Vec<FilterValue>,
}

impl SqlParams {
    pub fn push(&mut self, value: FilterValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One atomic condition binding a column to a literal
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq {
        column: String,
        value: FilterValue,
    },
    In {
        column: String,
        values: Vec<FilterValue>,
    },
    Compare {
        column: String,
        mode: ComparisonMode,
        value: FilterValue,
    },
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::In { column, .. } | Self::Compare { column, .. } => {
                column
            }
        }
    }

    /// Render the condition with `?` placeholders, appending its values to `params`
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Self::Eq { column, value } => {
                params.push(value.clone());
                format!("{} = ?", column)
            }
            Self::In { column, values } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let placeholders = vec!["?"; values.len()].join(", ");
                params.values.extend(values.iter().cloned());
                format!("{} IN ({})", column, placeholders)
            }
            Self::Compare {
                column,
                mode,
                value,
            } => {
                let op = match mode {
                    ComparisonMode::Lt => "<",
                    ComparisonMode::Gt => ">",
                    ComparisonMode::Lte => "<=",
                    ComparisonMode::Gte => ">=",
                    ComparisonMode::Like => {
                        let escaped = escape_like_pattern(&value.to_string());
                        params.push(FilterValue::Text(format!("%{}%", escaped)));
                        return format!("LOWER({}) LIKE LOWER(?) ESCAPE '\\'", column);
                    }
                };
                params.push(value.clone());
                format!("{} {} ?", column, op)
            }
        }
    }
}

/// Ordered conjunction of conditions for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledPredicate {
    conditions: Vec<Condition>,
}

impl CompiledPredicate {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render as `c1 AND c2 ...`, or `None` when there is nothing to filter on
    pub fn to_sql(&self, params: &mut SqlParams) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(|c| c.to_sql(params))
            .collect();
        Some(clauses.join(" AND "))
    }
}

/// Compile the supplied arguments of a list operation.
///
/// Fields are walked in declaration order; per field the first matching rule
/// wins: absent adds nothing, a list becomes `IN`, a comparison branch goes
/// through [`compile_comparison`], anything else is plain equality.
pub fn compile(kind: &RecordKind, args: &ListArguments) -> CompiledPredicate {
    let mut conditions = Vec::new();

    for (field, _capability) in kind.filterable() {
        let column = field.name.as_str();
        match args.get(column) {
            SuppliedFilterValue::Absent => {}
            SuppliedFilterValue::ListOf(values) => conditions.push(Condition::In {
                column: column.to_string(),
                values: values.clone(),
            }),
            SuppliedFilterValue::Comparison { equals, bounds } => {
                compile_comparison(column, equals.as_ref(), bounds.as_ref(), &mut conditions)
            }
            SuppliedFilterValue::Scalar(value) => conditions.push(Condition::Eq {
                column: column.to_string(),
                value: value.clone(),
            }),
        }
    }

    tracing::trace!(
        kind = %kind.name(),
        conditions = conditions.len(),
        "Compiled filter predicate"
    );
    CompiledPredicate { conditions }
}

/// `equals` short-circuits every bound on the same field
fn compile_comparison(
    column: &str,
    equals: Option<&EqualsValue>,
    bounds: Option<&ComparisonBounds>,
    out: &mut Vec<Condition>,
) {
    if let Some(equals) = equals {
        out.push(match equals {
            EqualsValue::Scalar(value) => Condition::Eq {
                column: column.to_string(),
                value: value.clone(),
            },
            EqualsValue::ListOf(values) => Condition::In {
                column: column.to_string(),
                values: values.clone(),
            },
        });
        return;
    }

    let Some(bounds) = bounds else {
        return;
    };

    for mode in ComparisonMode::ALL {
        if let Some(value) = bounds.get(mode) {
            out.push(Condition::Compare {
                column: column.to_string(),
                mode,
                value: value.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::person;

    fn age_comparison(equals: Option<i64>, gt: Option<i64>, gte: Option<i64>) -> SuppliedFilterValue {
        let mut bounds = ComparisonBounds::default();
        if let Some(v) = gt {
            bounds.set(ComparisonMode::Gt, FilterValue::Int(v));
        }
        if let Some(v) = gte {
            bounds.set(ComparisonMode::Gte, FilterValue::Int(v));
        }
        SuppliedFilterValue::Comparison {
            equals: equals.map(|v| EqualsValue::Scalar(FilterValue::Int(v))),
            bounds: Some(bounds),
        }
    }

    #[test]
    fn test_no_arguments_is_empty() {
        let kind = person().unwrap();
        let predicate = compile(&kind, &ListArguments::new());
        assert!(predicate.is_empty());
        assert_eq!(predicate.to_sql(&mut SqlParams::default()), None);
    }

    #[test]
    fn test_scalar_is_equality() {
        let kind = person().unwrap();
        let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let args = ListArguments::new().with("created_at", SuppliedFilterValue::Scalar(FilterValue::Date(day)));
        let predicate = compile(&kind, &args);
        assert_eq!(
            predicate.conditions(),
            &[Condition::Eq {
                column: "created_at".to_string(),
                value: FilterValue::Date(day),
            }]
        );
    }

    #[test]
    fn test_list_is_single_in_condition() {
        let kind = person().unwrap();
        let args = ListArguments::new().with(
            "id",
            SuppliedFilterValue::ListOf(vec![
                FilterValue::Int(1),
                FilterValue::Int(2),
                FilterValue::Int(3),
            ]),
        );
        let predicate = compile(&kind, &args);
        assert_eq!(predicate.len(), 1);

        let mut params = SqlParams::default();
        assert_eq!(
            predicate.to_sql(&mut params).as_deref(),
            Some("id IN (?, ?, ?)")
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let kind = person().unwrap();
        let args = ListArguments::new().with("id", SuppliedFilterValue::ListOf(vec![]));
        let mut params = SqlParams::default();
        let sql = compile(&kind, &args).to_sql(&mut params);
        assert_eq!(sql.as_deref(), Some("1=0"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_equals_takes_precedence_over_bounds() {
        let kind = person().unwrap();
        let args = ListArguments::new().with("age", age_comparison(Some(5), Some(1), None));
        let predicate = compile(&kind, &args);
        assert_eq!(
            predicate.conditions(),
            &[Condition::Eq {
                column: "age".to_string(),
                value: FilterValue::Int(5),
            }]
        );
    }

    #[test]
    fn test_empty_comparison_adds_nothing() {
        let kind = person().unwrap();
        let args = ListArguments::new().with("age", age_comparison(None, None, None));
        assert!(compile(&kind, &args).is_empty());

        let args = ListArguments::new().with(
            "age",
            SuppliedFilterValue::Comparison {
                equals: None,
                bounds: None,
            },
        );
        assert!(compile(&kind, &args).is_empty());
    }

    #[test]
    fn test_bounds_in_document_order() {
        let kind = person().unwrap();
        let args = ListArguments::new().with("age", age_comparison(None, Some(1), Some(15)));
        let mut params = SqlParams::default();
        let sql = compile(&kind, &args).to_sql(&mut params);
        assert_eq!(sql.as_deref(), Some("age > ? AND age >= ?"));
        assert_eq!(params.values, vec![FilterValue::Int(1), FilterValue::Int(15)]);
    }

    #[test]
    fn test_like_is_case_insensitive_and_escaped() {
        let kind = person().unwrap();
        let mut bounds = ComparisonBounds::default();
        bounds.set(ComparisonMode::Like, FilterValue::Text("50%_off".into()));
        let args = ListArguments::new().with(
            "name",
            SuppliedFilterValue::Comparison {
                equals: None,
                bounds: Some(bounds),
            },
        );
        let mut params = SqlParams::default();
        let sql = compile(&kind, &args).to_sql(&mut params);
        assert_eq!(
            sql.as_deref(),
            Some("LOWER(name) LIKE LOWER(?) ESCAPE '\\'")
        );
        assert_eq!(
            params.values,
            vec![FilterValue::Text("%50\\%\\_off%".to_string())]
        );
    }

    #[test]
    fn test_multi_field_conjunction_in_declaration_order() {
        let kind = person().unwrap();
        // inserted out of declaration order on purpose
        let args = ListArguments::new()
            .with("age", age_comparison(Some(20), None, None))
            .with(
                "id",
                SuppliedFilterValue::ListOf(vec![FilterValue::Int(2), FilterValue::Int(3)]),
            );
        let mut params = SqlParams::default();
        let sql = compile(&kind, &args).to_sql(&mut params);
        assert_eq!(sql.as_deref(), Some("id IN (?, ?) AND age = ?"));
        assert_eq!(
            params.values,
            vec![FilterValue::Int(2), FilterValue::Int(3), FilterValue::Int(20)]
        );
    }

    #[test]
    fn test_non_filterable_field_ignored() {
        let kind = person().unwrap();
        let args = ListArguments::new().with(
            "email_address",
            SuppliedFilterValue::Scalar(FilterValue::Text("x@example.com".into())),
        );
        assert!(compile(&kind, &args).is_empty());
    }
}
