//! Filter argument parsing
//!
//! Validates raw JSON arguments against the derived input shapes and converts
//! them into [`SuppliedFilterValue`]s. This is the only place filter input is
//! type-checked; the compiler trusts what comes out of here.

use serde_json::{Map, Value};

use super::capability::ComparisonMode;
use super::error::FilterError;
use super::shape::{InputShape, ValueType};
use super::value::{ComparisonBounds, EqualsValue, FilterValue, ListArguments, SuppliedFilterValue};
use crate::domain::schema::Parameter;

/// Maximum size of the argument JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of values accepted by a single list argument
pub const MAX_LIST_VALUES: usize = 1000;

const EQUALS_KEY: &str = "equals";
const COMPARISON_KEY: &str = "comparison";

/// Parse a raw request body into list arguments.
///
/// An empty body means "no filters".
pub fn parse_arguments_json(
    body: &[u8],
    parameters: &[Parameter],
) -> Result<ListArguments, FilterError> {
    if body.len() > MAX_FILTER_JSON_SIZE {
        return Err(FilterError::TooLarge {
            max: MAX_FILTER_JSON_SIZE,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return parse_arguments(&Value::Null, parameters);
    }

    let raw: Value =
        serde_json::from_slice(body).map_err(|e| FilterError::InvalidJson(e.to_string()))?;
    parse_arguments(&raw, parameters)
}

/// Validate a JSON object of arguments against an operation's parameters
pub fn parse_arguments(
    raw: &Value,
    parameters: &[Parameter],
) -> Result<ListArguments, FilterError> {
    let empty = Map::new();
    let object = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(FilterError::NotAnObject),
    };

    if let Some(unknown) = object
        .keys()
        .find(|key| !parameters.iter().any(|p| &p.name == *key))
    {
        return Err(FilterError::UnknownArgument(unknown.clone()));
    }

    let mut args = ListArguments::new();
    for param in parameters {
        let supplied = parse_argument(&param.name, &param.shape, object.get(&param.name))?;
        if supplied == SuppliedFilterValue::Absent && !param.shape.is_optional() {
            return Err(FilterError::MissingRequired(param.name.clone()));
        }
        args.insert(param.name.clone(), supplied);
    }

    tracing::trace!(supplied = args.len(), "Parsed filter arguments");
    Ok(args)
}

fn parse_argument(
    field: &str,
    shape: &InputShape,
    raw: Option<&Value>,
) -> Result<SuppliedFilterValue, FilterError> {
    let raw = match raw {
        None | Some(Value::Null) => return Ok(SuppliedFilterValue::Absent),
        Some(v) => v,
    };

    match shape {
        InputShape::Simple(value_type) => Ok(match parse_value(field, value_type, raw)? {
            EqualsValue::Scalar(v) => SuppliedFilterValue::Scalar(v),
            EqualsValue::ListOf(vs) => SuppliedFilterValue::ListOf(vs),
        }),
        InputShape::Comparison {
            name,
            equals,
            comparison,
            ..
        } => {
            let Value::Object(branches) = raw else {
                return Err(FilterError::TypeMismatch {
                    field: field.to_string(),
                    expected: name.clone(),
                });
            };

            if let Some(unknown) = branches
                .keys()
                .find(|k| *k != EQUALS_KEY && *k != COMPARISON_KEY)
            {
                return Err(FilterError::UnknownArgument(format!("{}.{}", field, unknown)));
            }

            let equals = match branches.get(EQUALS_KEY) {
                None | Some(Value::Null) => None,
                Some(v) => Some(parse_value(field, equals, v)?),
            };

            let bounds = match branches.get(COMPARISON_KEY) {
                None | Some(Value::Null) => None,
                Some(Value::Object(bounds_raw)) => {
                    let mut bounds = ComparisonBounds::default();
                    for (key, value) in bounds_raw {
                        let sub = ComparisonMode::parse(key)
                            .and_then(|mode| comparison.field(mode))
                            .ok_or_else(|| {
                                FilterError::UnknownArgument(format!(
                                    "{}.{}.{}",
                                    field, COMPARISON_KEY, key
                                ))
                            })?;
                        if value.is_null() {
                            continue;
                        }
                        let literal = FilterValue::from_json(sub.base_type, value)
                            .ok_or_else(|| FilterError::mismatch(field, sub.base_type, false))?;
                        bounds.set(sub.mode, literal);
                    }
                    Some(bounds)
                }
                Some(_) => {
                    return Err(FilterError::TypeMismatch {
                        field: field.to_string(),
                        expected: comparison.name.clone(),
                    });
                }
            };

            Ok(SuppliedFilterValue::Comparison { equals, bounds })
        }
    }
}

fn parse_value(field: &str, value_type: &ValueType, raw: &Value) -> Result<EqualsValue, FilterError> {
    let base_type = value_type.base_type;

    if !value_type.list {
        return FilterValue::from_json(base_type, raw)
            .map(EqualsValue::Scalar)
            .ok_or_else(|| FilterError::mismatch(field, base_type, false));
    }

    let Value::Array(items) = raw else {
        return Err(FilterError::mismatch(field, base_type, true));
    };
    if items.len() > MAX_LIST_VALUES {
        return Err(FilterError::TooManyValues {
            field: field.to_string(),
            max: MAX_LIST_VALUES,
        });
    }

    items
        .iter()
        .map(|item| {
            FilterValue::from_json(base_type, item)
                .ok_or_else(|| FilterError::mismatch(field, base_type, true))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(EqualsValue::ListOf)
}
