//! Schema-driven filter compiler
//!
//! - `capability` - per-field filter descriptor
//! - `shape` - accepted input shape derived from a capability
//! - `parser` - validates raw JSON arguments into supplied values
//! - `compiler` - turns supplied values into a SQL predicate
//! - `query` - select statements over one record kind

mod capability;
mod compiler;
mod error;
mod parser;
mod query;
mod shape;
mod value;

pub use capability::{ComparisonMode, FilterCapability};
pub use compiler::{CompiledPredicate, Condition, SqlParams, compile};
pub use error::FilterError;
pub use parser::{MAX_FILTER_JSON_SIZE, MAX_LIST_VALUES, parse_arguments, parse_arguments_json};
pub use query::SelectQuery;
pub use shape::{
    ComparisonField, ComparisonInputType, InputShape, ValueType, comparison_type_name,
    derive_input_shape, filter_type_name,
};
pub use value::{
    ComparisonBounds, DATE_FORMAT, EqualsValue, FilterValue, ListArguments, SuppliedFilterValue,
};
