//! Domain logic for filtered record queries
//!
//! - `filter` - filter capabilities, input shapes and the predicate compiler
//! - `schema` - record-kind declarations and the schema registry
//! - `models` - built-in record kinds

pub mod filter;
pub mod models;
pub mod schema;

pub use filter::{CompiledPredicate, FilterCapability, FilterError, SelectQuery};
pub use models::default_registry;
pub use schema::{RecordKind, SchemaError, SchemaRegistry};
