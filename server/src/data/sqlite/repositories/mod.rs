//! SQLite repositories

pub mod records;

pub use records::{fetch_all, fetch_optional};
