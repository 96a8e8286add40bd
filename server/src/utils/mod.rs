//! Shared utilities
//!
//! - `crypto` - hashing
//! - `file` - path expansion
//! - `sql` - SQL text helpers
//! - `string` - identifier case conversion

pub mod crypto;
pub mod file;
pub mod sql;
pub mod string;
