//! RecordQL server
//!
//! Typed, filterable record queries over an embedded SQLite store.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
