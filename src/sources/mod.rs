//! # Source Loaders Module
//!
//! One loader per raw dataset. Both accept a local path or an `http(s)` URI
//! and fail fast when a source cannot be opened or parsed; per-record problems
//! are handled by dropping the record.
//!
//! ## Features
//!
//! - Columnar nutrition source with native or string-encoded list columns
//! - Row-oriented measurements source with an optional title pre-filter
//! - Remote sources fetched fully into memory before decoding

pub mod location;
pub mod measurements;
pub mod nutrition;

pub use location::{SourceData, SourceLocation};
pub use measurements::{load_measurements, load_measurements_matching, MEASUREMENT_COLUMNS};
pub use nutrition::{load_nutrition, load_nutrition_with, NUTRITION_COLUMNS};
