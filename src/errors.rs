//! # Corpus Error Types Module
//!
//! This module defines the error type used throughout the corpus pipeline.
//! Only fatal conditions are represented here: malformed fields and outlier
//! records are excluded locally by the normalizer and never surface as errors.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while building or reading a recipe corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A local source could not be opened or read
    #[error("failed to read source {location}: {source}")]
    SourceIo {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A remote source could not be fetched
    #[error("failed to fetch remote source {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// A columnar file is corrupt or unreadable
    #[error("failed to decode columnar data in {location}: {source}")]
    Parquet {
        location: String,
        #[source]
        source: parquet::errors::ParquetError,
    },

    /// A row-oriented file is malformed
    #[error("failed to decode row data in {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    /// Column conversion or record batch assembly failed
    #[error("columnar conversion failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A required column is absent from a source
    #[error("source {location} is missing required column `{column}`")]
    MissingColumn { location: String, column: String },

    /// A column exists but cannot be read as the expected type
    #[error("column `{column}` in {location} has unsupported type {data_type}")]
    ColumnType {
        location: String,
        column: String,
        data_type: String,
    },

    /// A required cell is null or out of range
    #[error("column `{column}` in {location} has a missing or invalid value at row {row}")]
    InvalidValue {
        location: String,
        column: String,
        row: usize,
    },

    /// No recipe survived the fingerprint join
    #[error(
        "no recipes matched between {nutrition} nutrition and {measurements} measurement records"
    )]
    EmptyJoin { nutrition: usize, measurements: usize },

    /// A classifier pattern failed to compile
    #[error("invalid classifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration is incomplete or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// The corpus could not be persisted
    #[error("failed to write corpus to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus file could not be encoded
    #[error("failed to encode corpus {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, CorpusError>;

impl CorpusError {
    /// Whether the error comes from an unavailable or unreadable input source
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            CorpusError::SourceIo { .. }
                | CorpusError::Fetch { .. }
                | CorpusError::Parquet { .. }
                | CorpusError::Csv { .. }
                | CorpusError::MissingColumn { .. }
                | CorpusError::ColumnType { .. }
                | CorpusError::InvalidValue { .. }
        )
    }
}
