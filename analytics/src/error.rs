//! Error types for the movie ROI analysis pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - Reading and decoding the input file
//! - [`InputError`] - Malformed input data (the "invalid input" kind)
//! - [`ConfigError`] - Analysis options from file or environment
//! - [`PipelineError`] - Top-level orchestration errors (including polars
//!   frame errors)
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Zero-budget aggregate groups and empty rankings are not errors: they
//! simply produce no rows.

use polars::prelude::PolarsError;
use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading the dataset file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Delimiter must be a single-byte ASCII character.
    #[error("Unsupported delimiter: {0:?}")]
    InvalidDelimiter(char),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Invalid Input Errors
// =============================================================================

/// Malformed or missing input data.
#[derive(Debug, Error)]
pub enum InputError {
    /// A required dataset column is absent.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell could not be interpreted.
    #[error("Line {line}, column '{column}' (value '{value}'): {message}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
        message: String,
    },

    /// Budget passed to the categorizer is negative or not finite.
    #[error("Invalid budget: {0} (must be a finite, non-negative number)")]
    InvalidBudget(f64),

    /// A column name does not exist in the table.
    #[error("Unknown column '{column}' (available: {})", available.join(", "))]
    UnknownColumn { column: String, available: Vec<String> },

    /// A column holds values that cannot be used as a group key.
    #[error("Column '{0}' cannot be used as a group key")]
    NotGroupable(String),

    /// A metric column holds non-numeric values.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    /// Genre name not in the fixed genre list.
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading analysis options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the options file.
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    /// Options file is not valid JSON.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A setting has an unusable value.
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Broad classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset or a query is malformed.
    InvalidInput,
    /// Reading or writing files failed.
    Io,
    /// Options could not be loaded.
    Config,
}

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::analyze_file`].
/// It wraps all lower-level errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Invalid input data or query.
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Output serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// DataFrame construction, query or serialization error.
    #[error("Frame error: {0}")]
    Frame(#[from] PolarsError),
}

impl PipelineError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Csv(CsvError::IoError(_)) | PipelineError::Io(_) => ErrorKind::Io,
            PipelineError::Csv(_) | PipelineError::Input(_) | PipelineError::Frame(_) => ErrorKind::InvalidInput,
            PipelineError::Config(_) => ErrorKind::Config,
            PipelineError::Json(_) => ErrorKind::Io,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Csv(CsvError::ParseError(err))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for input validation and table operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
