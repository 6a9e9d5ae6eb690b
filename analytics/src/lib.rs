//! # movieroi - Movie financial analytics
//!
//! movieroi reshapes a wide movie table (one row per movie, three actor
//! slots, one director, one flag column per genre) into long per-actor,
//! per-director and per-genre views, and computes return on investment
//! for each of them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│   Output    │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (facts+ROI) │     │ (CSV/JSON)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use movieroi::{analyze_file, write_report, AnalysisOptions};
//! use std::path::Path;
//!
//! let options = AnalysisOptions::default();
//! let report = analyze_file(Path::new("movies.csv"), &options)?;
//! write_report(&report, Path::new("out"), options.format)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Console logging
//! - [`config`] - Analysis options (defaults, JSON file, environment)
//! - [`models`] - Movie records, genres and column names
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Reshaping, aggregation, ranking and pipeline on polars
//!   DataFrames
//! - [`output`] - Writing tables

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Configuration
pub mod config;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod output;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    CsvError,
    ErrorKind,
    InputError,
    PipelineError,
    PipelineResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    BudgetTier,
    EntityKind,
    EntitySlot,
    Genre,
    MovieRecord,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AnalysisOptions, OutputFormat};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_movies,
    parse_movies_bytes,
    parse_movies_file,
    parse_movies_str,
    ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    actors_list,
    actors_roi,
    aggregate,
    classify,
    directors_list,
    directors_roi,
    genre_year,
    genre_year_pivot,
    genres_roi,
    movies_by_actor,
    movies_by_director,
    movies_by_genre,
    movies_frame,
    roi_expr,
    top_movies_by_genre,
    top_n,
    unpivot,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    analyze,
    analyze_file,
    AnalysisReport,
    CsvInfo,
    ReportMetadata,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{write_report, write_table, write_table_to};
