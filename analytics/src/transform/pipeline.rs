//! High-level pipeline API: every derived view in one call.
//!
//! Views are computed in dependency order: entities, then fact tables,
//! then aggregates, then the chart pivot.
//!
//! # Example
//!
//! ```rust,ignore
//! use movieroi::{analyze_file, AnalysisOptions};
//! use std::path::Path;
//!
//! let report = analyze_file(Path::new("movies.csv"), &AnalysisOptions::default())?;
//! println!("{} actors with a computable ROI", report.actors_roi.height());
//! ```

use chrono::Utc;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::AnalysisOptions;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{columns, MovieRecord};
use crate::parser::{parse_movies_file, ParseResult};
use super::aggregate::{aggregate_with_dropped, genre_year_with_dropped, AggregateOutcome};
use super::entities::{actors_list, directors_list};
use super::frame::movies_frame;
use super::pivot::genre_year_pivot;
use super::reshape::{movies_by_actor, movies_by_director, movies_by_genre};

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl From<&ParseResult> for CsvInfo {
    fn from(parsed: &ParseResult) -> Self {
        Self {
            encoding: parsed.encoding.clone(),
            delimiter: parsed.delimiter,
            headers: parsed.headers.clone(),
            row_count: parsed.movies.len(),
        }
    }
}

/// Summary written next to the tables.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub movie_count: usize,
    /// Row count per table name
    pub row_counts: BTreeMap<String, usize>,
    /// Groups left out of each aggregate because their budget sums to zero
    pub dropped_zero_budget: BTreeMap<String, usize>,
    pub options: AnalysisOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_info: Option<CsvInfo>,
}

/// All derived tables of one run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub actors: DataFrame,
    pub directors: DataFrame,
    pub movies_by_actor: DataFrame,
    pub movies_by_director: DataFrame,
    pub movies_by_genre: DataFrame,
    pub actors_roi: DataFrame,
    pub directors_roi: DataFrame,
    pub genres_roi: DataFrame,
    pub genre_year: DataFrame,
    pub genre_year_pivot: DataFrame,
    pub metadata: ReportMetadata,
}

impl AnalysisReport {
    /// Every table with its file stem, in dependency order.
    pub fn tables(&self) -> [(&'static str, &DataFrame); 10] {
        [
            ("actors", &self.actors),
            ("directors", &self.directors),
            ("movies_by_actor", &self.movies_by_actor),
            ("movies_by_director", &self.movies_by_director),
            ("movies_by_genre", &self.movies_by_genre),
            ("actors_roi", &self.actors_roi),
            ("directors_roi", &self.directors_roi),
            ("genres_roi", &self.genres_roi),
            ("genre_year", &self.genre_year),
            ("genre_year_pivot", &self.genre_year_pivot),
        ]
    }
}

/// Record an aggregate's drops and unwrap its table.
fn take_aggregate(
    name: &str,
    outcome: AggregateOutcome,
    dropped_counts: &mut BTreeMap<String, usize>,
) -> DataFrame {
    let dropped = outcome.dropped.height();
    if dropped > 0 {
        log_warning(format!("{}: {} group(s) without ROI (zero total budget)", name, dropped));
    }
    log_info_indent(format!("{}: {} groups", name, outcome.table.height()), 1);
    dropped_counts.insert(name.to_string(), dropped);
    outcome.table
}

/// Compute every view from parsed movies.
pub fn analyze(movies: &[MovieRecord], options: &AnalysisOptions) -> PipelineResult<AnalysisReport> {
    log_info(format!("🎬 Analyzing {} movies", movies.len()));
    let frame = movies_frame(movies)?;

    // Step 1: entities
    let actors = actors_list(&frame)?;
    let directors = directors_list(&frame)?;
    log_success(format!("{} actors, {} directors", actors.height(), directors.height()));

    // Step 2: fact tables
    let by_actor = movies_by_actor(&frame, &actors)?;
    let by_director = movies_by_director(&frame, &directors)?;
    let by_genre = movies_by_genre(&frame)?;
    log_success(format!(
        "{} actor facts, {} director facts, {} genre facts",
        by_actor.height(),
        by_director.height(),
        by_genre.height()
    ));

    // Step 3: aggregates
    log_info("📊 Aggregating ROI...");
    let mut dropped = BTreeMap::new();
    let actors_roi = take_aggregate("actors_roi", aggregate_with_dropped(&by_actor, &[columns::ACTOR])?, &mut dropped);
    let directors_roi = take_aggregate(
        "directors_roi",
        aggregate_with_dropped(&by_director, &[columns::DIRECTOR_NAME])?,
        &mut dropped,
    );
    let genres_roi = take_aggregate("genres_roi", aggregate_with_dropped(&by_genre, &[columns::GENRE])?, &mut dropped);
    let genre_year = take_aggregate(
        "genre_year",
        genre_year_with_dropped(&by_genre, &options.genres)?,
        &mut dropped,
    );

    // Step 4: chart table
    let pivot = genre_year_pivot(&by_genre, &options.genres, options.year_from)?;
    log_success(format!("Genre/year pivot: {} years from {}", pivot.height(), options.year_from));

    let mut report = AnalysisReport {
        actors,
        directors,
        movies_by_actor: by_actor,
        movies_by_director: by_director,
        movies_by_genre: by_genre,
        actors_roi,
        directors_roi,
        genres_roi,
        genre_year,
        genre_year_pivot: pivot,
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            movie_count: movies.len(),
            row_counts: BTreeMap::new(),
            dropped_zero_budget: dropped,
            options: options.clone(),
            csv_info: None,
        },
    };
    report.metadata.row_counts = report
        .tables()
        .iter()
        .map(|(name, table)| (name.to_string(), table.height()))
        .collect();
    Ok(report)
}

/// Parse a movie CSV file and compute every view.
pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> PipelineResult<AnalysisReport> {
    log_info(format!("📖 Reading {}", path.display()));
    let parsed = parse_movies_file(path)?;
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} movies", parsed.movies.len()));

    let mut report = analyze(&parsed.movies, options)?;
    report.metadata.csv_info = Some(CsvInfo::from(&parsed));
    Ok(report)
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use crate::transform::frame::testing::int_at;

    fn movies() -> Vec<MovieRecord> {
        vec![
            MovieRecord::new("A", 1990, 100.0, 50.0)
                .with_actor(1, "X", 5.0)
                .with_director("D", 1.0)
                .with_genre(Genre::Drama),
            MovieRecord::new("B", 1991, 20.0, 30.0)
                .with_actor(1, "X", 5.0)
                .with_actor(2, "Y", 2.0)
                .with_genre(Genre::Drama)
                .with_genre(Genre::War),
            MovieRecord::new("C", 1991, 7.0, 0.0).with_actor(1, "Nobody", 0.0).with_genre(Genre::Short),
        ]
    }

    #[test]
    fn test_analyze_all_views() {
        let report = analyze(&movies(), &AnalysisOptions::default()).unwrap();

        assert_eq!(report.actors.height(), 3);
        assert_eq!(report.directors.height(), 1);
        assert_eq!(report.movies_by_actor.height(), 4);
        assert_eq!(report.movies_by_genre.height(), 4);
        // "Nobody" only appears in a zero-budget movie
        assert_eq!(report.actors_roi.height(), 2);
        assert_eq!(report.genres_roi.height(), 2);
        assert_eq!(report.metadata.dropped_zero_budget["actors_roi"], 1);
        assert_eq!(report.metadata.dropped_zero_budget["genres_roi"], 1);
        assert_eq!(report.metadata.dropped_zero_budget["directors_roi"], 0);
        assert_eq!(report.metadata.row_counts["movies_by_director"], 1);
        assert_eq!(report.metadata.movie_count, 3);
    }

    #[test]
    fn test_options_filter_genre_views() {
        let options = AnalysisOptions {
            genres: vec![Genre::War],
            year_from: 1991,
            ..AnalysisOptions::default()
        };
        let report = analyze(&movies(), &options).unwrap();

        assert_eq!(report.genre_year.height(), 1);
        assert_eq!(report.genre_year_pivot.height(), 1);
        assert_eq!(int_at(&report.genre_year_pivot, "title_year", 0), Some(1991));
        // per-genre totals are not filtered
        assert_eq!(report.genres_roi.height(), 2);
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "TAB");
        assert_eq!(format_delimiter(';'), ";");
    }
}
