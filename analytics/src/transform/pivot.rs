//! Genre-by-year chart table.
//!
//! Turns the (genre, year) aggregate into one row per year with a
//! `number_movies:<genre>` and a `ROI:<genre>` series column per genre,
//! ready for a plotting tool that takes a year-indexed table with several
//! numeric series. Drawing the chart is left to that tool.

use polars::prelude::*;

use crate::error::PipelineResult;
use crate::models::{columns, Genre};
use super::aggregate::genre_year;

/// Name of the series column holding `metric` for `genre`.
pub fn series_column(metric: &str, genre: Genre) -> String {
    format!("{}:{}", metric, genre.column())
}

/// Genres present in an aggregate, in dataset column order.
fn genres_with_data(aggregates: &DataFrame) -> PipelineResult<Vec<Genre>> {
    let mut seen = [false; Genre::COUNT];
    for name in aggregates.column(columns::GENRE)?.str()?.into_iter().flatten() {
        let genre: Genre = name.parse()?;
        seen[genre.index()] = true;
    }
    Ok(Genre::ALL.into_iter().filter(|g| seen[g.index()]).collect())
}

/// Year-indexed table of movie counts and ROI per genre, from `year_from` on.
///
/// `genres` selects and orders the series (empty = every genre with data,
/// in column order). Years with no data for any selected genre are absent;
/// a genre without data in a present year is null there.
pub fn genre_year_pivot(facts: &DataFrame, genres: &[Genre], year_from: i64) -> PipelineResult<DataFrame> {
    let aggregates = genre_year(facts, genres)?
        .lazy()
        .filter(col(columns::TITLE_YEAR).gt_eq(lit(year_from)))
        .collect()?;

    let selected = if genres.is_empty() {
        genres_with_data(&aggregates)?
    } else {
        genres.to_vec()
    };

    let mut series = Vec::with_capacity(2 * selected.len());
    for metric in [columns::NUMBER_MOVIES, columns::ROI] {
        series.extend(selected.iter().map(|genre| {
            col(metric)
                .filter(col(columns::GENRE).eq(lit(genre.column())))
                .first()
                .alias(series_column(metric, *genre))
        }));
    }

    let pivot = aggregates
        .lazy()
        .group_by([col(columns::TITLE_YEAR)])
        .agg(series)
        .sort_by_exprs([col(columns::TITLE_YEAR)], SortMultipleOptions::default())
        .collect()?;
    Ok(pivot)
}
