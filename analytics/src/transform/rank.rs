//! Top-N views over any table.

use polars::prelude::*;

use crate::error::{InputError, PipelineResult};
use crate::models::{columns, Genre};
use super::frame::{is_numeric, require_column};

/// Rows where `filter_key == filter_value` and `metric_column >= min_metric`,
/// sorted by the metric in descending order, at most `n` of them.
///
/// The key is compared as text, so `title_year = 2002` matches an integer
/// column. Rows with a null metric never qualify. Ties keep table order.
/// Unknown columns or a non-numeric metric column are errors; no match is
/// just an empty result.
pub fn top_n(
    table: &DataFrame,
    filter_key: &str,
    filter_value: &str,
    min_metric: f64,
    metric_column: &str,
    n: usize,
) -> PipelineResult<DataFrame> {
    require_column(table, filter_key)?;
    if !is_numeric(require_column(table, metric_column)?.dtype()) {
        return Err(InputError::NotNumeric(metric_column.to_string()).into());
    }
    let limit = IdxSize::try_from(n).unwrap_or(IdxSize::MAX);

    let top = table
        .clone()
        .lazy()
        .filter(
            col(filter_key)
                .cast(DataType::String)
                .eq(lit(filter_value))
                .and(col(metric_column).cast(DataType::Float64).gt_eq(lit(min_metric))),
        )
        .sort_by_exprs(
            [col(metric_column)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(limit)
        .collect()?;
    Ok(top)
}

/// The `n` best-ROI movies of `genre` with ROI at least `minimum_roi`.
pub fn top_movies_by_genre(facts: &DataFrame, genre: Genre, minimum_roi: f64, n: usize) -> PipelineResult<DataFrame> {
    top_n(facts, columns::GENRE, genre.column(), minimum_roi, columns::ROI, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::models::MovieRecord;
    use crate::transform::frame::movies_frame;
    use crate::transform::frame::testing::{float_at, texts};
    use crate::transform::reshape::movies_by_genre;

    fn facts() -> DataFrame {
        let mut unknown = MovieRecord::new("Unknown", 2002, 50.0, 10.0).with_genre(Genre::Horror);
        unknown.roi = None;
        let frame = movies_frame(&[
            MovieRecord::new("Low", 2000, 15.0, 10.0).with_genre(Genre::Horror),
            MovieRecord::new("High", 2000, 100.0, 10.0).with_genre(Genre::Horror),
            MovieRecord::new("Mid", 2001, 30.0, 10.0).with_genre(Genre::Horror).with_genre(Genre::Drama),
            MovieRecord::new("Flop", 2002, 1.0, 10.0).with_genre(Genre::Horror),
            MovieRecord::new("Other", 2002, 500.0, 10.0).with_genre(Genre::Drama),
            unknown,
        ])
        .unwrap();
        movies_by_genre(&frame).unwrap()
    }

    #[test]
    fn test_sorted_descending_and_filtered() {
        let top = top_movies_by_genre(&facts(), Genre::Horror, 0.0, 10).unwrap();

        assert_eq!(texts(&top, "movie_title"), vec!["High", "Mid", "Low"]);
        assert!(texts(&top, "genre").iter().all(|g| g == "Horror"));
        let rois: Vec<f64> = (0..top.height()).filter_map(|i| float_at(&top, "ROI", i)).collect();
        assert!(rois.windows(2).all(|w| w[0] >= w[1]));
        assert!(rois.iter().all(|r| *r >= 0.0));
    }

    #[test]
    fn test_length_capped() {
        let top = top_movies_by_genre(&facts(), Genre::Horror, -1.0, 2).unwrap();
        assert_eq!(texts(&top, "movie_title"), vec!["High", "Mid"]);
    }

    #[test]
    fn test_null_metric_never_qualifies() {
        let top = top_movies_by_genre(&facts(), Genre::Horror, f64::NEG_INFINITY, 10).unwrap();
        assert_eq!(top.height(), 4);
        assert!(!texts(&top, "movie_title").contains(&"Unknown".to_string()));
    }

    #[test]
    fn test_ties_keep_table_order() {
        let frame = movies_frame(&[
            MovieRecord::new("First", 2000, 20.0, 10.0).with_genre(Genre::Music),
            MovieRecord::new("Second", 2001, 40.0, 20.0).with_genre(Genre::Music),
        ])
        .unwrap();
        let top = top_movies_by_genre(&movies_by_genre(&frame).unwrap(), Genre::Music, 0.0, 5).unwrap();
        assert_eq!(texts(&top, "movie_title"), vec!["First", "Second"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let facts = facts();
        assert_eq!(top_movies_by_genre(&facts, Genre::Western, 0.0, 5).unwrap().height(), 0);
        assert_eq!(top_movies_by_genre(&facts, Genre::Horror, 1000.0, 5).unwrap().height(), 0);
        assert_eq!(top_movies_by_genre(&facts, Genre::Horror, 0.0, 0).unwrap().height(), 0);
    }

    #[test]
    fn test_numeric_filter_key() {
        let top = top_n(&facts(), "title_year", "2002", f64::NEG_INFINITY, "gross", 5).unwrap();
        assert_eq!(texts(&top, "movie_title"), vec!["Other", "Unknown", "Flop"]);
    }

    #[test]
    fn test_unknown_and_text_columns() {
        let facts = facts();
        assert!(matches!(
            top_n(&facts, "studio", "x", 0.0, "ROI", 1),
            Err(PipelineError::Input(InputError::UnknownColumn { .. }))
        ));
        assert!(matches!(
            top_n(&facts, "genre", "Drama", 0.0, "movie_title", 1),
            Err(PipelineError::Input(InputError::NotNumeric(_)))
        ));
    }
}
