//! Wide movie frame and small DataFrame helpers shared by the views.
//!
//! Every derived view starts from [`movies_frame`]: one row per movie, the
//! dataset columns by their dataset names, plus an internal `movie_row`
//! position used to keep file order through joins and regroupings.
//! Blank entity names become nulls so that "no actor in this slot" is a
//! plain `is_not_null` filter downstream.

use polars::prelude::*;

use crate::error::{InputError, InputResult};
use crate::models::{columns, Genre, MovieRecord};

/// Build the wide frame of `movies`.
pub fn movies_frame(movies: &[MovieRecord]) -> PolarsResult<DataFrame> {
    let rows = u32::try_from(movies.len()).map_err(|_| PolarsError::ComputeError("too many movies".into()))?;

    let mut frame = vec![
        Column::new(columns::MOVIE_ROW.into(), (0..rows).collect::<Vec<u32>>()),
        Column::new(
            columns::MOVIE_TITLE.into(),
            movies.iter().map(|m| m.movie_title.as_str()).collect::<Vec<_>>(),
        ),
    ];

    for slot in 0..columns::ACTOR_NAMES.len() {
        frame.push(Column::new(
            columns::ACTOR_NAMES[slot].into(),
            movies.iter().map(|m| m.actors[slot].entity_name()).collect::<Vec<_>>(),
        ));
        frame.push(Column::new(
            columns::ACTOR_FACEBOOK_LIKES[slot].into(),
            movies.iter().map(|m| m.actors[slot].facebook_likes).collect::<Vec<_>>(),
        ));
    }

    frame.extend([
        Column::new(
            columns::DIRECTOR_NAME.into(),
            movies.iter().map(|m| m.director.entity_name()).collect::<Vec<_>>(),
        ),
        Column::new(
            columns::DIRECTOR_FACEBOOK_LIKES.into(),
            movies.iter().map(|m| m.director.facebook_likes).collect::<Vec<_>>(),
        ),
        Column::new(columns::GROSS.into(), movies.iter().map(|m| m.gross).collect::<Vec<f64>>()),
        Column::new(columns::BUDGET.into(), movies.iter().map(|m| m.budget).collect::<Vec<f64>>()),
        Column::new(columns::ROI.into(), movies.iter().map(|m| m.roi).collect::<Vec<Option<f64>>>()),
        Column::new(columns::LOG_ROI.into(), movies.iter().map(|m| m.log_roi).collect::<Vec<Option<f64>>>()),
        Column::new(columns::TITLE_YEAR.into(), movies.iter().map(|m| m.title_year).collect::<Vec<i64>>()),
    ]);

    for genre in Genre::ALL {
        frame.push(Column::new(
            genre.column().into(),
            movies.iter().map(|m| m.has_genre(genre)).collect::<Vec<bool>>(),
        ));
    }

    DataFrame::new(frame)
}

/// Column expressions for `names`, in order.
pub fn select_columns(names: &[&str]) -> Vec<Expr> {
    names.iter().map(|name| col(*name)).collect()
}

/// Look up a column, reporting the available ones when it is absent.
pub fn require_column<'a>(frame: &'a DataFrame, name: &str) -> InputResult<&'a Column> {
    frame.column(name).map_err(|_| InputError::UnknownColumn {
        column: name.to_string(),
        available: frame.get_column_names().iter().map(|c| c.to_string()).collect(),
    })
}

pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Value lookups for unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use polars::prelude::*;

    /// Rows of `frame` whose `column`, rendered as text, equals `value`.
    pub fn rows_where(frame: &DataFrame, column: &str, value: &str) -> DataFrame {
        frame
            .clone()
            .lazy()
            .filter(col(column).cast(DataType::String).eq(lit(value)))
            .collect()
            .unwrap()
    }

    pub fn float_at(frame: &DataFrame, column: &str, row: usize) -> Option<f64> {
        let values = frame.column(column).unwrap().cast(&DataType::Float64).unwrap();
        values.f64().unwrap().get(row)
    }

    pub fn int_at(frame: &DataFrame, column: &str, row: usize) -> Option<i64> {
        let values = frame.column(column).unwrap().cast(&DataType::Int64).unwrap();
        values.i64().unwrap().get(row)
    }

    pub fn texts(frame: &DataFrame, column: &str) -> Vec<String> {
        let values = frame.column(column).unwrap().cast(&DataType::String).unwrap();
        values
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    pub fn names(frame: &DataFrame) -> Vec<String> {
        frame.get_column_names().iter().map(|c| c.to_string()).collect()
    }
}
