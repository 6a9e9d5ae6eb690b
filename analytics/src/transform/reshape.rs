//! Fact tables: one row per (entity, movie) or (genre, movie) pair.
//!
//! ```text
//! Wide movie rows                       Narrow fact rows
//! ┌──────────────────────────┐          ┌───────────────────────────┐
//! │ Heat │ a1=X a2=Y a3=-    │    →     │ Heat │ X │ importance 1   │
//! │      │ Crime=1 Drama=1   │          │ Heat │ Y │ importance 2   │
//! └──────────────────────────┘          ├───────────────────────────┤
//!                                       │ Heat │ Crime              │
//!                                       │ Heat │ Drama              │
//!                                       └───────────────────────────┘
//! ```
//!
//! Entity facts are inner-joined against the entity table: a slot whose
//! name is not a known entity produces no row. Movie financials are copied
//! into every row they produce. Rows follow movie order, then slot order.

use polars::prelude::*;

use crate::error::PipelineResult;
use crate::logs::log_warning;
use crate::models::{columns, Genre};
use super::frame::select_columns;
use super::unpivot::unpivot;

const FLAG: &str = "flag";
const GENRE_POSITION: &str = "genre_position";

/// Movie columns copied into every actor fact.
const ACTOR_INDEX: [&str; 6] = [
    columns::MOVIE_ROW,
    columns::MOVIE_TITLE,
    columns::GROSS,
    columns::BUDGET,
    columns::ROI,
    columns::LOG_ROI,
];

/// Movie columns copied into every genre fact.
const GENRE_INDEX: [&str; 7] = [
    columns::MOVIE_ROW,
    columns::MOVIE_TITLE,
    columns::TITLE_YEAR,
    columns::GROSS,
    columns::BUDGET,
    columns::ROI,
    columns::LOG_ROI,
];

/// Every (actor, movie) pair whose actor is in `actors`.
///
/// `actor_importance` is the billing slot (1 to 3). If the same name fills
/// more than one slot of a movie, only the best-billed slot is kept so the
/// movie is counted once for that actor.
pub fn movies_by_actor(movies: &DataFrame, actors: &DataFrame) -> PipelineResult<DataFrame> {
    let slots = columns::ACTOR_NAMES
        .iter()
        .map(|name| vec![col(*name).alias(columns::ACTOR)])
        .collect();

    let appearances = unpivot(movies, &ACTOR_INDEX, slots, columns::ACTOR_IMPORTANCE)?
        .filter(col(columns::ACTOR).is_not_null())
        .join(
            actors.clone().lazy(),
            [col(columns::ACTOR)],
            [col(columns::ACTOR)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;

    let mut kept = vec![col(columns::ACTOR_IMPORTANCE).min()];
    kept.extend(
        ACTOR_INDEX[1..]
            .iter()
            .chain([&columns::FACEBOOK_LIKES])
            .map(|c| col(*c).first()),
    );

    let facts = appearances
        .clone()
        .lazy()
        .group_by([col(columns::MOVIE_ROW), col(columns::ACTOR)])
        .agg(kept)
        .sort_by_exprs(
            [col(columns::MOVIE_ROW), col(columns::ACTOR_IMPORTANCE)],
            SortMultipleOptions::default(),
        )
        .select(select_columns(&columns::ACTOR_FACTS))
        .collect()?;

    let repeated = appearances.height() - facts.height();
    if repeated > 0 {
        log_warning(format!("{} repeated actor slot(s) ignored (same actor twice in one movie)", repeated));
    }

    Ok(facts)
}

/// Every (director, movie) pair whose director is in `directors`.
pub fn movies_by_director(movies: &DataFrame, directors: &DataFrame) -> PipelineResult<DataFrame> {
    let facts = movies
        .clone()
        .lazy()
        .filter(col(columns::DIRECTOR_NAME).is_not_null())
        .join(
            directors.clone().lazy(),
            [col(columns::DIRECTOR_NAME)],
            [col(columns::DIRECTOR)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort_by_exprs([col(columns::MOVIE_ROW)], SortMultipleOptions::default())
        .select(select_columns(&columns::DIRECTOR_FACTS))
        .collect()?;
    Ok(facts)
}

/// One row per movie and per genre flag set on it.
///
/// A movie with k flags yields k rows with identical financials.
pub fn movies_by_genre(movies: &DataFrame) -> PipelineResult<DataFrame> {
    let slots = Genre::ALL
        .iter()
        .map(|genre| vec![lit(genre.column()).alias(columns::GENRE), col(genre.column()).alias(FLAG)])
        .collect();

    let facts = unpivot(movies, &GENRE_INDEX, slots, GENRE_POSITION)?
        .filter(col(FLAG))
        .sort_by_exprs(
            [col(columns::MOVIE_ROW), col(GENRE_POSITION)],
            SortMultipleOptions::default(),
        )
        .select(select_columns(&columns::GENRE_FACTS))
        .collect()?;
    Ok(facts)
}
