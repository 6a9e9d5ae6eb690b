//! ROI aggregation over fact tables.
//!
//! Groups fact rows by one or more key columns and sums their financials.
//! A movie contributes once per fact row, so a movie tagged with three
//! genres counts in all three genre groups.
//!
//! `ROI = (total_gross - total_budget) / total_budget`. A group whose
//! budget sums to zero has no ROI and is left out of the result; it is
//! reported in [`AggregateOutcome::dropped`] so callers can tell it apart
//! from a group that simply had no rows.

use polars::prelude::*;

use crate::error::{InputError, PipelineResult};
use crate::models::{columns, EntityKind, Genre};
use super::frame::require_column;

/// Aggregated table plus the keys of groups dropped for zero total budget.
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub table: DataFrame,
    /// Key columns only, one row per dropped group.
    pub dropped: DataFrame,
}

/// ROI of the summed financials of a group.
pub fn roi_expr() -> Expr {
    ((col(columns::TOTAL_GROSS) - col(columns::TOTAL_BUDGET)) / col(columns::TOTAL_BUDGET)).alias(columns::ROI)
}

/// Group `facts` by `group_keys`, reporting zero-budget groups.
///
/// Entity fact tables (those with a `facebook_likes` column) also get the
/// group's maximum popularity. Rows come out sorted by key. Keys must be
/// text or integer columns.
pub fn aggregate_with_dropped(facts: &DataFrame, group_keys: &[&str]) -> PipelineResult<AggregateOutcome> {
    for key in group_keys {
        if require_column(facts, key)?.dtype().is_float() {
            return Err(InputError::NotGroupable(key.to_string()).into());
        }
    }
    let with_popularity = facts.column(columns::FACEBOOK_LIKES).is_ok();
    let keys: Vec<Expr> = group_keys.iter().map(|k| col(*k)).collect();

    let mut totals = vec![
        col(columns::GROSS).sum().alias(columns::TOTAL_GROSS),
        col(columns::BUDGET).sum().alias(columns::TOTAL_BUDGET),
        len().alias(columns::NUMBER_MOVIES),
    ];
    if with_popularity {
        totals.push(col(columns::FACEBOOK_LIKES).max());
    }

    let grouped = facts
        .clone()
        .lazy()
        .group_by(keys.clone())
        .agg(totals)
        .sort_by_exprs(keys.clone(), SortMultipleOptions::default())
        .collect()?;

    let dropped = grouped
        .clone()
        .lazy()
        .filter(col(columns::TOTAL_BUDGET).eq(lit(0.0)))
        .select(keys.clone())
        .collect()?;

    let mut output = keys;
    output.push(roi_expr());
    if with_popularity {
        output.push(col(columns::FACEBOOK_LIKES));
    }
    output.extend([
        col(columns::TOTAL_GROSS),
        col(columns::TOTAL_BUDGET),
        col(columns::NUMBER_MOVIES),
    ]);

    let table = grouped
        .lazy()
        .filter(col(columns::TOTAL_BUDGET).neq(lit(0.0)))
        .select(output)
        .collect()?;

    Ok(AggregateOutcome { table, dropped })
}

/// Group a fact table by `group_keys`. Rows come out sorted by key.
pub fn aggregate(facts: &DataFrame, group_keys: &[&str]) -> PipelineResult<DataFrame> {
    Ok(aggregate_with_dropped(facts, group_keys)?.table)
}

/// Totals and ROI per actor, regardless of billing order.
pub fn actors_roi(facts: &DataFrame) -> PipelineResult<DataFrame> {
    aggregate(facts, &[EntityKind::Actor.fact_column()])
}

/// Totals and ROI per director.
pub fn directors_roi(facts: &DataFrame) -> PipelineResult<DataFrame> {
    aggregate(facts, &[EntityKind::Director.fact_column()])
}

/// Totals and ROI per genre.
pub fn genres_roi(facts: &DataFrame) -> PipelineResult<DataFrame> {
    aggregate(facts, &[columns::GENRE])
}

/// Totals and ROI per (genre, year), restricted to `genres` (empty = all).
pub fn genre_year_with_dropped(facts: &DataFrame, genres: &[Genre]) -> PipelineResult<AggregateOutcome> {
    let selected = genres
        .iter()
        .map(|g| col(columns::GENRE).eq(lit(g.column())))
        .reduce(|a, b| a.or(b));

    match selected {
        Some(predicate) => {
            let filtered = facts.clone().lazy().filter(predicate).collect()?;
            aggregate_with_dropped(&filtered, &[columns::GENRE, columns::TITLE_YEAR])
        }
        None => aggregate_with_dropped(facts, &[columns::GENRE, columns::TITLE_YEAR]),
    }
}

/// Totals and ROI per (genre, year), restricted to `genres` (empty = all).
pub fn genre_year(facts: &DataFrame, genres: &[Genre]) -> PipelineResult<DataFrame> {
    Ok(genre_year_with_dropped(facts, genres)?.table)
}
