//! Transformation module.
//!
//! This module derives every analytical view from parsed movies, as
//! polars `DataFrame`s built from one wide movie frame:
//! - Frame: the wide movie frame
//! - Unpivot: generic wide-to-long reshape
//! - Entities: distinct actors and directors
//! - Reshape: per-actor, per-director and per-genre fact tables
//! - Aggregate: grouped ROI
//! - Rank, Pivot, Budget: top-N views, the genre/year chart table, budget tiers
//! - Pipeline: everything in one call

pub mod aggregate;
pub mod budget;
pub mod entities;
pub mod frame;
pub mod pipeline;
pub mod pivot;
pub mod rank;
pub mod reshape;
pub mod unpivot;

pub use aggregate::{
    actors_roi, aggregate, aggregate_with_dropped, directors_roi, genre_year, genre_year_with_dropped, genres_roi,
    roi_expr, AggregateOutcome,
};
pub use budget::classify;
pub use entities::{actors_list, directors_list, extract_entities};
pub use frame::movies_frame;
pub use pipeline::*;
pub use pivot::{genre_year_pivot, series_column};
pub use rank::{top_movies_by_genre, top_n};
pub use reshape::{movies_by_actor, movies_by_director, movies_by_genre};
pub use unpivot::unpivot;
