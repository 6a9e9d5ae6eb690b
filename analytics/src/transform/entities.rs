//! Entity extraction: distinct actors and directors with their popularity.
//!
//! Popularity is a property of the name, so a name seen in several slots
//! (or several movies) keeps the largest `facebook_likes` observed. The
//! slots are unpivoted into one long frame and grouped once, which is the
//! same as taking the max per slot and then the max of the union.
//!
//! Empty slots mean "no actor here" and are filtered out explicitly before
//! grouping. Unknown likes never win over a known value.

use polars::prelude::*;

use crate::models::{columns, EntityKind};
use super::unpivot::unpivot;

const NAME: &str = "name";
const SLOT: &str = "slot";

/// Distinct entities of `kind` in the wide movie frame, sorted by name.
///
/// Columns: the entity name (`actor` or `director`) and `facebook_likes`.
pub fn extract_entities(movies: &DataFrame, kind: EntityKind) -> PolarsResult<DataFrame> {
    let slots = kind
        .name_columns()
        .iter()
        .zip(kind.likes_columns())
        .map(|(name, likes)| vec![col(*name).alias(NAME), col(*likes).alias(columns::FACEBOOK_LIKES)])
        .collect();

    unpivot(movies, &[], slots, SLOT)?
        .filter(col(NAME).is_not_null())
        .group_by([col(NAME)])
        .agg([col(columns::FACEBOOK_LIKES).max()])
        .sort_by_exprs([col(NAME)], SortMultipleOptions::default())
        .select([col(NAME).alias(kind.entity_column()), col(columns::FACEBOOK_LIKES)])
        .collect()
}

/// All actors from the three actor slots.
pub fn actors_list(movies: &DataFrame) -> PolarsResult<DataFrame> {
    extract_entities(movies, EntityKind::Actor)
}

/// All directors.
pub fn directors_list(movies: &DataFrame) -> PolarsResult<DataFrame> {
    extract_entities(movies, EntityKind::Director)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use crate::transform::frame::movies_frame;
    use crate::transform::frame::testing::{float_at, names, rows_where, texts};

    fn movies() -> DataFrame {
        movies_frame(&[
            MovieRecord::new("A", 2000, 10.0, 5.0)
                .with_actor(1, "X", 100.0)
                .with_actor(2, "Y", 7.0)
                .with_director("D", 3.0),
            MovieRecord::new("B", 2001, 10.0, 5.0)
                .with_actor(3, "X", 250.0)
                .with_actor(1, "Z", 1.0)
                .with_director("D", 9.0),
            MovieRecord::new("C", 2002, 10.0, 5.0).with_actor(2, "X", 50.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_actor_popularity_is_max_across_slots() {
        let actors = actors_list(&movies()).unwrap();
        let x = rows_where(&actors, "actor", "X");
        assert_eq!(float_at(&x, "facebook_likes", 0), Some(250.0));
    }

    #[test]
    fn test_no_duplicate_names_sorted() {
        let actors = actors_list(&movies()).unwrap();
        assert_eq!(texts(&actors, "actor"), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_blank_slots_excluded() {
        let mut movie = MovieRecord::new("E", 2000, 1.0, 1.0).with_actor(1, "", 40.0);
        movie.actors[2].name = Some("   ".into());
        let actors = actors_list(&movies_frame(&[movie]).unwrap()).unwrap();
        assert_eq!(actors.height(), 0);
    }

    #[test]
    fn test_directors() {
        let directors = directors_list(&movies()).unwrap();
        assert_eq!(directors.height(), 1);
        assert_eq!(texts(&directors, "director"), vec!["D"]);
        assert_eq!(float_at(&directors, "facebook_likes", 0), Some(9.0));
        assert_eq!(names(&directors), vec!["director", "facebook_likes"]);
    }

    #[test]
    fn test_unknown_likes_do_not_erase_known() {
        let mut unknown = MovieRecord::new("F", 2003, 1.0, 1.0).with_actor(1, "Y", 0.0);
        unknown.actors[0].facebook_likes = None;
        let mut only_unknown = MovieRecord::new("G", 2003, 1.0, 1.0).with_actor(1, "W", 0.0);
        only_unknown.actors[0].facebook_likes = None;

        let frame = movies_frame(&[
            MovieRecord::new("A", 2000, 1.0, 1.0).with_actor(1, "Y", 4.0),
            unknown,
            only_unknown,
        ])
        .unwrap();
        let actors = actors_list(&frame).unwrap();

        assert_eq!(float_at(&rows_where(&actors, "actor", "Y"), "facebook_likes", 0), Some(4.0));
        assert_eq!(float_at(&rows_where(&actors, "actor", "W"), "facebook_likes", 0), None);
    }
}
