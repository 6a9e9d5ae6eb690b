//! Domain models for the movie ROI pipeline.
//!
//! - [`MovieRecord`] - One row of the wide input table
//! - [`Genre`] - The fixed, ordered list of genre flag columns
//! - [`EntityKind`] - Actor or director, and where each lives in the wide table
//! - [`BudgetTier`] - Budget classification
//!
//! Derived views (entities, fact tables, aggregates) are polars
//! `DataFrame`s; [`columns`] names their columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Column names shared by the input dataset and the derived tables.
pub mod columns {
    pub const MOVIE_TITLE: &str = "movie_title";
    pub const GROSS: &str = "gross";
    pub const BUDGET: &str = "budget";
    pub const ROI: &str = "ROI";
    pub const LOG_ROI: &str = "log_ROI";
    pub const TITLE_YEAR: &str = "title_year";
    pub const DIRECTOR_NAME: &str = "director_name";
    pub const DIRECTOR_FACEBOOK_LIKES: &str = "director_facebook_likes";
    pub const ACTOR_NAMES: [&str; 3] = ["actor_1_name", "actor_2_name", "actor_3_name"];
    pub const ACTOR_FACEBOOK_LIKES: [&str; 3] = [
        "actor_1_facebook_likes",
        "actor_2_facebook_likes",
        "actor_3_facebook_likes",
    ];

    pub const ACTOR: &str = "actor";
    pub const DIRECTOR: &str = "director";
    pub const ACTOR_IMPORTANCE: &str = "actor_importance";
    pub const FACEBOOK_LIKES: &str = "facebook_likes";
    pub const GENRE: &str = "genre";
    pub const TOTAL_GROSS: &str = "total_gross";
    pub const TOTAL_BUDGET: &str = "total_budget";
    pub const NUMBER_MOVIES: &str = "number_movies";

    /// Position of the source row in the wide table; never written out.
    pub const MOVIE_ROW: &str = "movie_row";

    pub const ACTOR_FACTS: [&str; 8] = [
        MOVIE_TITLE,
        GROSS,
        BUDGET,
        ROI,
        LOG_ROI,
        ACTOR_IMPORTANCE,
        ACTOR,
        FACEBOOK_LIKES,
    ];

    pub const DIRECTOR_FACTS: [&str; 7] = [MOVIE_TITLE, DIRECTOR_NAME, GROSS, BUDGET, ROI, LOG_ROI, FACEBOOK_LIKES];

    pub const GENRE_FACTS: [&str; 7] = [MOVIE_TITLE, TITLE_YEAR, GROSS, BUDGET, ROI, LOG_ROI, GENRE];
}

// =============================================================================
// Genre
// =============================================================================

/// Genre flag columns, in dataset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    Biography,
    Adventure,
    Family,
    War,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Mystery,
    Romance,
    Crime,
    Action,
    Animation,
    Sport,
    Drama,
    Documentary,
    Music,
    History,
    Fantasy,
    #[serde(rename = "Film-Noir")]
    FilmNoir,
    Thriller,
    Horror,
    Short,
    Comedy,
    Western,
    News,
    Musical,
}

impl Genre {
    pub const COUNT: usize = 24;

    pub const ALL: [Genre; Genre::COUNT] = [
        Genre::Biography,
        Genre::Adventure,
        Genre::Family,
        Genre::War,
        Genre::SciFi,
        Genre::Mystery,
        Genre::Romance,
        Genre::Crime,
        Genre::Action,
        Genre::Animation,
        Genre::Sport,
        Genre::Drama,
        Genre::Documentary,
        Genre::Music,
        Genre::History,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Thriller,
        Genre::Horror,
        Genre::Short,
        Genre::Comedy,
        Genre::Western,
        Genre::News,
        Genre::Musical,
    ];

    /// Column name in the dataset, also used as the genre label.
    pub fn column(&self) -> &'static str {
        match self {
            Genre::Biography => "Biography",
            Genre::Adventure => "Adventure",
            Genre::Family => "Family",
            Genre::War => "War",
            Genre::SciFi => "Sci-Fi",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::Crime => "Crime",
            Genre::Action => "Action",
            Genre::Animation => "Animation",
            Genre::Sport => "Sport",
            Genre::Drama => "Drama",
            Genre::Documentary => "Documentary",
            Genre::Music => "Music",
            Genre::History => "History",
            Genre::Fantasy => "Fantasy",
            Genre::FilmNoir => "Film-Noir",
            Genre::Thriller => "Thriller",
            Genre::Horror => "Horror",
            Genre::Short => "Short",
            Genre::Comedy => "Comedy",
            Genre::Western => "Western",
            Genre::News => "News",
            Genre::Musical => "Musical",
        }
    }

    /// Position in [`Genre::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Genre {
    type Err = InputError;

    /// Accepts the column name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.column().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InputError::UnknownGenre(s.to_string()))
    }
}

// =============================================================================
// Movie (wide input row)
// =============================================================================

/// A named participant slot (actor or director) with its popularity count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySlot {
    /// `None` when the slot is empty.
    pub name: Option<String>,
    pub facebook_likes: Option<f64>,
}

impl EntitySlot {
    pub fn new(name: impl Into<String>, facebook_likes: f64) -> Self {
        Self {
            name: Some(name.into()),
            facebook_likes: Some(facebook_likes),
        }
    }

    /// Name, if the slot holds a real entity.
    pub fn entity_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// One row of the wide movie table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub movie_title: String,
    pub gross: f64,
    pub budget: f64,
    /// Dataset ROI; `None` where the source has none (blank, NaN or infinite).
    pub roi: Option<f64>,
    pub log_roi: Option<f64>,
    pub title_year: i64,
    /// Billing order: index 0 is `actor_1`.
    pub actors: [EntitySlot; 3],
    pub director: EntitySlot,
    /// Indexed by [`Genre::index`].
    pub genres: [bool; Genre::COUNT],
}

impl MovieRecord {
    /// Movie with no actors, director or genres.
    ///
    /// `ROI` is derived from gross and budget (none when the budget is 0)
    /// and `log_ROI` is `ln(1 + ROI)`.
    pub fn new(movie_title: impl Into<String>, title_year: i64, gross: f64, budget: f64) -> Self {
        let roi = Some((gross - budget) / budget).filter(|r| r.is_finite());
        Self {
            movie_title: movie_title.into(),
            gross,
            budget,
            roi,
            log_roi: roi.map(f64::ln_1p).filter(|r| r.is_finite()),
            title_year,
            actors: Default::default(),
            director: EntitySlot::default(),
            genres: [false; Genre::COUNT],
        }
    }

    /// Set actor slot `rank` (1, 2 or 3).
    pub fn with_actor(mut self, rank: usize, name: impl Into<String>, facebook_likes: f64) -> Self {
        if let Some(slot) = rank.checked_sub(1).and_then(|i| self.actors.get_mut(i)) {
            *slot = EntitySlot::new(name, facebook_likes);
        }
        self
    }

    pub fn with_director(mut self, name: impl Into<String>, facebook_likes: f64) -> Self {
        self.director = EntitySlot::new(name, facebook_likes);
        self
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genres[genre.index()] = true;
        self
    }

    pub fn has_genre(&self, genre: Genre) -> bool {
        self.genres[genre.index()]
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Kind of named entity extracted from the movie table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Actor,
    Director,
}

impl EntityKind {
    /// Key column of the entity table.
    pub fn entity_column(&self) -> &'static str {
        match self {
            EntityKind::Actor => columns::ACTOR,
            EntityKind::Director => columns::DIRECTOR,
        }
    }

    /// Key column of the fact and aggregate tables.
    pub fn fact_column(&self) -> &'static str {
        match self {
            EntityKind::Actor => columns::ACTOR,
            EntityKind::Director => columns::DIRECTOR_NAME,
        }
    }

    /// Wide name columns, in billing order.
    pub fn name_columns(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Actor => &columns::ACTOR_NAMES,
            EntityKind::Director => &[columns::DIRECTOR_NAME],
        }
    }

    /// Wide popularity columns, parallel to [`EntityKind::name_columns`].
    pub fn likes_columns(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Actor => &columns::ACTOR_FACEBOOK_LIKES,
            EntityKind::Director => &[columns::DIRECTOR_FACEBOOK_LIKES],
        }
    }
}

// =============================================================================
// Budget Tier
// =============================================================================

/// Budget classification, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Micro,
    Low,
    Normal,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Micro => "micro",
            BudgetTier::Low => "low",
            BudgetTier::Normal => "normal",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_order_and_names() {
        assert_eq!(Genre::ALL.len(), 24);
        assert_eq!(Genre::ALL[0], Genre::Biography);
        assert_eq!(Genre::ALL[23], Genre::Musical);
        for (i, genre) in Genre::ALL.iter().enumerate() {
            assert_eq!(genre.index(), i);
        }
        assert_eq!(Genre::SciFi.column(), "Sci-Fi");
        assert_eq!(Genre::FilmNoir.to_string(), "Film-Noir");
    }

    #[test]
    fn test_genre_from_str() {
        assert_eq!("sci-fi".parse::<Genre>().unwrap(), Genre::SciFi);
        assert_eq!(" Drama ".parse::<Genre>().unwrap(), Genre::Drama);
        assert!(matches!("Noir".parse::<Genre>(), Err(InputError::UnknownGenre(_))));
    }

    #[test]
    fn test_genre_serde_uses_column_names() {
        let json = serde_json::to_string(&Genre::FilmNoir).unwrap();
        assert_eq!(json, "\"Film-Noir\"");
    }

    #[test]
    fn test_movie_builder() {
        let movie = MovieRecord::new("A", 2001, 100.0, 50.0)
            .with_actor(2, "X", 10.0)
            .with_genre(Genre::Drama)
            .with_genre(Genre::Crime);

        assert_eq!(movie.roi, Some(1.0));
        assert!(movie.actors[0].entity_name().is_none());
        assert_eq!(movie.actors[1].entity_name(), Some("X"));
        assert!(movie.has_genre(Genre::Crime) && movie.has_genre(Genre::Drama));
        assert!(!movie.has_genre(Genre::Comedy));
    }

    #[test]
    fn test_blank_slot_is_not_an_entity() {
        let slot = EntitySlot { name: Some("  ".into()), facebook_likes: Some(3.0) };
        assert!(slot.entity_name().is_none());
    }

    #[test]
    fn test_zero_budget_movie_has_no_roi() {
        let movie = MovieRecord::new("Free", 2000, 0.0, 0.0);
        assert_eq!(movie.roi, None);
        assert_eq!(movie.log_roi, None);
        assert_eq!(MovieRecord::new("Gift", 2000, 10.0, 0.0).roi, None);
    }

    #[test]
    fn test_entity_kind_columns() {
        assert_eq!(EntityKind::Director.entity_column(), "director");
        assert_eq!(EntityKind::Director.fact_column(), "director_name");
        assert_eq!(EntityKind::Actor.name_columns().len(), EntityKind::Actor.likes_columns().len());
        assert_eq!(EntityKind::Actor.likes_columns()[2], "actor_3_facebook_likes");
    }
}
