//! Sort keys and in-process filter/sort helpers shared by all backends.
//!
//! # Invariants
//! - Sorting is stable: equal keys keep their input order in both directions.
//! - Filters OR their constraints; an empty query string is no constraint.

use crate::model::actor::Actor;
use crate::model::movie::Movie;
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Actor list sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorSortField {
    #[default]
    Name,
    Country,
    BirthYear,
}

/// Movie list sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieSortField {
    #[default]
    Name,
    Genre,
    ReleaseDate,
}

impl SortOrder {
    /// Reads a query `order` value: empty or `asc` is ascending, anything
    /// else is descending.
    pub fn from_query(value: &str) -> Self {
        match value {
            "" | "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl ActorSortField {
    /// Maps a query `sort` value; unknown names yield `None`.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "country" => Some(Self::Country),
            "birthdate" => Some(Self::BirthYear),
            _ => None,
        }
    }
}

impl MovieSortField {
    /// Maps a query `sort` value; unknown names yield `None`.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "genre" => Some(Self::Genre),
            "date" => Some(Self::ReleaseDate),
            _ => None,
        }
    }
}

/// Stable in-place actor sort.
pub fn sort_actors(actors: &mut [Actor], field: ActorSortField, order: SortOrder) {
    actors.sort_by(|left, right| {
        let ordering = match field {
            ActorSortField::Name => left.name.cmp(&right.name),
            ActorSortField::Country => left.country_of_birth.cmp(&right.country_of_birth),
            ActorSortField::BirthYear => left.birth_year.cmp(&right.birth_year),
        };
        order.apply(ordering)
    });
}

/// Stable in-place movie sort. Dates compare chronologically.
pub fn sort_movies(movies: &mut [Movie], field: MovieSortField, order: SortOrder) {
    movies.sort_by(|left, right| {
        let ordering = match field {
            MovieSortField::Name => left.name.cmp(&right.name),
            MovieSortField::Genre => left.genre.cmp(&right.genre),
            MovieSortField::ReleaseDate => left.release_date.cmp(&right.release_date),
        };
        order.apply(ordering)
    });
}

/// Keeps actors whose name contains `name` OR whose country contains `country`.
pub fn filter_actors(actors: Vec<Actor>, name: &str, country: &str) -> Vec<Actor> {
    if name.is_empty() && country.is_empty() {
        return actors;
    }
    actors
        .into_iter()
        .filter(|actor| {
            (!name.is_empty() && actor.name.contains(name))
                || (!country.is_empty() && actor.country_of_birth.contains(country))
        })
        .collect()
}

/// Keeps movies whose name contains `name` OR whose genre contains `genre`.
pub fn filter_movies(movies: Vec<Movie>, name: &str, genre: &str) -> Vec<Movie> {
    if name.is_empty() && genre.is_empty() {
        return movies;
    }
    movies
        .into_iter()
        .filter(|movie| {
            (!name.is_empty() && movie.name.contains(name))
                || (!genre.is_empty() && movie.genre.contains(genre))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        filter_actors, sort_actors, sort_movies, ActorSortField, MovieSortField, SortOrder,
    };
    use crate::model::actor::{Actor, NewActor};
    use crate::model::movie::{NewMovie, ReleaseDate};

    fn actor(id: i64, name: &str, year: i32, country: &str) -> Actor {
        NewActor::new(name, year, country, "female").with_id(id)
    }

    #[test]
    fn any_order_other_than_asc_is_descending() {
        assert_eq!(SortOrder::from_query(""), SortOrder::Asc);
        assert_eq!(SortOrder::from_query("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_query("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_query("DESC"), SortOrder::Desc);
    }

    #[test]
    fn sort_field_vocabulary_matches_query_strings() {
        assert_eq!(
            ActorSortField::from_query("birthdate"),
            Some(ActorSortField::BirthYear)
        );
        assert_eq!(
            MovieSortField::from_query("date"),
            Some(MovieSortField::ReleaseDate)
        );
        assert_eq!(ActorSortField::from_query("birth_year"), None);
    }

    #[test]
    fn descending_sort_keeps_ties_in_input_order() {
        let mut actors = vec![
            actor(1, "Bob", 1950, "A"),
            actor(2, "Ann", 1960, "B"),
            actor(3, "Bob", 1970, "C"),
        ];

        sort_actors(&mut actors, ActorSortField::Name, SortOrder::Desc);

        let ids: Vec<_> = actors.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn date_sort_is_chronological_not_component_wise() {
        let mut movies = vec![
            NewMovie::new("a", ReleaseDate::new(1, 1, 2005), "x", "g", 3).with_id(1),
            NewMovie::new("b", ReleaseDate::new(30, 12, 1999), "x", "g", 3).with_id(2),
            NewMovie::new("c", ReleaseDate::new(15, 6, 2005), "x", "g", 3).with_id(3),
        ];

        sort_movies(&mut movies, MovieSortField::ReleaseDate, SortOrder::Asc);

        let ids: Vec<_> = movies.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn filter_is_logical_or_and_ignores_empty_queries() {
        let actors = vec![
            actor(1, "Mabel", 1950, "Sweden"),
            actor(2, "Kek", 1960, "Norway"),
            actor(3, "Lol", 1970, "Chile"),
        ];

        let by_either = filter_actors(actors.clone(), "ab", "Nor");
        let ids: Vec<_> = by_either.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(filter_actors(actors.clone(), "", "").len(), 3);
        assert!(filter_actors(actors, "zzz", "").is_empty());
    }
}
