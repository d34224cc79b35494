//! Movie use-case service.
//!
//! # Responsibility
//! - Validate movie payloads (required fields, rating range, calendar date).
//! - Resolve list queries into filter + sort calls on the repository.
//! - Read and replace the actor cast linked to a movie.
//!
//! # Invariants
//! - A cast write never merges: the submitted id list replaces the old one.
//! - A rejected cast write leaves the previous cast untouched.

use crate::model::actor::{Actor, ActorId};
use crate::model::cast::MovieCast;
use crate::model::movie::{Movie, MovieId, MovieUpdate, NewMovie, RATING_MAX};
use crate::model::EntityKind;
use crate::repo::contract::CatalogRepository;
use crate::repo::query::{MovieSortField, SortOrder};
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info, warn};
use serde::Deserialize;

/// List parameters as received from a query string. Empty means unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovieListQuery {
    /// `name` | `genre` | `date`.
    pub sort: String,
    /// `asc` | `desc`.
    pub order: String,
    pub name: String,
    pub genre: String,
}

/// Movie service facade over a repository handle.
pub struct MovieService<'r, R: CatalogRepository + ?Sized> {
    repo: &'r R,
}

impl<'r, R: CatalogRepository + ?Sized> MovieService<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new movie.
    pub fn create(&self, movie: &NewMovie) -> ServiceResult<Movie> {
        validate_movie(movie)?;

        let exists = self
            .repo
            .movie_exists(movie)
            .map_err(|err| ServiceError::from_repo(err, || "failed to probe movie".to_string()))?;
        if exists {
            warn!("event=movie_create module=service status=rejected reason=already_exists");
            return Err(ServiceError::AlreadyExists(EntityKind::Movie));
        }

        let created = self
            .repo
            .insert_movie(movie)
            .map_err(|err| ServiceError::from_repo(err, || "failed to insert movie".to_string()))?;
        info!(
            "event=movie_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get(&self, id: MovieId) -> ServiceResult<Movie> {
        self.repo
            .get_movie(id)
            .map_err(|err| ServiceError::from_repo(err, || format!("failed to find movie {id}")))
    }

    /// Applies a partial update and returns the stored result.
    pub fn update(&self, id: MovieId, update: &MovieUpdate) -> ServiceResult<Movie> {
        let mut movie = self.get(id)?;
        update.apply_to(&mut movie);
        validate_movie(&movie.to_new())?;

        self.repo
            .update_movie(&movie)
            .map_err(|err| ServiceError::from_repo(err, || format!("failed to update movie {id}")))?;
        info!("event=movie_update module=service status=ok id={id}");
        Ok(movie)
    }

    pub fn delete(&self, id: MovieId) -> ServiceResult<()> {
        self.get(id)?;
        self.repo
            .delete_movie(id)
            .map_err(|err| ServiceError::from_repo(err, || format!("failed to delete movie {id}")))?;
        info!("event=movie_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Filters (name OR genre) then sorts, defaulting to name ascending.
    pub fn list(&self, query: &MovieListQuery) -> ServiceResult<Vec<Movie>> {
        let (field, order) = resolve_movie_sort(query);
        let movies = self
            .repo
            .filter_movies(query.name.as_str(), query.genre.as_str())
            .map_err(|err| ServiceError::from_repo(err, || "failed to list movies".to_string()))?;
        match field {
            Some(field) => Ok(self.repo.sort_movies(field, order, movies)),
            None => {
                debug!(
                    "event=movie_list module=service status=unsorted sort={}",
                    query.sort
                );
                Ok(movies)
            }
        }
    }

    /// Returns full actor records linked to `movie_id`.
    pub fn get_actors_by_movie(&self, movie_id: MovieId) -> ServiceResult<Vec<Actor>> {
        self.repo.get_actors_by_movie(movie_id).map_err(|err| {
            ServiceError::from_repo(err, || format!("failed to load cast of movie {movie_id}"))
        })
    }

    /// Replaces the cast of `movie_id` with `actor_ids`.
    pub fn create_actors_for_movie(
        &self,
        movie_id: MovieId,
        actor_ids: &[ActorId],
    ) -> ServiceResult<MovieCast> {
        let cast = self
            .repo
            .create_actors_by_movie(movie_id, actor_ids)
            .map_err(|err| {
                ServiceError::from_repo(err, || format!("failed to store cast of movie {movie_id}"))
            })?;
        info!(
            "event=cast_replace module=service status=ok movie_id={movie_id} actor_count={}",
            cast.actor_ids.len()
        );
        Ok(cast)
    }
}

fn validate_movie(movie: &NewMovie) -> ServiceResult<()> {
    let missing = movie.missing_fields();
    if !missing.is_empty() {
        return Err(ServiceError::FieldsRequired {
            entity: EntityKind::Movie,
            missing,
        });
    }
    if movie.rating > RATING_MAX {
        return Err(ServiceError::InvalidField {
            field: "rating",
            reason: format!("must be between 1 and {RATING_MAX}, got {}", movie.rating),
        });
    }
    if !movie.release_date.is_calendar_valid() {
        return Err(ServiceError::InvalidField {
            field: "release_date",
            reason: format!("`{}` is not a calendar date", movie.release_date),
        });
    }
    Ok(())
}

/// Empty `sort` means name; an unknown name leaves storage order (`None`).
fn resolve_movie_sort(query: &MovieListQuery) -> (Option<MovieSortField>, SortOrder) {
    let field = if query.sort.is_empty() {
        Some(MovieSortField::Name)
    } else {
        MovieSortField::from_query(&query.sort)
    };
    (field, SortOrder::from_query(&query.order))
}
