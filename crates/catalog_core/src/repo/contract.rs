//! Catalog repository contract and its error type.
//!
//! # Responsibility
//! - Define the capability set every storage backend must satisfy.
//! - Classify raw storage failures into semantic error kinds at the boundary.
//!
//! # Invariants
//! - Lookup, update and delete on an absent id return `NotFound`.
//! - Insert rejects a record that an existence probe would match.
//! - Link creation checks the movie first (`NotExists`), then every actor
//!   (`NotFound`), and only then replaces the stored list.

use crate::db::DbError;
use crate::model::actor::{Actor, ActorId, NewActor};
use crate::model::cast::MovieCast;
use crate::model::movie::{Movie, MovieId, NewMovie};
use crate::model::EntityKind;
use crate::repo::query::{self, ActorSortField, MovieSortField, SortOrder};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every backend.
#[derive(Debug)]
pub enum RepoError {
    /// An equivalent record is already stored.
    AlreadyExists(EntityKind),
    /// Target id is absent, or a linked id no longer resolves.
    NotFound { entity: EntityKind, id: i64 },
    /// Movie id is absent while writing a cast link.
    NotExists(MovieId),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// In-process state lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyExists(entity) => write!(f, "{entity} already exists"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NotExists(id) => write!(f, "movie doesn't exist: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::LockPoisoned(op) => write!(f, "catalog state lock poisoned during {op}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for actors, movies and cast links.
///
/// Implementations take `&self`; mutable state must sit behind interior
/// synchronization so one handle can be shared by several services.
pub trait CatalogRepository {
    /// Stores a new actor and returns it with its assigned id.
    fn insert_actor(&self, actor: &NewActor) -> RepoResult<Actor>;
    /// Probes for an equivalent stored actor.
    fn actor_exists(&self, probe: &NewActor) -> RepoResult<bool>;
    fn get_actor(&self, id: ActorId) -> RepoResult<Actor>;
    /// Overwrites all descriptive fields of the actor with `actor.id`.
    fn update_actor(&self, actor: &Actor) -> RepoResult<()>;
    fn delete_actor(&self, id: ActorId) -> RepoResult<()>;
    fn list_actors(&self) -> RepoResult<Vec<Actor>>;
    /// Name OR country substring filter. Empty strings are no constraint.
    fn filter_actors(&self, name: &str, country: &str) -> RepoResult<Vec<Actor>>;

    /// Stable sort of caller-owned actors.
    fn sort_actors(
        &self,
        field: ActorSortField,
        order: SortOrder,
        mut actors: Vec<Actor>,
    ) -> Vec<Actor> {
        query::sort_actors(&mut actors, field, order);
        actors
    }

    fn insert_movie(&self, movie: &NewMovie) -> RepoResult<Movie>;
    fn movie_exists(&self, probe: &NewMovie) -> RepoResult<bool>;
    fn get_movie(&self, id: MovieId) -> RepoResult<Movie>;
    fn update_movie(&self, movie: &Movie) -> RepoResult<()>;
    fn delete_movie(&self, id: MovieId) -> RepoResult<()>;
    fn list_movies(&self) -> RepoResult<Vec<Movie>>;
    /// Name OR genre substring filter. Empty strings are no constraint.
    fn filter_movies(&self, name: &str, genre: &str) -> RepoResult<Vec<Movie>>;

    /// Stable sort of caller-owned movies.
    fn sort_movies(
        &self,
        field: MovieSortField,
        order: SortOrder,
        mut movies: Vec<Movie>,
    ) -> Vec<Movie> {
        query::sort_movies(&mut movies, field, order);
        movies
    }

    /// Resolves the stored cast of a movie into full actor records.
    ///
    /// Fails with `NotFound` when no cast is recorded (or it is empty), when
    /// the movie itself is gone, or when any linked actor no longer resolves.
    fn get_actors_by_movie(&self, movie_id: MovieId) -> RepoResult<Vec<Actor>>;

    /// Replaces the full cast of a movie.
    fn create_actors_by_movie(
        &self,
        movie_id: MovieId,
        actor_ids: &[ActorId],
    ) -> RepoResult<MovieCast>;
}
