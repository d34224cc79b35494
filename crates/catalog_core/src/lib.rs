//! Core catalog logic: actors, movies and the cast links between them.
//! This crate owns validation, storage contracts and both storage backends.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{BackendKind, CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::actor::{Actor, ActorId, ActorUpdate, NewActor};
pub use model::cast::MovieCast;
pub use model::movie::{Movie, MovieId, MovieUpdate, NewMovie, ReleaseDate, RATING_MAX};
pub use model::EntityKind;
pub use repo::contract::{CatalogRepository, RepoError, RepoResult};
pub use repo::memory::InMemoryCatalogRepository;
pub use repo::query::{ActorSortField, MovieSortField, SortOrder};
pub use repo::sqlite::SqliteCatalogRepository;
pub use service::actor_service::{ActorListQuery, ActorService};
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::movie_service::{MovieListQuery, MovieService};
pub use store::CatalogStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
