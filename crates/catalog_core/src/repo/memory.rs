//! In-process catalog backend.
//!
//! # Responsibility
//! - Keep actors, movies and cast links in ordered in-memory containers.
//! - Serialize every call through a single mutex; clones share that state, so
//!   a clone is a cheap handle for another service or thread.
//!
//! # Invariants
//! - Ids come from per-entity counters and are never reused after delete.
//! - Reads hand out owned copies; callers may sort/filter them freely.

use crate::model::actor::{Actor, ActorId, NewActor};
use crate::model::cast::MovieCast;
use crate::model::movie::{Movie, MovieId, NewMovie};
use crate::model::EntityKind;
use crate::repo::contract::{CatalogRepository, RepoError, RepoResult};
use crate::repo::query;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct CatalogState {
    actors: Vec<Actor>,
    movies: Vec<Movie>,
    casts: HashMap<MovieId, Vec<ActorId>>,
    last_actor_id: ActorId,
    last_movie_id: MovieId,
}

impl CatalogState {
    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }
}

/// Mutex-guarded in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, op: &'static str) -> RepoResult<MutexGuard<'_, CatalogState>> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned(op))
    }
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn insert_actor(&self, actor: &NewActor) -> RepoResult<Actor> {
        let mut state = self.lock("insert_actor")?;
        if state.actors.iter().any(|stored| stored.matches(actor)) {
            return Err(RepoError::AlreadyExists(EntityKind::Actor));
        }

        state.last_actor_id += 1;
        let created = actor.clone().with_id(state.last_actor_id);
        state.actors.push(created.clone());
        debug!(
            "event=actor_insert module=repo backend=memory status=ok id={}",
            created.id
        );
        Ok(created)
    }

    fn actor_exists(&self, probe: &NewActor) -> RepoResult<bool> {
        let state = self.lock("actor_exists")?;
        Ok(state.actors.iter().any(|stored| stored.matches(probe)))
    }

    fn get_actor(&self, id: ActorId) -> RepoResult<Actor> {
        let state = self.lock("get_actor")?;
        state
            .actor(id)
            .cloned()
            .ok_or(RepoError::not_found(EntityKind::Actor, id))
    }

    fn update_actor(&self, actor: &Actor) -> RepoResult<()> {
        let mut state = self.lock("update_actor")?;
        let slot = state
            .actors
            .iter_mut()
            .find(|stored| stored.id == actor.id)
            .ok_or(RepoError::not_found(EntityKind::Actor, actor.id))?;
        *slot = actor.clone();
        Ok(())
    }

    fn delete_actor(&self, id: ActorId) -> RepoResult<()> {
        let mut state = self.lock("delete_actor")?;
        let before = state.actors.len();
        state.actors.retain(|stored| stored.id != id);
        if state.actors.len() == before {
            return Err(RepoError::not_found(EntityKind::Actor, id));
        }
        Ok(())
    }

    fn list_actors(&self) -> RepoResult<Vec<Actor>> {
        Ok(self.lock("list_actors")?.actors.clone())
    }

    fn filter_actors(&self, name: &str, country: &str) -> RepoResult<Vec<Actor>> {
        let actors = self.list_actors()?;
        Ok(query::filter_actors(actors, name, country))
    }

    fn insert_movie(&self, movie: &NewMovie) -> RepoResult<Movie> {
        let mut state = self.lock("insert_movie")?;
        if state.movies.iter().any(|stored| stored.matches(movie)) {
            return Err(RepoError::AlreadyExists(EntityKind::Movie));
        }

        state.last_movie_id += 1;
        let created = movie.clone().with_id(state.last_movie_id);
        state.movies.push(created.clone());
        debug!(
            "event=movie_insert module=repo backend=memory status=ok id={}",
            created.id
        );
        Ok(created)
    }

    fn movie_exists(&self, probe: &NewMovie) -> RepoResult<bool> {
        let state = self.lock("movie_exists")?;
        Ok(state.movies.iter().any(|stored| stored.matches(probe)))
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Movie> {
        let state = self.lock("get_movie")?;
        state
            .movie(id)
            .cloned()
            .ok_or(RepoError::not_found(EntityKind::Movie, id))
    }

    fn update_movie(&self, movie: &Movie) -> RepoResult<()> {
        let mut state = self.lock("update_movie")?;
        let slot = state
            .movies
            .iter_mut()
            .find(|stored| stored.id == movie.id)
            .ok_or(RepoError::not_found(EntityKind::Movie, movie.id))?;
        *slot = movie.clone();
        Ok(())
    }

    fn delete_movie(&self, id: MovieId) -> RepoResult<()> {
        let mut state = self.lock("delete_movie")?;
        let before = state.movies.len();
        state.movies.retain(|stored| stored.id != id);
        if state.movies.len() == before {
            return Err(RepoError::not_found(EntityKind::Movie, id));
        }
        Ok(())
    }

    fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        Ok(self.lock("list_movies")?.movies.clone())
    }

    fn filter_movies(&self, name: &str, genre: &str) -> RepoResult<Vec<Movie>> {
        let movies = self.list_movies()?;
        Ok(query::filter_movies(movies, name, genre))
    }

    fn get_actors_by_movie(&self, movie_id: MovieId) -> RepoResult<Vec<Actor>> {
        let state = self.lock("get_actors_by_movie")?;
        if state.movie(movie_id).is_none() {
            return Err(RepoError::not_found(EntityKind::Movie, movie_id));
        }

        let actor_ids = state
            .casts
            .get(&movie_id)
            .filter(|ids| !ids.is_empty())
            .ok_or(RepoError::not_found(EntityKind::Cast, movie_id))?;

        actor_ids
            .iter()
            .map(|id| {
                state
                    .actor(*id)
                    .cloned()
                    .ok_or(RepoError::not_found(EntityKind::Actor, *id))
            })
            .collect()
    }

    fn create_actors_by_movie(
        &self,
        movie_id: MovieId,
        actor_ids: &[ActorId],
    ) -> RepoResult<MovieCast> {
        let mut state = self.lock("create_actors_by_movie")?;
        if state.movie(movie_id).is_none() {
            return Err(RepoError::NotExists(movie_id));
        }
        if let Some(missing) = actor_ids.iter().find(|id| state.actor(**id).is_none()) {
            return Err(RepoError::not_found(EntityKind::Actor, *missing));
        }

        state.casts.insert(movie_id, actor_ids.to_vec());
        Ok(MovieCast {
            movie_id,
            actor_ids: actor_ids.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryCatalogRepository;
    use crate::model::actor::NewActor;
    use crate::repo::contract::{CatalogRepository, RepoError};
    use std::thread;

    #[test]
    fn ids_are_not_reused_after_deleting_the_newest_actor() {
        let repo = InMemoryCatalogRepository::new();
        repo.insert_actor(&NewActor::new("A", 1900, "X", "male"))
            .unwrap();
        let second = repo
            .insert_actor(&NewActor::new("B", 1901, "Y", "male"))
            .unwrap();
        repo.delete_actor(second.id).unwrap();

        let third = repo
            .insert_actor(&NewActor::new("C", 1902, "Z", "male"))
            .unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn returned_lists_are_detached_copies() {
        let repo = InMemoryCatalogRepository::new();
        repo.insert_actor(&NewActor::new("A", 1900, "X", "male"))
            .unwrap();

        let mut listed = repo.list_actors().unwrap();
        listed[0].name = "mutated".to_string();
        listed.clear();

        assert_eq!(repo.get_actor(1).unwrap().name, "A");
    }

    #[test]
    fn concurrent_inserts_get_distinct_ids() {
        let repo = InMemoryCatalogRepository::new();
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let repo = repo.clone();
                thread::spawn(move || {
                    repo.insert_actor(&NewActor::new(
                        format!("actor-{index}"),
                        1900 + index,
                        "X",
                        "male",
                    ))
                    .unwrap()
                    .id
                })
            })
            .collect();

        let mut ids: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn update_of_missing_actor_is_not_found() {
        let repo = InMemoryCatalogRepository::new();
        let ghost = NewActor::new("Ghost", 1900, "X", "male").with_id(42);
        let err = repo.update_actor(&ghost).unwrap_err();
        assert!(matches!(err, RepoError::NotFound { id: 42, .. }));
    }
}
