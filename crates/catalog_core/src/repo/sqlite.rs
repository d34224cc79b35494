//! SQLite catalog backend.
//!
//! # Responsibility
//! - Map the catalog contract onto `actors`, `movies` and `movie_actors`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `AUTOINCREMENT` ids are never handed out twice, even after delete.
//! - Release dates are stored as `YYYY-MM-DD`, so text order is chronological.
//! - A cast write replaces all rows of one movie inside a single transaction.
//! - A missing row on lookup, update or delete becomes `NotFound`; any other
//!   SQLite failure is surfaced as `RepoError::Db` unchanged.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::actor::{Actor, ActorId, NewActor};
use crate::model::cast::MovieCast;
use crate::model::movie::{Movie, MovieId, NewMovie, ReleaseDate};
use crate::model::EntityKind;
use crate::repo::contract::{CatalogRepository, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const ACTOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_year,
    country_of_birth,
    gender
FROM actors";

const MOVIE_SELECT_SQL: &str = "SELECT
    id,
    name,
    release_date,
    country,
    genre,
    rating
FROM movies";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "actors",
        &["id", "name", "birth_year", "country_of_birth", "gender"],
    ),
    (
        "movies",
        &["id", "name", "release_date", "country", "genre", "rating"],
    ),
    ("movie_actors", &["movie_id", "position", "actor_id"]),
];

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections whose schema version or table layout does not
    /// match this binary.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_actors(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<Vec<Actor>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut actors = Vec::new();
        while let Some(row) = rows.next()? {
            actors.push(parse_actor_row(row)?);
        }
        Ok(actors)
    }

    fn query_movies(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<Vec<Movie>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut movies = Vec::new();
        while let Some(row) = rows.next()? {
            movies.push(parse_movie_row(row)?);
        }
        Ok(movies)
    }

    fn row_exists(&self, table: &'static str, id: i64) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn insert_actor(&self, actor: &NewActor) -> RepoResult<Actor> {
        if self.actor_exists(actor)? {
            return Err(RepoError::AlreadyExists(EntityKind::Actor));
        }

        self.conn.execute(
            "INSERT INTO actors (
                name,
                birth_year,
                country_of_birth,
                gender
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                actor.name.as_str(),
                actor.birth_year,
                actor.country_of_birth.as_str(),
                actor.gender.as_str(),
            ],
        )?;

        let created = actor.clone().with_id(self.conn.last_insert_rowid());
        debug!(
            "event=actor_insert module=repo backend=sqlite status=ok id={}",
            created.id
        );
        Ok(created)
    }

    fn actor_exists(&self, probe: &NewActor) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM actors
                WHERE (?1 = '' OR instr(name, ?1) > 0)
                  AND birth_year = ?2
                  AND (?3 = '' OR instr(country_of_birth, ?3) > 0)
                  AND (?4 = '' OR instr(gender, ?4) > 0)
            );",
            params![
                probe.name.as_str(),
                probe.birth_year,
                probe.country_of_birth.as_str(),
                probe.gender.as_str(),
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_actor(&self, id: ActorId) -> RepoResult<Actor> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_actor_row(row);
        }
        Err(RepoError::not_found(EntityKind::Actor, id))
    }

    fn update_actor(&self, actor: &Actor) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE actors
             SET
                name = ?1,
                birth_year = ?2,
                country_of_birth = ?3,
                gender = ?4
             WHERE id = ?5;",
            params![
                actor.name.as_str(),
                actor.birth_year,
                actor.country_of_birth.as_str(),
                actor.gender.as_str(),
                actor.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Actor, actor.id));
        }
        Ok(())
    }

    fn delete_actor(&self, id: ActorId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM actors WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Actor, id));
        }
        Ok(())
    }

    fn list_actors(&self) -> RepoResult<Vec<Actor>> {
        self.query_actors(&format!("{ACTOR_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn filter_actors(&self, name: &str, country: &str) -> RepoResult<Vec<Actor>> {
        if name.is_empty() && country.is_empty() {
            return self.list_actors();
        }
        self.query_actors(
            &format!(
                "{ACTOR_SELECT_SQL}
                 WHERE (?1 <> '' AND instr(name, ?1) > 0)
                    OR (?2 <> '' AND instr(country_of_birth, ?2) > 0)
                 ORDER BY id ASC;"
            ),
            params![name, country],
        )
    }

    fn insert_movie(&self, movie: &NewMovie) -> RepoResult<Movie> {
        if self.movie_exists(movie)? {
            return Err(RepoError::AlreadyExists(EntityKind::Movie));
        }

        self.conn.execute(
            "INSERT INTO movies (
                name,
                release_date,
                country,
                genre,
                rating
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                movie.name.as_str(),
                movie.release_date.to_string(),
                movie.country.as_str(),
                movie.genre.as_str(),
                movie.rating,
            ],
        )?;

        let created = movie.clone().with_id(self.conn.last_insert_rowid());
        debug!(
            "event=movie_insert module=repo backend=sqlite status=ok id={}",
            created.id
        );
        Ok(created)
    }

    fn movie_exists(&self, probe: &NewMovie) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM movies
                WHERE (?1 = '' OR instr(name, ?1) > 0)
                  AND release_date = ?2
                  AND (?3 = '' OR instr(country, ?3) > 0)
                  AND (?4 = '' OR instr(genre, ?4) > 0)
                  AND rating = ?5
            );",
            params![
                probe.name.as_str(),
                probe.release_date.to_string(),
                probe.country.as_str(),
                probe.genre.as_str(),
                probe.rating,
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Movie> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOVIE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_movie_row(row);
        }
        Err(RepoError::not_found(EntityKind::Movie, id))
    }

    fn update_movie(&self, movie: &Movie) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE movies
             SET
                name = ?1,
                release_date = ?2,
                country = ?3,
                genre = ?4,
                rating = ?5
             WHERE id = ?6;",
            params![
                movie.name.as_str(),
                movie.release_date.to_string(),
                movie.country.as_str(),
                movie.genre.as_str(),
                movie.rating,
                movie.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Movie, movie.id));
        }
        Ok(())
    }

    fn delete_movie(&self, id: MovieId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM movies WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Movie, id));
        }
        Ok(())
    }

    fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        self.query_movies(&format!("{MOVIE_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn filter_movies(&self, name: &str, genre: &str) -> RepoResult<Vec<Movie>> {
        if name.is_empty() && genre.is_empty() {
            return self.list_movies();
        }
        self.query_movies(
            &format!(
                "{MOVIE_SELECT_SQL}
                 WHERE (?1 <> '' AND instr(name, ?1) > 0)
                    OR (?2 <> '' AND instr(genre, ?2) > 0)
                 ORDER BY id ASC;"
            ),
            params![name, genre],
        )
    }

    fn get_actors_by_movie(&self, movie_id: MovieId) -> RepoResult<Vec<Actor>> {
        if !self.row_exists("movies", movie_id)? {
            return Err(RepoError::not_found(EntityKind::Movie, movie_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT
                ma.actor_id AS linked_id,
                a.id,
                a.name,
                a.birth_year,
                a.country_of_birth,
                a.gender
             FROM movie_actors ma
             LEFT JOIN actors a ON a.id = ma.actor_id
             WHERE ma.movie_id = ?1
             ORDER BY ma.position ASC;",
        )?;
        let mut rows = stmt.query([movie_id])?;
        let mut actors = Vec::new();
        while let Some(row) = rows.next()? {
            let resolved: Option<ActorId> = row.get("id")?;
            if resolved.is_none() {
                let linked_id: ActorId = row.get("linked_id")?;
                return Err(RepoError::not_found(EntityKind::Actor, linked_id));
            }
            actors.push(parse_actor_row(row)?);
        }

        if actors.is_empty() {
            return Err(RepoError::not_found(EntityKind::Cast, movie_id));
        }
        Ok(actors)
    }

    fn create_actors_by_movie(
        &self,
        movie_id: MovieId,
        actor_ids: &[ActorId],
    ) -> RepoResult<MovieCast> {
        if !self.row_exists("movies", movie_id)? {
            return Err(RepoError::NotExists(movie_id));
        }
        for actor_id in actor_ids {
            if !self.row_exists("actors", *actor_id)? {
                return Err(RepoError::not_found(EntityKind::Actor, *actor_id));
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM movie_actors WHERE movie_id = ?1;", [movie_id])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO movie_actors (movie_id, position, actor_id)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (position, actor_id) in actor_ids.iter().enumerate() {
                insert.execute(params![movie_id, position as i64, actor_id])?;
            }
        }
        tx.commit()?;

        debug!(
            "event=cast_replace module=repo backend=sqlite status=ok movie_id={movie_id} actor_count={}",
            actor_ids.len()
        );
        Ok(MovieCast {
            movie_id,
            actor_ids: actor_ids.to_vec(),
        })
    }
}

fn parse_actor_row(row: &Row<'_>) -> RepoResult<Actor> {
    Ok(Actor {
        id: row.get("id")?,
        name: row.get("name")?,
        birth_year: row.get("birth_year")?,
        country_of_birth: row.get("country_of_birth")?,
        gender: row.get("gender")?,
    })
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    let date_text: String = row.get("release_date")?;
    let release_date = ReleaseDate::parse(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid release date `{date_text}` in movies.release_date"
        ))
    })?;

    let rating: i64 = row.get("rating")?;
    let rating = u8::try_from(rating).map_err(|_| {
        RepoError::InvalidData(format!("invalid rating `{rating}` in movies.rating"))
    })?;

    Ok(Movie {
        id: row.get("id")?,
        name: row.get("name")?,
        release_date,
        country: row.get("country")?,
        genre: row.get("genre")?,
        rating,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
