use catalog_core::config::SQLITE_MEMORY_PATH;
use catalog_core::db::open_db_in_memory;
use catalog_core::{
    ActorListQuery, ActorService, ActorUpdate, BackendKind, CatalogConfig, CatalogRepository,
    CatalogStore, EntityKind, ErrorKind, InMemoryCatalogRepository, MovieListQuery, MovieService,
    MovieUpdate, NewActor, NewMovie, ReleaseDate, ServiceError, SqliteCatalogRepository,
};
use std::path::PathBuf;

fn with_each_backend(check: impl Fn(&dyn CatalogRepository)) {
    let memory = InMemoryCatalogRepository::new();
    check(&memory);

    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteCatalogRepository::try_new(&conn).unwrap();
    check(&sqlite);
}

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| name(item).to_string()).collect()
}

#[test]
fn catalog_walkthrough_links_and_reads_back_cast() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        let movies = MovieService::new(repo);

        let lol = actors
            .create(&NewActor::new("Lol", 1909, "Sos", "female"))
            .unwrap();
        let kek = actors
            .create(&NewActor::new("Kek", 2012, "Lock", "male"))
            .unwrap();
        let movie = movies
            .create(&NewMovie::new(
                "Cheburek",
                ReleaseDate::new(1, 2, 1905),
                "Klkd",
                "strashno",
                5,
            ))
            .unwrap();
        assert_eq!((lol.id, kek.id, movie.id), (1, 2, 1));

        let cast = movies.create_actors_for_movie(movie.id, &[1, 2]).unwrap();
        assert_eq!(cast.actor_ids, vec![1, 2]);

        let mut linked = movies.get_actors_by_movie(movie.id).unwrap();
        linked.sort_by_key(|actor| actor.id);
        assert_eq!(linked, vec![lol, kek]);
    });
}

#[test]
fn create_with_missing_fields_is_rejected_and_not_stored() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        let movies = MovieService::new(repo);

        let err = actors
            .create(&NewActor::new("Lol", 0, "  ", "female"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldsRequired);
        match err {
            ServiceError::FieldsRequired { entity, missing } => {
                assert_eq!(entity, EntityKind::Actor);
                assert_eq!(missing.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = movies
            .create(&NewMovie::new("Cheburek", ReleaseDate::new(1, 2, 1905), "Klkd", "", 5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldsRequired);

        assert!(repo.list_actors().unwrap().is_empty());
        assert!(repo.list_movies().unwrap().is_empty());
    });
}

#[test]
fn movie_rating_and_date_are_range_checked() {
    with_each_backend(|repo| {
        let movies = MovieService::new(repo);

        let err = movies
            .create(&NewMovie::new("Loud", ReleaseDate::new(1, 2, 1905), "Klkd", "drama", 6))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidField { field: "rating", .. }));
        assert_eq!(err.kind(), ErrorKind::FieldsRequired);

        let err = movies
            .create(&NewMovie::new("Odd", ReleaseDate::new(1, 13, 1905), "Klkd", "drama", 3))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldsRequired);
        assert!(repo.list_movies().unwrap().is_empty());
    });
}

#[test]
fn duplicate_create_reports_already_exists() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        actors
            .create(&NewActor::new("Lolita", 1909, "Sostra", "female"))
            .unwrap();

        let err = actors
            .create(&NewActor::new("Lol", 1909, "Sos", "female"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(err.to_string(), "actor already exists");
        assert_eq!(repo.list_actors().unwrap().len(), 1);
    });
}

#[test]
fn list_defaults_to_name_ascending_and_desc_keeps_ties_stable() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        actors
            .create(&NewActor::new("Zed", 1980, "Peru", "male"))
            .unwrap();
        actors
            .create(&NewActor::new("Amy", 1990, "Chad", "female"))
            .unwrap();
        actors
            .create(&NewActor::new("Bob", 1980, "Mali", "male"))
            .unwrap();

        let listed = actors.list(&ActorListQuery::default()).unwrap();
        assert_eq!(names(&listed, |actor| actor.name.as_str()), vec!["Amy", "Bob", "Zed"]);

        let query = ActorListQuery {
            sort: "birthdate".to_string(),
            order: "desc".to_string(),
            ..ActorListQuery::default()
        };
        let listed = actors.list(&query).unwrap();
        assert_eq!(names(&listed, |actor| actor.name.as_str()), vec!["Amy", "Zed", "Bob"]);
    });
}

#[test]
fn list_filters_then_sorts() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        actors
            .create(&NewActor::new("Mabel", 1950, "Sweden", "female"))
            .unwrap();
        actors
            .create(&NewActor::new("Kek", 1960, "Norway", "male"))
            .unwrap();
        actors
            .create(&NewActor::new("Abby", 1970, "Chile", "female"))
            .unwrap();

        let query = ActorListQuery {
            name: "ab".to_string(),
            country: "Nor".to_string(),
            ..ActorListQuery::default()
        };
        let listed = actors.list(&query).unwrap();
        assert_eq!(names(&listed, |actor| actor.name.as_str()), vec!["Kek", "Mabel"]);
    });
}

#[test]
fn movie_list_sorts_release_dates_chronologically() {
    with_each_backend(|repo| {
        let movies = MovieService::new(repo);
        movies
            .create(&NewMovie::new("Later", ReleaseDate::new(1, 1, 2000), "x", "drama", 3))
            .unwrap();
        movies
            .create(&NewMovie::new("Earlier", ReleaseDate::new(31, 12, 1999), "x", "drama", 3))
            .unwrap();

        let query = MovieListQuery {
            sort: "date".to_string(),
            ..MovieListQuery::default()
        };
        let listed = movies.list(&query).unwrap();
        assert_eq!(names(&listed, |movie| movie.name.as_str()), vec!["Earlier", "Later"]);
    });
}

#[test]
fn unrecognized_order_sorts_descending_and_unknown_field_keeps_storage_order() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        actors
            .create(&NewActor::new("Bob", 1980, "Mali", "male"))
            .unwrap();
        actors
            .create(&NewActor::new("Zed", 1970, "Peru", "male"))
            .unwrap();
        actors
            .create(&NewActor::new("Amy", 1990, "Chad", "female"))
            .unwrap();

        let query = ActorListQuery {
            order: "DESC".to_string(),
            ..ActorListQuery::default()
        };
        let listed = actors.list(&query).unwrap();
        assert_eq!(
            names(&listed, |actor| actor.name.as_str()),
            vec!["Zed", "Bob", "Amy"]
        );

        let query = ActorListQuery {
            sort: "id".to_string(),
            order: "desc".to_string(),
            ..ActorListQuery::default()
        };
        let listed = actors.list(&query).unwrap();
        assert_eq!(
            names(&listed, |actor| actor.name.as_str()),
            vec!["Bob", "Zed", "Amy"]
        );

        let movies = MovieService::new(repo);
        movies
            .create(&NewMovie::new("Later", ReleaseDate::new(1, 1, 2000), "x", "drama", 3))
            .unwrap();
        movies
            .create(&NewMovie::new("Earlier", ReleaseDate::new(31, 12, 1999), "x", "drama", 3))
            .unwrap();
        let query = MovieListQuery {
            sort: "budget".to_string(),
            ..MovieListQuery::default()
        };
        let listed = movies.list(&query).unwrap();
        assert_eq!(
            names(&listed, |movie| movie.name.as_str()),
            vec!["Later", "Earlier"]
        );
    });
}

#[test]
fn partial_update_keeps_untouched_fields() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        let created = actors
            .create(&NewActor::new("Lol", 1909, "Sos", "female"))
            .unwrap();

        let update = ActorUpdate {
            country_of_birth: Some("Narnia".to_string()),
            ..ActorUpdate::default()
        };
        let updated = actors.update(created.id, &update).unwrap();
        assert_eq!(updated.name, "Lol");
        assert_eq!(updated.country_of_birth, "Narnia");
        assert_eq!(actors.get(created.id).unwrap(), updated);

        let blanking = ActorUpdate {
            name: Some(String::new()),
            ..ActorUpdate::default()
        };
        let err = actors.update(created.id, &blanking).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldsRequired);
        assert_eq!(actors.get(created.id).unwrap().name, "Lol");

        let movies = MovieService::new(repo);
        let movie = movies
            .create(&NewMovie::new("Cheburek", ReleaseDate::new(1, 2, 1905), "Klkd", "strashno", 5))
            .unwrap();
        let update = MovieUpdate {
            rating: Some(2),
            ..MovieUpdate::default()
        };
        assert_eq!(movies.update(movie.id, &update).unwrap().rating, 2);
    });
}

#[test]
fn missing_ids_surface_not_found() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        let movies = MovieService::new(repo);

        assert_eq!(actors.get(7).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(
            actors
                .update(7, &ActorUpdate::default())
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(actors.delete(7).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(movies.delete(7).unwrap_err().kind(), ErrorKind::NotFound);

        let created = actors
            .create(&NewActor::new("Lol", 1909, "Sos", "female"))
            .unwrap();
        actors.delete(created.id).unwrap();
        assert_eq!(
            actors.get(created.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    });
}

#[test]
fn cast_errors_map_to_service_kinds() {
    with_each_backend(|repo| {
        let actors = ActorService::new(repo);
        let movies = MovieService::new(repo);
        actors
            .create(&NewActor::new("Lol", 1909, "Sos", "female"))
            .unwrap();
        let movie = movies
            .create(&NewMovie::new("Cheburek", ReleaseDate::new(1, 2, 1905), "Klkd", "strashno", 5))
            .unwrap();

        let err = movies.create_actors_for_movie(99, &[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotExists);
        assert_eq!(err.to_string(), "movie doesn't exist: 99");

        let err = movies.create_actors_for_movie(movie.id, &[1, 5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = movies.get_actors_by_movie(movie.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    });
}

#[test]
fn payloads_decode_from_json() {
    let update: ActorUpdate = serde_json::from_str(r#"{"name":"Kek","sex":"male"}"#).unwrap();
    assert_eq!(update.name.as_deref(), Some("Kek"));
    assert_eq!(update.gender.as_deref(), Some("male"));
    assert_eq!(update.birth_year, None);

    let movie: NewMovie = serde_json::from_str(
        r#"{
            "name": "Cheburek",
            "release_date": {"date": 1, "month": 2, "year": 1905},
            "country": "Klkd",
            "genre": "strashno",
            "rating": 5
        }"#,
    )
    .unwrap();
    assert_eq!(movie.release_date, ReleaseDate::new(1, 2, 1905));

    let query: MovieListQuery = serde_json::from_str(r#"{"sort":"date"}"#).unwrap();
    assert_eq!(query.sort, "date");
    assert!(query.order.is_empty());
}

#[test]
fn store_serves_services_for_configured_backend() {
    let configs = [
        CatalogConfig::default(),
        CatalogConfig {
            backend: BackendKind::Sqlite {
                db_path: PathBuf::from(SQLITE_MEMORY_PATH),
            },
            ..CatalogConfig::default()
        },
    ];

    for config in &configs {
        let store = CatalogStore::open(config).unwrap();
        let repo = store.repository().unwrap();
        ActorService::new(repo.as_ref())
            .create(&NewActor::new("Lol", 1909, "Sos", "female"))
            .unwrap();

        let again = store.repository().unwrap();
        let listed = ActorService::new(again.as_ref())
            .list(&ActorListQuery::default())
            .unwrap();
        assert_eq!(listed.len(), 1, "backend={}", config.backend.name());
    }
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CatalogConfig {
        backend: BackendKind::Sqlite {
            db_path: dir.path().join("catalog.sqlite3"),
        },
        ..CatalogConfig::default()
    };

    {
        let store = CatalogStore::open(&config).unwrap();
        let repo = store.repository().unwrap();
        MovieService::new(repo.as_ref())
            .create(&NewMovie::new("Cheburek", ReleaseDate::new(1, 2, 1905), "Klkd", "strashno", 5))
            .unwrap();
    }

    let store = CatalogStore::open(&config).unwrap();
    let repo = store.repository().unwrap();
    let movie = MovieService::new(repo.as_ref()).get(1).unwrap();
    assert_eq!(movie.name, "Cheburek");
}
