//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `catalog_core` wiring: config, logging, backend bootstrap.
//! - Print one deterministic summary line for quick local sanity checks.

use catalog_core::{
    core_version, init_logging, ActorListQuery, ActorService, CatalogConfig, CatalogStore,
    MovieListQuery, MovieService,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("catalog_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, String> {
    let config = CatalogConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let store = CatalogStore::open(&config).map_err(|err| err.to_string())?;
    let repo = store.repository().map_err(|err| err.to_string())?;
    let actors = ActorService::new(repo.as_ref())
        .list(&ActorListQuery::default())
        .map_err(|err| err.to_string())?;
    let movies = MovieService::new(repo.as_ref())
        .list(&MovieListQuery::default())
        .map_err(|err| err.to_string())?;

    log::info!(
        "event=cli_summary module=cli status=ok backend={}",
        config.backend.name()
    );
    Ok(format!(
        "catalog_core version={} backend={} actors={} movies={}",
        core_version(),
        config.backend.name(),
        actors.len(),
        movies.len()
    ))
}
