//! Actor use-case service.
//!
//! # Responsibility
//! - Validate actor payloads before persistence.
//! - Resolve list queries into filter + sort calls on the repository.
//!
//! # Invariants
//! - Create rejects empty fields before probing for duplicates.
//! - Update writes only fields present in the payload, then re-validates the
//!   merged record.
//! - List without explicit sort orders by name ascending.

use crate::model::actor::{Actor, ActorId, ActorUpdate, NewActor};
use crate::model::EntityKind;
use crate::repo::contract::CatalogRepository;
use crate::repo::query::{ActorSortField, SortOrder};
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info, warn};
use serde::Deserialize;

/// List parameters as received from a query string. Empty means unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActorListQuery {
    /// `name` | `country` | `birthdate`.
    pub sort: String,
    /// `asc` | `desc`.
    pub order: String,
    /// Name substring filter.
    pub name: String,
    /// Country-of-birth substring filter.
    pub country: String,
}

/// Actor service facade over a repository handle.
pub struct ActorService<'r, R: CatalogRepository + ?Sized> {
    repo: &'r R,
}

impl<'r, R: CatalogRepository + ?Sized> ActorService<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new actor.
    pub fn create(&self, actor: &NewActor) -> ServiceResult<Actor> {
        validate_actor(actor)?;

        let exists = self
            .repo
            .actor_exists(actor)
            .map_err(|err| ServiceError::from_repo(err, || "failed to probe actor".to_string()))?;
        if exists {
            warn!("event=actor_create module=service status=rejected reason=already_exists");
            return Err(ServiceError::AlreadyExists(EntityKind::Actor));
        }

        let created = self
            .repo
            .insert_actor(actor)
            .map_err(|err| ServiceError::from_repo(err, || "failed to insert actor".to_string()))?;
        info!(
            "event=actor_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    pub fn get(&self, id: ActorId) -> ServiceResult<Actor> {
        self.repo
            .get_actor(id)
            .map_err(|err| ServiceError::from_repo(err, || format!("failed to find actor {id}")))
    }

    /// Applies a partial update and returns the stored result.
    pub fn update(&self, id: ActorId, update: &ActorUpdate) -> ServiceResult<Actor> {
        let mut actor = self.get(id)?;
        update.apply_to(&mut actor);
        validate_actor(&actor.to_new())?;

        self.repo
            .update_actor(&actor)
            .map_err(|err| ServiceError::from_repo(err, || format!("failed to update actor {id}")))?;
        info!("event=actor_update module=service status=ok id={id}");
        Ok(actor)
    }

    pub fn delete(&self, id: ActorId) -> ServiceResult<()> {
        self.get(id)?;
        self.repo
            .delete_actor(id)
            .map_err(|err| ServiceError::from_repo(err, || format!("failed to delete actor {id}")))?;
        info!("event=actor_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Filters (name OR country) then sorts, defaulting to name ascending.
    pub fn list(&self, query: &ActorListQuery) -> ServiceResult<Vec<Actor>> {
        let (field, order) = resolve_actor_sort(query);
        let actors = self
            .repo
            .filter_actors(query.name.as_str(), query.country.as_str())
            .map_err(|err| ServiceError::from_repo(err, || "failed to list actors".to_string()))?;
        match field {
            Some(field) => Ok(self.repo.sort_actors(field, order, actors)),
            None => {
                debug!(
                    "event=actor_list module=service status=unsorted sort={}",
                    query.sort
                );
                Ok(actors)
            }
        }
    }
}

fn validate_actor(actor: &NewActor) -> ServiceResult<()> {
    let missing = actor.missing_fields();
    if !missing.is_empty() {
        return Err(ServiceError::FieldsRequired {
            entity: EntityKind::Actor,
            missing,
        });
    }
    Ok(())
}

/// Empty `sort` means name; an unknown name leaves storage order (`None`).
fn resolve_actor_sort(query: &ActorListQuery) -> (Option<ActorSortField>, SortOrder) {
    let field = if query.sort.is_empty() {
        Some(ActorSortField::Name)
    } else {
        ActorSortField::from_query(&query.sort)
    };
    (field, SortOrder::from_query(&query.order))
}

#[cfg(test)]
mod tests {
    use super::{resolve_actor_sort, ActorListQuery};
    use crate::repo::query::{ActorSortField, SortOrder};

    #[test]
    fn order_without_field_still_sorts_by_name() {
        let query = ActorListQuery {
            order: "desc".to_string(),
            ..ActorListQuery::default()
        };
        assert_eq!(
            resolve_actor_sort(&query),
            (Some(ActorSortField::Name), SortOrder::Desc)
        );
    }

    #[test]
    fn unknown_sort_field_leaves_list_unsorted() {
        let query = ActorListQuery {
            sort: "height".to_string(),
            order: "up".to_string(),
            ..ActorListQuery::default()
        };
        assert_eq!(resolve_actor_sort(&query), (None, SortOrder::Desc));
    }
}
