//! Service-level error vocabulary.
//!
//! # Invariants
//! - `NotFound`, `AlreadyExists` and `NotExists` pass through from storage
//!   unchanged.
//! - Any other storage failure is wrapped as `Unexpected` with operation
//!   context and keeps the original error as `source()`.

use crate::model::movie::MovieId;
use crate::model::EntityKind;
use crate::repo::contract::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse error class for transport-layer status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FieldsRequired,
    AlreadyExists,
    NotFound,
    NotExists,
    Unexpected,
}

/// Errors from actor/movie service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Required fields are empty or zero.
    FieldsRequired {
        entity: EntityKind,
        missing: Vec<&'static str>,
    },
    /// A field carries an unacceptable value.
    InvalidField { field: &'static str, reason: String },
    /// An equivalent record already exists.
    AlreadyExists(EntityKind),
    /// Target id is absent or a linked id no longer resolves.
    NotFound { entity: EntityKind, id: i64 },
    /// Movie id is absent while writing a cast link.
    NotExists(MovieId),
    /// Storage failed for a reason the caller cannot act on.
    Unexpected { context: String, source: RepoError },
}

impl ServiceError {
    /// Classifies a repository error, attaching `context` when it is wrapped.
    pub(crate) fn from_repo(err: RepoError, context: impl FnOnce() -> String) -> Self {
        match err {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::AlreadyExists(entity) => Self::AlreadyExists(entity),
            RepoError::NotExists(id) => Self::NotExists(id),
            other => Self::Unexpected {
                context: context(),
                source: other,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FieldsRequired { .. } | Self::InvalidField { .. } => ErrorKind::FieldsRequired,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotExists(_) => ErrorKind::NotExists,
            Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldsRequired { entity, missing } => write!(
                f,
                "all required {entity} fields must have values, missing: {}",
                missing.join(", ")
            ),
            Self::InvalidField { field, reason } => write!(f, "invalid `{field}`: {reason}"),
            Self::AlreadyExists(entity) => write!(f, "{entity} already exists"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NotExists(id) => write!(f, "movie doesn't exist: {id}"),
            Self::Unexpected { context, source } => {
                write!(f, "{context}, unexpected error: {source}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unexpected { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::model::EntityKind;
    use crate::repo::contract::RepoError;
    use std::error::Error;

    #[test]
    fn semantic_repo_errors_pass_through() {
        let err = ServiceError::from_repo(
            RepoError::NotFound {
                entity: EntityKind::Actor,
                id: 7,
            },
            || unreachable!("context is only built for wrapped errors"),
        );
        assert!(matches!(err, ServiceError::NotFound { id: 7, .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn storage_failures_are_wrapped_with_context_and_source() {
        let err = ServiceError::from_repo(RepoError::LockPoisoned("list_actors"), || {
            "failed to list actors".to_string()
        });

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().starts_with("failed to list actors"));
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_field_reports_fields_required_kind() {
        let err = ServiceError::InvalidField {
            field: "rating",
            reason: "must be between 1 and 5".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::FieldsRequired);
    }
}
