//! Catalog domain model for actors, movies and their cast links.
//!
//! # Responsibility
//! - Define canonical entity records shared by every storage backend.
//! - Provide partial-update payloads with "present fields only" semantics.
//! - Own the duplicate-probe matching rule so backends cannot drift apart.
//!
//! # Invariants
//! - Entity ids are assigned by storage and never reused after delete.
//! - A `0`/empty value means "unset" for every required descriptive field.

pub mod actor;
pub mod cast;
pub mod movie;

use std::fmt::{Display, Formatter};

/// Entity family used in error payloads and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Actor,
    Movie,
    /// Actor list linked to one movie.
    Cast,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Movie => "movie",
            Self::Cast => "movie cast",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns whether a stored text field matches a probe value.
///
/// Stored text must contain the probe; an empty probe matches anything.
pub(crate) fn text_matches(stored: &str, probe: &str) -> bool {
    stored.contains(probe)
}
