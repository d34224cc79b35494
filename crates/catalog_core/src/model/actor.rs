//! Actor domain model.
//!
//! # Invariants
//! - `id` is assigned once by the repository and stays immutable.
//! - `NewActor` carries every descriptive field required at creation.

use super::text_matches;
use serde::{Deserialize, Serialize};

/// Storage-assigned actor identity.
pub type ActorId = i64;

/// Creation payload for an actor. Identity is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewActor {
    pub name: String,
    pub birth_year: i32,
    pub country_of_birth: String,
    pub gender: String,
}

/// Persisted actor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub birth_year: i32,
    pub country_of_birth: String,
    pub gender: String,
}

/// Partial update payload. Only `Some` fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActorUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_birth: Option<String>,
    /// Older clients send this field as `sex`.
    #[serde(default, alias = "sex", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl NewActor {
    pub fn new(
        name: impl Into<String>,
        birth_year: i32,
        country_of_birth: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            birth_year,
            country_of_birth: country_of_birth.into(),
            gender: gender.into(),
        }
    }

    /// Binds a storage-assigned id to this payload.
    pub fn with_id(self, id: ActorId) -> Actor {
        Actor {
            id,
            name: self.name,
            birth_year: self.birth_year,
            country_of_birth: self.country_of_birth,
            gender: self.gender,
        }
    }

    /// Lists required fields that are empty or zero.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.birth_year == 0 {
            missing.push("birth_year");
        }
        if self.country_of_birth.trim().is_empty() {
            missing.push("country_of_birth");
        }
        if self.gender.trim().is_empty() {
            missing.push("gender");
        }
        missing
    }
}

impl Actor {
    /// Returns whether this stored actor is equivalent to `probe`.
    ///
    /// Text fields use containment, birth year must be equal.
    pub fn matches(&self, probe: &NewActor) -> bool {
        text_matches(&self.name, &probe.name)
            && self.birth_year == probe.birth_year
            && text_matches(&self.country_of_birth, &probe.country_of_birth)
            && text_matches(&self.gender, &probe.gender)
    }

    /// Strips identity, e.g. to re-validate an updated record.
    pub fn to_new(&self) -> NewActor {
        NewActor {
            name: self.name.clone(),
            birth_year: self.birth_year,
            country_of_birth: self.country_of_birth.clone(),
            gender: self.gender.clone(),
        }
    }
}

impl ActorUpdate {
    /// Overwrites fields of `actor` that are present in this payload.
    pub fn apply_to(&self, actor: &mut Actor) {
        if let Some(name) = &self.name {
            actor.name = name.clone();
        }
        if let Some(birth_year) = self.birth_year {
            actor.birth_year = birth_year;
        }
        if let Some(country) = &self.country_of_birth {
            actor.country_of_birth = country.clone();
        }
        if let Some(gender) = &self.gender {
            actor.gender = gender.clone();
        }
    }
}
