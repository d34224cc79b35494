//! Movie-to-actor link model.

use super::actor::ActorId;
use super::movie::MovieId;
use serde::{Deserialize, Serialize};

/// Full actor-id list recorded for one movie.
///
/// Writes replace the whole list; there is no merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCast {
    pub movie_id: MovieId,
    pub actor_ids: Vec<ActorId>,
}
