//! Errors surfaced by the session API.

use combat_core::{CombatantId, DigestError, SpeciesId, StateError, TickError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Tick(#[from] TickError),

    #[error("failed to seed the combat world")]
    Seed(#[source] StateError),

    #[error("monster {monster} belongs to unknown {species}")]
    UnknownSpecies {
        monster: CombatantId,
        species: SpeciesId,
    },

    #[error("session world has no player")]
    MissingPlayer,

    #[error("failed to digest the event log")]
    Digest(#[from] DigestError),
}

impl RuntimeError {
    /// True when a tick failed before any store was written.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Tick(error) if !matches!(error, TickError::Store(_)))
    }
}
