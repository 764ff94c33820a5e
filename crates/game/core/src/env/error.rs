//! Oracle access errors.
//!
//! Errors related to oracle availability and data access.

use crate::env::SpeciesId;
use crate::error::{ErrorSeverity, GameError};
use crate::state::ItemHandle;

/// Errors that occur when accessing oracle data.
///
/// A missing oracle is fatal: the engine cannot resolve a tick without the
/// item catalog, species table, or roll source. A missing *entry* is not an
/// error for combat math (it degrades to a default), but lookups that must
/// succeed report it as a validation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ItemOracle is not available in the environment.
    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    /// SpeciesOracle is not available in the environment.
    #[error("SpeciesOracle not available")]
    SpeciesNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,

    /// Item definition was not found by handle.
    #[error("item definition {0:?} not found")]
    ItemNotFound(ItemHandle),

    /// Species profile was not found by id.
    #[error("species profile {0} not found")]
    SpeciesNotFound(SpeciesId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            ItemsNotAvailable | SpeciesNotAvailable | RngNotAvailable => ErrorSeverity::Fatal,
            ItemNotFound(_) | SpeciesNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            SpeciesNotAvailable => "ORACLE_SPECIES_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            SpeciesNotFound(_) => "ORACLE_SPECIES_NOT_FOUND",
        }
    }
}
