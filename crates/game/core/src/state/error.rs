//! State management errors.
//!
//! Errors related to looking up and registering combatants and items in a
//! [`CombatWorld`](crate::state::CombatWorld).

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, ItemId};

/// Errors that occur during world bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// No combatant with this id exists in the world.
    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    /// No item with this id exists in the world.
    #[error("item {0} not found")]
    UnknownItem(ItemId),

    /// A combatant with this id was already registered.
    #[error("combatant {0} registered twice")]
    DuplicateCombatant(CombatantId),

    /// An item with this id was already registered.
    #[error("item {0} registered twice")]
    DuplicateItem(ItemId),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            UnknownCombatant(_) | UnknownItem(_) => ErrorSeverity::Validation,
            DuplicateCombatant(_) | DuplicateItem(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            UnknownCombatant(_) => "STATE_UNKNOWN_COMBATANT",
            UnknownItem(_) => "STATE_UNKNOWN_ITEM",
            DuplicateCombatant(_) => "STATE_DUPLICATE_COMBATANT",
            DuplicateItem(_) => "STATE_DUPLICATE_ITEM",
        }
    }
}
