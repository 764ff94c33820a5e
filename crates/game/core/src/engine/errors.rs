//! Error types for tick resolution.

use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{CombatantId, InvariantViolation, Position, StateError, Tick};
use crate::store::StoreError;

/// Identifies which stage of a tick produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TickPhase {
    /// Reading oracles and the starting snapshot.
    Snapshot,
    /// Staging the tick's mutations.
    Resolve,
    /// Checking invariants and writing the batch.
    Commit,
}

/// A player action that cannot be carried out.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("{0} is not a monster")]
    NotAMonster(CombatantId),

    #[error("{0} is already dead")]
    TargetDead(CombatantId),

    #[error("{target} is not at {position}")]
    TargetAbsent {
        target: CombatantId,
        position: Position,
    },

    #[error("the player has no target in reach")]
    NotEngaged,

    #[error("the player is dead")]
    PlayerDead,
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAMonster(_) => "ACTION_NOT_A_MONSTER",
            Self::TargetDead(_) => "ACTION_TARGET_DEAD",
            Self::TargetAbsent { .. } => "ACTION_TARGET_ABSENT",
            Self::NotEngaged => "ACTION_NOT_ENGAGED",
            Self::PlayerDead => "ACTION_PLAYER_DEAD",
        }
    }
}

/// Errors surfaced while resolving or committing a tick.
///
/// Nothing is written to the stores when any of these is returned from
/// resolution; a commit error leaves the caller's snapshot untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickError {
    #[error("snapshot failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("{phase} failed: {error}")]
    State { phase: TickPhase, error: StateError },

    #[error("action rejected: {error}")]
    Action {
        error: ActionError,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("commit rejected: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("commit failed: {0}")]
    Store(#[from] StoreError),
}

impl TickError {
    pub fn state(phase: TickPhase, error: StateError) -> Self {
        Self::State { phase, error }
    }

    /// Rejects the player's action for `tick`.
    pub fn rejected(error: ActionError, tick: Tick) -> Self {
        Self::Action {
            error,
            context: ErrorContext::new(tick)
                .with_actor(CombatantId::PLAYER)
                .with_message("player action rejected"),
        }
    }

    pub fn phase(&self) -> TickPhase {
        match self {
            Self::Oracle(_) => TickPhase::Snapshot,
            Self::State { phase, .. } => *phase,
            Self::Action { .. } => TickPhase::Resolve,
            Self::Invariant(_) | Self::Store(_) => TickPhase::Commit,
        }
    }
}

impl GameError for TickError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(error) => error.severity(),
            Self::State { error, .. } => error.severity(),
            Self::Action { error, .. } => error.severity(),
            Self::Invariant(error) => error.severity(),
            Self::Store(error) => error.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Action { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(error) => error.error_code(),
            Self::State { error, .. } => error.error_code(),
            Self::Action { error, .. } => error.error_code(),
            Self::Invariant(error) => error.error_code(),
            Self::Store(error) => error.error_code(),
        }
    }
}
