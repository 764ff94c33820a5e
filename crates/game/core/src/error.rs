//! Common error infrastructure for combat-core.
//!
//! This module provides shared types and traits used across all error types in
//! the crate. Domain-specific errors (e.g., `LedgerError`, `InvariantViolation`)
//! are defined next to the code that raises them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each module family has its own error enum
//! - **Rich Context**: Errors carry the combatant and tick they relate to
//! - **Severity Classification**: Errors are categorized for recovery strategies

use crate::state::{CombatantId, Tick};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Temporary conditions that may succeed on retry
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors; the tick's mutation batch must not be committed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry the same tick.
    ///
    /// Examples: store temporarily unavailable
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: converting a native item, unknown combatant id
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: staged world references an item the store never minted
    Internal,

    /// Fatal error - staged state is corrupted, the batch is rejected.
    ///
    /// Examples: item both carried and on the ground, target asymmetry
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or corrupted state.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Combatant that triggered the error (if applicable).
    pub actor: Option<CombatantId>,

    /// World tick at the time of error.
    pub tick: Tick,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context for the given tick.
    #[must_use]
    pub const fn new(tick: Tick) -> Self {
        Self {
            actor: None,
            tick,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub const fn with_actor(mut self, actor: CombatantId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(Tick::ZERO)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
