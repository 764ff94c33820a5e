//! Session runtime for the deterministic combat core.
//!
//! This crate supplies what `combat-core` leaves to its host: store
//! implementations for the item and combatant contracts, an audit log that
//! keeps the committed event stream, and a [`CombatSession`] that resolves
//! ticks and commits their intent batches.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the tick loop and its builder
//! - [`repository`] provides the store and log adapters
//! - [`error`] wraps core failures for session callers
pub mod error;
pub mod repository;
pub mod session;

pub use error::{Result, RuntimeError};
pub use repository::{InMemoryCombatantStore, InMemoryEventLog, InMemoryItemStore};
pub use session::{CombatSession, SessionBuilder, TickReport};
