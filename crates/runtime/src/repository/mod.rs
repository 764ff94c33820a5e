//! Implementations of the combat core's store and sink contracts.
//!
//! The core only defines [`combat_core::ItemStore`],
//! [`combat_core::CombatantStore`] and [`combat_core::EventSink`]; durable
//! backends plug in here alongside the in-memory ones.

pub mod memory;

pub use memory::{InMemoryCombatantStore, InMemoryEventLog, InMemoryItemStore};

use combat_core::StoreError;

/// Maps a poisoned lock to the store contract's transient failure.
pub(crate) fn poisoned(store: &'static str) -> StoreError {
    StoreError::Unavailable(format!("{store} lock was poisoned"))
}
