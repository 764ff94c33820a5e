//! In-memory store implementations for tests and local sessions.

mod combatant;
mod event;
mod item;

pub use combatant::InMemoryCombatantStore;
pub use event::InMemoryEventLog;
pub use item::InMemoryItemStore;
