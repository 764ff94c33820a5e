//! Deterministic combat resolution and monster decision making.
//!
//! `combat-core` holds the canonical rules for one tick of a turn-based
//! adventure: strike resolution, equipment wear, the ion ledger, death loot,
//! and the monster priority cascade. Everything is pure: randomness comes
//! from an injected [`env::RngOracle`], catalog data from read-only oracles,
//! and persistence from the [`store`] contracts the runtime implements.
//!
//! All state changes flow through [`engine::TurnOrchestrator::resolve`],
//! which stages a tick on a cloned [`CombatWorld`] and hands back the
//! events, rolls and the [`IntentBatch`] that commits it.
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod ledger;
pub mod loot;
pub mod state;
pub mod store;

pub use ai::{CascadeDecision, Gate, GateRecord, GateThresholds, SkipReason};
pub use combat::{AttackOutcome, AttackPlan, AttackResult, AttackSource, WearOutcome};
pub use config::CombatConfig;
pub use engine::{ActionError, PlayerAction, TickError, TickInput, TickOutcome, TickPhase, TurnOrchestrator};
pub use env::{
    CombatEnv, Dice, Env, GateOverrides, ItemCatalog, ItemDefinition, ItemKind, ItemOracle,
    OracleError, PcgRng, RngOracle, RollPurpose, RollRecord, ScriptedRng, SpeciesId,
    SpeciesOracle, SpeciesProfile, SpeciesTable,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
#[cfg(feature = "serde")]
pub use event::{DigestError, compute_events_root};
pub use event::{CombatEvent, EventKind, EventPayload, EventSink};
pub use ledger::LedgerError;
pub use loot::{DeathRecord, LootEntry, LootOutcome, LootReport};
pub use state::{
    AiBehavior, Combatant, CombatantId, CombatantKind, CombatWorld, InvariantViolation, ItemHandle,
    ItemId, ItemInstance, Origin, Placement, Position, ResourceMeter, StateError, StatusEffect,
    StatusKind, Tick,
};
pub use store::{
    CombatantStore, Destination, IdRemap, Intent, IntentBatch, ItemStore, StoreError, commit_batch,
};
