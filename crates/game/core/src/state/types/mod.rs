pub mod combatant;
pub mod common;
pub mod item;
pub mod status;

pub use combatant::{
    AbilityScores, AiBehavior, Combatant, CombatantKind, InnateAttack, PendingDrop,
};
pub use common::{CombatantId, ItemId, Position, ResourceMeter, Tick};
pub use item::{ItemHandle, ItemInstance, Origin, Placement};
pub use status::{StatusApplyOutcome, StatusEffect, StatusEffects, StatusKind};
