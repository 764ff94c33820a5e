//! Combat resolution system.
//!
//! This module provides pure functions for resolving combat interactions.
//! All combat logic is deterministic; the only randomness (source choice,
//! crit and fumble checks) is drawn by the caller through [`crate::env::Dice`].
//!
//! # Core Functions
//!
//! - `plan_monster_attack` / `plan_wielded_attack`: pick the attack source
//! - `attack_power` / `armour_class`: power and armour from gear and stats
//! - `resolve_strike`: mitigation, floors, crit and the opening-strike clamp
//! - `wear_item`: condition loss and cracking

pub mod damage;
pub mod durability;
pub mod result;
pub mod source;

pub use damage::{apply_damage, armour_class, attack_power, mitigation, source_floor};
pub use durability::{
    WearOutcome, broken_placeholder, is_cracked_weapon, is_degradable, wear_item,
};
pub use result::{AttackOutcome, AttackResult, Strike, resolve_strike};
pub use source::{
    Armoury, AttackPlan, AttackSource, SourceWeights, WeaponCandidate, plan_monster_attack,
    plan_wielded_attack,
};
