//! Cross-entity invariants checked at every commit point.
//!
//! A staged world that fails any of these checks must not be committed.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatWorld, Combatant, CombatantId, ItemId, Placement};

/// A corrupted staged state. Always fatal for the tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("item {item} lies on the ground but is referenced by {holder}")]
    DualPlacement { item: ItemId, holder: CombatantId },

    #[error("item {item} is referenced by both {first} and {second}")]
    DuplicateHandle {
        item: ItemId,
        first: CombatantId,
        second: CombatantId,
    },

    #[error("{holder} references missing item {item}")]
    OrphanReference { item: ItemId, holder: CombatantId },

    #[error("item {item} is carried by {owner} but not held in any of its slots")]
    OwnerMismatch { item: ItemId, owner: CombatantId },

    #[error("{holder} wields {item} without carrying it")]
    WeaponNotCarried { item: ItemId, holder: CombatantId },

    #[error("{combatant} hp {current} outside 0..={maximum}")]
    HpOutOfRange {
        combatant: CombatantId,
        current: i32,
        maximum: i32,
    },

    #[error("{combatant} exhaustion {exhaustion} above the maximum")]
    ExhaustionOutOfRange { combatant: CombatantId, exhaustion: u8 },

    #[error("{combatant} has negative ions ({ions})")]
    NegativeIons { combatant: CombatantId, ions: i32 },

    #[error("{from} targets {to} but the pairing is not mutual")]
    TargetAsymmetry { from: CombatantId, to: CombatantId },

    #[error("{from} targets {to} although one of them is dead or missing")]
    TargetOnDead { from: CombatantId, to: CombatantId },

    #[error("item {item} condition moved from {before:?} to {after:?}")]
    ConditionIncreased {
        item: ItemId,
        before: Option<u8>,
        after: Option<u8>,
    },
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use InvariantViolation::*;
        match self {
            DualPlacement { .. } => "INVARIANT_DUAL_PLACEMENT",
            DuplicateHandle { .. } => "INVARIANT_DUPLICATE_HANDLE",
            OrphanReference { .. } => "INVARIANT_ORPHAN_REFERENCE",
            OwnerMismatch { .. } => "INVARIANT_OWNER_MISMATCH",
            WeaponNotCarried { .. } => "INVARIANT_WEAPON_NOT_CARRIED",
            HpOutOfRange { .. } => "INVARIANT_HP_OUT_OF_RANGE",
            ExhaustionOutOfRange { .. } => "INVARIANT_EXHAUSTION_OUT_OF_RANGE",
            NegativeIons { .. } => "INVARIANT_NEGATIVE_IONS",
            TargetAsymmetry { .. } => "INVARIANT_TARGET_ASYMMETRY",
            TargetOnDead { .. } => "INVARIANT_TARGET_ON_DEAD",
            ConditionIncreased { .. } => "INVARIANT_CONDITION_INCREASED",
        }
    }
}

/// Verifies `staged` against the commit-time invariants.
///
/// `before` is the snapshot the tick started from; it is only consulted for
/// the wear-direction check.
pub fn check_invariants(
    before: &CombatWorld,
    staged: &CombatWorld,
) -> Result<(), InvariantViolation> {
    check_item_references(staged)?;
    check_vitals(staged)?;
    check_targets(staged)?;
    check_wear_direction(before, staged)
}

fn check_item_references(world: &CombatWorld) -> Result<(), InvariantViolation> {
    let mut holders: BTreeMap<ItemId, CombatantId> = BTreeMap::new();

    for combatant in world.combatants() {
        let references = combatant.bag.iter().chain(combatant.armour.iter());
        for &item_id in references {
            if let Some(&first) = holders.get(&item_id) {
                return Err(InvariantViolation::DuplicateHandle {
                    item: item_id,
                    first,
                    second: combatant.id,
                });
            }
            holders.insert(item_id, combatant.id);

            let Some(item) = world.item(item_id) else {
                return Err(InvariantViolation::OrphanReference {
                    item: item_id,
                    holder: combatant.id,
                });
            };
            match item.placement {
                Placement::Ground(_) => {
                    return Err(InvariantViolation::DualPlacement {
                        item: item_id,
                        holder: combatant.id,
                    });
                }
                Placement::Carried(owner) if owner != combatant.id => {
                    return Err(InvariantViolation::OwnerMismatch {
                        item: item_id,
                        owner,
                    });
                }
                Placement::Carried(_) => {}
            }
        }

        if let Some(weapon) = combatant.weapon {
            if !combatant.bag.contains(&weapon) {
                return Err(InvariantViolation::WeaponNotCarried {
                    item: weapon,
                    holder: combatant.id,
                });
            }
        }
    }

    for item in world.items() {
        if let Placement::Carried(owner) = item.placement {
            if holders.get(&item.id) != Some(&owner) {
                return Err(InvariantViolation::OwnerMismatch {
                    item: item.id,
                    owner,
                });
            }
        }
    }

    Ok(())
}

fn check_vitals(world: &CombatWorld) -> Result<(), InvariantViolation> {
    for combatant in world.combatants() {
        let hp = combatant.hp;
        if hp.current < 0 || hp.current > hp.maximum {
            return Err(InvariantViolation::HpOutOfRange {
                combatant: combatant.id,
                current: hp.current,
                maximum: hp.maximum,
            });
        }
        if combatant.exhaustion > Combatant::MAX_EXHAUSTION {
            return Err(InvariantViolation::ExhaustionOutOfRange {
                combatant: combatant.id,
                exhaustion: combatant.exhaustion,
            });
        }
        if combatant.ions < 0 {
            return Err(InvariantViolation::NegativeIons {
                combatant: combatant.id,
                ions: combatant.ions,
            });
        }
    }
    Ok(())
}

/// Targets are one-directional ids; pairing is enforced here.
///
/// Several monsters may hunt the same player, but a player's chosen target
/// must target the player back, and nobody may target or be targeted while
/// dead.
fn check_targets(world: &CombatWorld) -> Result<(), InvariantViolation> {
    for combatant in world.combatants() {
        let Some(target_id) = combatant.target else {
            continue;
        };
        let target = world.combatant(target_id);
        let both_alive = combatant.is_alive() && target.is_some_and(|t| t.is_alive());
        if !both_alive {
            return Err(InvariantViolation::TargetOnDead {
                from: combatant.id,
                to: target_id,
            });
        }
        if !combatant.is_monster() && target.and_then(|t| t.target) != Some(combatant.id) {
            return Err(InvariantViolation::TargetAsymmetry {
                from: combatant.id,
                to: target_id,
            });
        }
    }
    Ok(())
}

fn check_wear_direction(before: &CombatWorld, staged: &CombatWorld) -> Result<(), InvariantViolation> {
    for item in staged.items() {
        let Some(previous) = before.item(item.id) else {
            continue;
        };
        let increased = match (previous.condition, item.condition) {
            (Some(old), Some(new)) => new > old,
            (None, Some(_)) => true,
            _ => false,
        };
        if increased || (previous.is_broken() && !item.is_broken()) {
            return Err(InvariantViolation::ConditionIncreased {
                item: item.id,
                before: previous.condition,
                after: item.condition,
            });
        }
    }
    Ok(())
}
