//! Pursuit rolls when the target leaves the shared location.

use crate::ai::gear::best_pickup;
use crate::combat::is_cracked_weapon;
use crate::config::CombatConfig;
use crate::env::{Dice, ItemOracle, RollPurpose};
use crate::state::{Combatant, CombatWorld};

/// Distraction that lowers the pursuit chance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PursuitModifier {
    Loot,
    LowIons,
    LowHp,
    Cracked,
}

/// Outcome of one pursuit roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PursuitRoll {
    pub chance: i32,
    pub roll: Option<u32>,
    pub success: bool,
    /// Distractions that lowered the chance.
    pub modifiers: Vec<PursuitModifier>,
}

/// Pursuit chance after distractions, clamped to `0..=100`.
pub fn pursuit_chance(
    monster: &Combatant,
    world: &CombatWorld,
    items: &dyn ItemOracle,
    config: &CombatConfig,
) -> (i32, Vec<PursuitModifier>) {
    let mut chance = config.pursuit_base_pct;
    let mut modifiers = Vec::new();

    let ground = world.ground_at(monster.position);
    if best_pickup(&ground, world, items, config).is_some() {
        chance -= config.pursuit_loot_penalty;
        modifiers.push(PursuitModifier::Loot);
    }
    if monster.ions_max > 0 && monster.ion_percent() < config.low_ion_pct {
        chance -= config.pursuit_low_ion_penalty;
        modifiers.push(PursuitModifier::LowIons);
    }
    if monster.hp.percent() < config.pursuit_low_hp_pct {
        chance -= config.pursuit_low_hp_penalty;
        modifiers.push(PursuitModifier::LowHp);
    }
    if monster
        .weapon
        .and_then(|id| world.item(id))
        .is_some_and(is_cracked_weapon)
    {
        chance -= config.pursuit_cracked_penalty;
        modifiers.push(PursuitModifier::Cracked);
    }
    (chance.clamp(0, 100), modifiers)
}

/// Rolls whether `monster` follows its target.
pub fn roll_pursuit(
    monster: &Combatant,
    world: &CombatWorld,
    items: &dyn ItemOracle,
    config: &CombatConfig,
    dice: &mut Dice<'_>,
) -> PursuitRoll {
    let (chance, modifiers) = pursuit_chance(monster, world, items, config);
    if chance <= 0 {
        return PursuitRoll {
            chance,
            roll: None,
            success: false,
            modifiers,
        };
    }
    let roll = dice.roll(monster.id, RollPurpose::Pursuit);
    let success = (roll as i32) < chance;
    tracing::debug!(monster = %monster.id, chance, roll, success, "pursuit roll");
    PursuitRoll {
        chance,
        roll: Some(roll),
        success,
        modifiers,
    }
}
