//! Power, mitigation and damage application.

use crate::combat::source::{AttackPlan, AttackSource};
use crate::config::CombatConfig;
use crate::env::ItemOracle;
use crate::state::{Combatant, CombatWorld};

/// Attacker power for a planned strike.
///
/// # Formula
///
/// ```text
/// power = source_base + enchant_power_per_level * enchant + strength_bonus - weakened
/// ```
///
/// `source_base` is the weapon's melee or bolt power, or the innate profile
/// at the attacker's level. A planned weapon that cannot be found, or lacks
/// data for the planned source, degrades to the innate profile.
///
/// # Returns
///
/// The effective source (after any degradation) and its power, never negative.
pub fn attack_power(
    attacker: &Combatant,
    plan: &AttackPlan,
    world: &CombatWorld,
    items: &dyn ItemOracle,
    config: &CombatConfig,
) -> (AttackSource, i32) {
    let innate = || {
        let power = attacker.innate.power_at(attacker.level) + attacker.strength_power()
            - attacker.statuses.power_penalty();
        (AttackSource::Innate, power.max(0))
    };

    let Some(weapon_id) = plan.weapon else {
        return innate();
    };
    if plan.source == AttackSource::Innate {
        return innate();
    }

    let Some(instance) = world.item(weapon_id) else {
        tracing::warn!(attacker = %attacker.id, item = %weapon_id, "planned weapon missing");
        return innate();
    };
    let Some(data) = items
        .resolve(instance.template)
        .and_then(|definition| definition.weapon().copied())
    else {
        tracing::warn!(
            attacker = %attacker.id,
            item = %weapon_id,
            template = instance.template.0,
            "no weapon data in catalog; using innate attack"
        );
        return innate();
    };

    let base = match plan.source {
        AttackSource::Melee => data.melee_power,
        AttackSource::Bolt => data.bolt_power,
        AttackSource::Innate => None,
    };
    let Some(base) = base else {
        tracing::warn!(
            attacker = %attacker.id,
            item = %weapon_id,
            source = %plan.source,
            "weapon lacks power for planned source; using innate attack"
        );
        return innate();
    };

    let enchant = config.enchant_power_per_level * i32::from(instance.enchant);
    let power = base as i32 + enchant + attacker.strength_power() - attacker.statuses.power_penalty();
    (plan.source, power.max(0))
}

/// Defender armour class: dexterity bonus plus worn armour and its enchantment.
///
/// Broken armour contributes nothing; missing armour data counts as zero.
pub fn armour_class(defender: &Combatant, world: &CombatWorld, items: &dyn ItemOracle) -> i32 {
    let mut armour_class = defender.dexterity_armour();

    let Some(armour_id) = defender.armour else {
        return armour_class;
    };
    let Some(instance) = world.item(armour_id) else {
        tracing::warn!(defender = %defender.id, item = %armour_id, "worn armour missing");
        return armour_class;
    };
    if instance.is_broken() {
        return armour_class;
    }
    match items
        .resolve(instance.template)
        .and_then(|definition| definition.armour().copied())
    {
        Some(data) => {
            armour_class += data.armour_class as i32 + i32::from(instance.enchant);
        }
        None => {
            tracing::warn!(
                defender = %defender.id,
                item = %armour_id,
                template = instance.template.0,
                "no armour data in catalog; zero mitigation"
            );
        }
    }
    armour_class
}

/// Damage removed by armour: `round(armour_class / 10 * 3.15)`, rounded half up.
pub fn mitigation(armour_class: i32, config: &CombatConfig) -> i32 {
    (armour_class.max(0) * config.mitigation_permille + 500) / 1000
}

/// Minimum delivered damage for a source (0 for melee).
pub fn source_floor(source: AttackSource, config: &CombatConfig) -> i32 {
    match source {
        AttackSource::Bolt => config.min_bolt_damage,
        AttackSource::Innate => config.min_innate_damage,
        AttackSource::Melee => 0,
    }
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: i32, damage: i32) -> i32 {
    (current_hp - damage.max(0)).max(0)
}
