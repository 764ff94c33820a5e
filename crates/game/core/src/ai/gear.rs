//! Gear choices: what to pick up, what to convert, and how to shed broken
//! equipment before the cascade runs.

use crate::combat::is_cracked_weapon;
use crate::config::CombatConfig;
use crate::env::{Dice, ItemDefinition, ItemKind, ItemOracle, RollPurpose};
use crate::ledger::{check_convertible, convert_value};
use crate::state::{Combatant, CombatWorld, ItemId, ItemInstance, PendingDrop};

/// Raw power an item offers in its slot.
fn base_damage(definition: &ItemDefinition) -> u64 {
    match definition.kind {
        ItemKind::Weapon(data) => u64::from(data.melee_power.max(data.bolt_power).unwrap_or(0)),
        ItemKind::Armour(data) => u64::from(data.armour_class),
        ItemKind::Trinket => 0,
    }
}

/// Pickup desirability: `base_damage * 1000 + convert value`. Broken
/// placeholders score 0.
pub fn pickup_score(item: &ItemInstance, definition: Option<&ItemDefinition>, config: &CombatConfig) -> u64 {
    if item.is_broken() {
        return 0;
    }
    let Some(definition) = definition else {
        return 0;
    };
    base_damage(definition) * 1000 + u64::from(convert_value(item, definition, config))
}

/// Best non-broken item lying in `ground`; ties go to the lower id.
pub fn best_pickup(
    ground: &[ItemId],
    world: &CombatWorld,
    items: &dyn ItemOracle,
    config: &CombatConfig,
) -> Option<ItemId> {
    ground
        .iter()
        .filter_map(|&id| world.item(id))
        .filter(|item| !item.is_broken())
        .map(|item| {
            let definition = items.resolve(item.template);
            (pickup_score(item, definition.as_ref(), config), item.id)
        })
        .max_by(|(a_score, a_id), (b_score, b_id)| a_score.cmp(b_score).then(b_id.cmp(a_id)))
        .map(|(_, id)| id)
}

/// Highest-valued convertible item among `candidates`, skipping `exclude`
/// (the wielded weapon). Ties go to the lower id.
pub fn best_convertible(
    candidates: &[ItemId],
    exclude: Option<ItemId>,
    world: &CombatWorld,
    items: &dyn ItemOracle,
    config: &CombatConfig,
) -> Option<(ItemId, u32)> {
    candidates
        .iter()
        .filter(|&&id| Some(id) != exclude)
        .filter_map(|&id| world.item(id))
        .filter_map(|item| {
            let definition = items.resolve(item.template);
            check_convertible(item, definition.as_ref(), config)
                .ok()
                .map(|value| (item.id, value))
        })
        .max_by(|(a_id, a_value), (b_id, b_value)| a_value.cmp(b_value).then(b_id.cmp(a_id)))
}

/// Strongest intact weapon in the bag other than the wielded one.
pub fn best_replacement_weapon(
    combatant: &Combatant,
    world: &CombatWorld,
    items: &dyn ItemOracle,
) -> Option<ItemId> {
    combatant
        .bag
        .iter()
        .filter(|&&id| Some(id) != combatant.weapon)
        .filter_map(|&id| world.item(id))
        .filter(|item| !item.is_broken())
        .filter_map(|item| {
            let definition = items.resolve(item.template)?;
            definition.weapon()?;
            Some((base_damage(&definition), item.id))
        })
        .max_by(|(a_power, a_id), (b_power, b_id)| a_power.cmp(b_power).then(b_id.cmp(a_id)))
        .map(|(_, id)| id)
}

/// True if `candidate` should replace what `combatant` currently wields.
pub fn improves_wielded(
    combatant: &Combatant,
    candidate: ItemId,
    world: &CombatWorld,
    items: &dyn ItemOracle,
) -> bool {
    let Some(definition) = world.item(candidate).and_then(|item| items.resolve(item.template)) else {
        return false;
    };
    if definition.weapon().is_none() || world.item(candidate).is_some_and(|i| i.is_broken()) {
        return false;
    }
    let Some(current) = combatant.weapon.and_then(|id| world.item(id)) else {
        return true;
    };
    if is_cracked_weapon(current) {
        return true;
    }
    let current_power = items
        .resolve(current.template)
        .map(|d| base_damage(&d))
        .unwrap_or(0);
    base_damage(&definition) > current_power
}

/// Broken-gear handling that runs ahead of the cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GearResponse {
    /// Worn armour has cracked; it is dropped right away.
    DropArmour(ItemId),
    /// Broken weapon leaves the bag, optionally swapped for a replacement.
    DropWeapon {
        item: ItemId,
        replacement: Option<ItemId>,
        attempts: u8,
    },
    /// Drop roll failed; try again next decision point.
    KeepWeapon(PendingDrop),
}

/// Decides what to do about broken gear at this decision point.
///
/// Broken armour always goes first. A broken weapon is dropped at once if a
/// replacement is carried; otherwise it is dropped on a successful drop roll,
/// repeated each decision point until it succeeds.
pub fn plan_gear_response(
    monster: &Combatant,
    world: &CombatWorld,
    items: &dyn ItemOracle,
    config: &CombatConfig,
    dice: &mut Dice<'_>,
) -> Vec<GearResponse> {
    let mut responses = Vec::new();

    if let Some(armour) = monster.armour.and_then(|id| world.item(id)) {
        if armour.is_broken() {
            responses.push(GearResponse::DropArmour(armour.id));
        }
    }

    let Some(weapon) = monster.weapon.and_then(|id| world.item(id)) else {
        return responses;
    };
    if !is_cracked_weapon(weapon) {
        return responses;
    }

    let attempts = monster
        .pending_drop
        .filter(|pending| pending.item == weapon.id)
        .map(|pending| pending.attempts)
        .unwrap_or(0)
        .saturating_add(1);

    if let Some(replacement) = best_replacement_weapon(monster, world, items) {
        responses.push(GearResponse::DropWeapon {
            item: weapon.id,
            replacement: Some(replacement),
            attempts,
        });
        return responses;
    }

    if dice.passes(monster.id, RollPurpose::BrokenWeaponDrop, config.broken_weapon_drop_pct) {
        responses.push(GearResponse::DropWeapon {
            item: weapon.id,
            replacement: None,
            attempts,
        });
    } else {
        responses.push(GearResponse::KeepWeapon(PendingDrop {
            item: weapon.id,
            attempts,
        }));
    }
    responses
}
