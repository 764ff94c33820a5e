//! Attack source selection.
//!
//! Sources form a closed set: a strike is a melee swing, a bolt, or the
//! attacker's innate attack. Monsters pick one from a weight table built
//! from what they carry; the player always uses the wielded weapon.

use crate::combat::durability::is_cracked_weapon;
use crate::env::{Dice, ItemOracle, RollPurpose, WeaponData};
use crate::state::{Combatant, CombatWorld, ItemId};

/// Where a strike's power comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum AttackSource {
    Melee,
    Bolt,
    Innate,
}

/// Chosen source plus the weapon instance backing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackPlan {
    pub source: AttackSource,
    pub weapon: Option<ItemId>,
}

impl AttackPlan {
    pub const INNATE: Self = Self {
        source: AttackSource::Innate,
        weapon: None,
    };
}

/// A carried weapon usable for one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponCandidate {
    pub item: ItemId,
    pub data: WeaponData,
    pub cracked: bool,
}

/// Best melee and ranged weapon a combatant carries.
///
/// The wielded weapon wins its category; otherwise the first bag entry of
/// that category is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Armoury {
    pub melee: Option<WeaponCandidate>,
    pub bolt: Option<WeaponCandidate>,
}

impl Armoury {
    pub fn survey(combatant: &Combatant, world: &CombatWorld, items: &dyn ItemOracle) -> Self {
        let mut armoury = Self::default();
        let ordered = combatant
            .weapon
            .iter()
            .chain(combatant.bag.iter().filter(|id| Some(**id) != combatant.weapon));

        for &item_id in ordered {
            let Some(instance) = world.item(item_id) else {
                continue;
            };
            let Some(definition) = items.resolve(instance.template) else {
                continue;
            };
            let Some(data) = definition.weapon().copied() else {
                continue;
            };
            let candidate = WeaponCandidate {
                item: item_id,
                data,
                cracked: is_cracked_weapon(instance),
            };
            let slot = if data.is_ranged() {
                &mut armoury.bolt
            } else {
                &mut armoury.melee
            };
            if slot.is_none() {
                *slot = Some(candidate);
            }
        }
        armoury
    }
}

/// Relative weights for the three sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceWeights {
    pub melee: u32,
    pub bolt: u32,
    pub innate: u32,
}

impl SourceWeights {
    pub fn build(armoury: &Armoury, has_innate: bool, prefers_ranged: bool) -> Self {
        let innate = |weight: u32| if has_innate { weight } else { 0 };
        let mut weights = match (armoury.melee.is_some(), armoury.bolt.is_some()) {
            (true, true) if prefers_ranged => Self {
                melee: 20,
                bolt: 70,
                innate: innate(10),
            },
            (true, true) => Self {
                melee: 70,
                bolt: 20,
                innate: innate(10),
            },
            (true, false) => Self {
                melee: 95,
                bolt: 0,
                innate: innate(5),
            },
            (false, true) => Self {
                melee: 0,
                bolt: if prefers_ranged { 95 } else { 90 },
                innate: innate(if prefers_ranged { 5 } else { 10 }),
            },
            (false, false) => Self {
                melee: 0,
                bolt: 0,
                innate: innate(100),
            },
        };

        if armoury.melee.is_some_and(|w| w.cracked) {
            weights.melee = halve(weights.melee);
        }
        if armoury.bolt.is_some_and(|w| w.cracked) {
            weights.bolt = halve(weights.bolt);
        }
        weights
    }

    pub fn total(&self) -> u32 {
        self.melee + self.bolt + self.innate
    }

    fn entries(&self) -> impl Iterator<Item = (AttackSource, u32)> {
        [
            (AttackSource::Melee, self.melee),
            (AttackSource::Bolt, self.bolt),
            (AttackSource::Innate, self.innate),
        ]
        .into_iter()
        .filter(|(_, weight)| *weight > 0)
    }

    /// Maps a draw in `0..total()` to a source.
    pub fn select(&self, draw: u32) -> AttackSource {
        let mut cumulative = 0;
        let mut last = AttackSource::Innate;
        for (source, weight) in self.entries() {
            cumulative += weight;
            last = source;
            if draw < cumulative {
                return source;
            }
        }
        last
    }
}

fn halve(weight: u32) -> u32 {
    if weight == 0 { 0 } else { (weight / 2).max(1) }
}

/// Picks a monster's attack source, drawing only when more than one source
/// has weight.
pub fn plan_monster_attack(
    monster: &Combatant,
    world: &CombatWorld,
    items: &dyn ItemOracle,
    prefers_ranged: bool,
    dice: &mut Dice<'_>,
) -> AttackPlan {
    let armoury = Armoury::survey(monster, world, items);
    let weights = SourceWeights::build(&armoury, monster.innate.is_defined(), prefers_ranged);

    let source = match weights.entries().count() {
        0 => return AttackPlan::INNATE,
        1 => weights.select(0),
        _ => {
            let draw = dice.pick(monster.id, RollPurpose::AttackSource, weights.total());
            weights.select(draw)
        }
    };

    let weapon = match source {
        AttackSource::Melee => armoury.melee.map(|w| w.item),
        AttackSource::Bolt => armoury.bolt.map(|w| w.item),
        AttackSource::Innate => None,
    };
    AttackPlan { source, weapon }
}

/// Player strikes use whatever is wielded.
pub fn plan_wielded_attack(
    attacker: &Combatant,
    world: &CombatWorld,
    items: &dyn ItemOracle,
) -> AttackPlan {
    let Some(weapon_id) = attacker.weapon else {
        return AttackPlan::INNATE;
    };
    let data = world
        .item(weapon_id)
        .and_then(|instance| items.resolve(instance.template))
        .and_then(|definition| definition.weapon().copied());

    match data {
        Some(data) if data.is_ranged() => AttackPlan {
            source: AttackSource::Bolt,
            weapon: Some(weapon_id),
        },
        Some(_) => AttackPlan {
            source: AttackSource::Melee,
            weapon: Some(weapon_id),
        },
        None => {
            tracing::warn!(
                attacker = %attacker.id,
                item = %weapon_id,
                "wielded weapon has no weapon data; using innate attack"
            );
            AttackPlan::INNATE
        }
    }
}
