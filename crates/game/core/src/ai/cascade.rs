//! Priority cascade evaluated by every engaged monster.
//!
//! Gates run in a fixed order and the first one that passes both its
//! eligibility check and its roll wins. Every evaluated gate is recorded,
//! so callers can narrate exactly why a monster did what it did.

use crate::ai::gear::{best_convertible, best_pickup};
use crate::combat::{Armoury, is_cracked_weapon};
use crate::config::CombatConfig;
use crate::env::{Dice, GateOverrides, ItemOracle, RollPurpose};
use crate::ledger::{can_afford, heal_cost};
use crate::state::{Combatant, CombatWorld};

/// Cascade gates in priority order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Gate {
    Flee,
    Heal,
    Convert,
    Cast,
    Attack,
    Pickup,
    Emote,
    Idle,
}

impl Gate {
    pub const ORDER: [Gate; 8] = [
        Gate::Flee,
        Gate::Heal,
        Gate::Convert,
        Gate::Cast,
        Gate::Attack,
        Gate::Pickup,
        Gate::Emote,
        Gate::Idle,
    ];

    pub const fn order(self) -> u8 {
        self as u8
    }
}

/// Why a gate did not fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    HpAboveThreshold,
    InsufficientIons,
    IonsNotLow,
    NoConvertibleItems,
    NoGroundItems,
    NoAttackAvailable,
    ThresholdZero,
    RollFailed,
}

/// One evaluated gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateRecord {
    pub gate: Gate,
    pub roll: Option<u32>,
    pub threshold: i32,
    pub triggered: bool,
    pub skip: Option<SkipReason>,
}

/// Per-gate thresholds after global and species values are merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateThresholds {
    pub flee: i32,
    pub heal: i32,
    pub convert: i32,
    pub cast: i32,
    pub attack: i32,
    pub pickup: i32,
    pub emote: i32,
}

impl GateThresholds {
    /// Global thresholds, replaced by any species override.
    pub fn resolve(config: &CombatConfig, overrides: Option<&GateOverrides>) -> Self {
        let overrides = overrides.copied().unwrap_or_default();
        Self {
            flee: overrides.flee.unwrap_or(config.flee_pct),
            heal: overrides.heal.unwrap_or(config.heal_pct),
            convert: overrides.convert.unwrap_or(config.convert_pct),
            cast: overrides.cast.unwrap_or(config.cast_pct),
            attack: overrides.attack.unwrap_or(config.attack_pct),
            pickup: overrides.pickup.unwrap_or(config.pickup_pct),
            emote: overrides.emote.unwrap_or(config.emote_pct),
        }
    }

    /// Applies the cracked-weapon, low-ion and courage biases.
    pub fn biased(mut self, facts: &CascadeFacts, config: &CombatConfig) -> Self {
        if facts.cracked_weapon {
            self.flee += config.cracked_flee_bonus;
            self.pickup += config.cracked_pickup_bonus;
            self.attack = self.attack * config.cracked_attack_scale_pct / 100;
        }
        if facts.low_ions {
            self.convert += config.low_ion_convert_bonus;
            self.heal = self.heal * config.low_ion_scale_pct / 100;
            self.cast = self.cast * config.low_ion_scale_pct / 100;
        }
        if let Some(gap) = facts.level_gap {
            // gap = target level - monster level
            if gap >= config.courage_level_gap {
                self.flee += config.courage_bonus;
                self.attack -= config.courage_bonus;
            } else if -gap >= config.courage_level_gap {
                self.attack += config.courage_bonus;
            }
        }
        self.clamped()
    }

    fn clamped(self) -> Self {
        let clamp = |value: i32| value.clamp(0, 100);
        Self {
            flee: clamp(self.flee),
            heal: clamp(self.heal),
            convert: clamp(self.convert),
            cast: clamp(self.cast),
            attack: clamp(self.attack),
            pickup: clamp(self.pickup),
            emote: clamp(self.emote),
        }
    }

    pub fn get(&self, gate: Gate) -> i32 {
        match gate {
            Gate::Flee => self.flee,
            Gate::Heal => self.heal,
            Gate::Convert => self.convert,
            Gate::Cast => self.cast,
            Gate::Attack => self.attack,
            Gate::Pickup => self.pickup,
            Gate::Emote => self.emote,
            Gate::Idle => 0,
        }
    }
}

/// Everything the cascade needs to know about a monster this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeFacts {
    pub hp_pct: i32,
    pub ions: i32,
    pub ion_pct: i32,
    pub low_ions: bool,
    pub heal_cost: i32,
    pub spell_cost: i32,
    pub cracked_weapon: bool,
    pub has_convertible: bool,
    pub has_pickup: bool,
    /// Target is alive and shares the monster's location.
    pub target_in_reach: bool,
    /// An innate attack or a carried weapon to strike with.
    pub has_attack: bool,
    /// Target level minus monster level, when a target exists.
    pub level_gap: Option<i32>,
}

impl CascadeFacts {
    pub fn gather(
        monster: &Combatant,
        world: &CombatWorld,
        items: &dyn ItemOracle,
        config: &CombatConfig,
    ) -> Self {
        let target = monster.target.and_then(|id| world.combatant(id));
        let ion_pct = monster.ion_percent();
        let cracked_weapon = monster
            .weapon
            .and_then(|id| world.item(id))
            .is_some_and(is_cracked_weapon);

        let armoury = Armoury::survey(monster, world, items);
        let ground = world.ground_at(monster.position);
        let has_convertible = best_convertible(&monster.bag, monster.weapon, world, items, config)
            .or_else(|| best_convertible(&ground, None, world, items, config))
            .is_some();

        Self {
            hp_pct: monster.hp.percent(),
            ions: monster.ions,
            ion_pct,
            low_ions: monster.ions_max > 0 && ion_pct < config.low_ion_pct,
            heal_cost: heal_cost(monster.level, config),
            spell_cost: config.spell_cost,
            cracked_weapon,
            has_convertible,
            has_pickup: best_pickup(&ground, world, items, config).is_some(),
            target_in_reach: target
                .is_some_and(|t| t.is_alive() && t.position == monster.position),
            has_attack: monster.innate.is_defined()
                || armoury.melee.is_some()
                || armoury.bolt.is_some(),
            level_gap: target.map(|t| i32::from(t.level) - i32::from(monster.level)),
        }
    }

    fn eligibility(&self, gate: Gate, config: &CombatConfig) -> Option<SkipReason> {
        match gate {
            Gate::Flee if self.hp_pct >= config.flee_hp_pct => Some(SkipReason::HpAboveThreshold),
            Gate::Heal if self.hp_pct >= config.heal_at_pct => Some(SkipReason::HpAboveThreshold),
            Gate::Heal if !can_afford(self.ions, self.heal_cost) => {
                Some(SkipReason::InsufficientIons)
            }
            Gate::Convert if !self.low_ions => Some(SkipReason::IonsNotLow),
            Gate::Convert if !self.has_convertible => Some(SkipReason::NoConvertibleItems),
            Gate::Cast if !can_afford(self.ions, self.spell_cost) => {
                Some(SkipReason::InsufficientIons)
            }
            Gate::Attack if !(self.target_in_reach && self.has_attack) => {
                Some(SkipReason::NoAttackAvailable)
            }
            Gate::Pickup if !self.has_pickup => Some(SkipReason::NoGroundItems),
            _ => None,
        }
    }
}

/// The gate that fired plus the full evaluation trail.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CascadeDecision {
    pub gate: Gate,
    pub records: Vec<GateRecord>,
}

/// Runs the cascade for one action credit.
///
/// Ineligible gates and gates whose threshold is 0 are skipped without a
/// roll. IDLE always fires and never rolls.
pub fn evaluate(
    monster: &Combatant,
    facts: &CascadeFacts,
    thresholds: &GateThresholds,
    config: &CombatConfig,
    dice: &mut Dice<'_>,
) -> CascadeDecision {
    let mut records = Vec::with_capacity(Gate::ORDER.len());

    for gate in Gate::ORDER {
        if gate == Gate::Idle {
            records.push(GateRecord {
                gate,
                roll: None,
                threshold: 0,
                triggered: true,
                skip: None,
            });
            break;
        }

        let threshold = thresholds.get(gate);
        let skip = facts
            .eligibility(gate, config)
            .or((threshold <= 0).then_some(SkipReason::ThresholdZero));

        if let Some(reason) = skip {
            tracing::debug!(monster = %monster.id, %gate, threshold, reason = %reason, "gate skipped");
            records.push(GateRecord {
                gate,
                roll: None,
                threshold,
                triggered: false,
                skip: Some(reason),
            });
            continue;
        }

        let roll = dice.roll(monster.id, RollPurpose::Gate(gate));
        let triggered = (roll as i32) < threshold;
        tracing::debug!(monster = %monster.id, %gate, roll, threshold, triggered, "gate rolled");
        records.push(GateRecord {
            gate,
            roll: Some(roll),
            threshold,
            triggered,
            skip: (!triggered).then_some(SkipReason::RollFailed),
        });
        if triggered {
            return CascadeDecision { gate, records };
        }
    }

    CascadeDecision {
        gate: Gate::Idle,
        records,
    }
}
