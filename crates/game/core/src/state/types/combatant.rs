//! Combatant state: the player and every monster share one record shape.

use super::{CombatantId, ItemId, Position, ResourceMeter, StatusEffect, StatusEffects};
use crate::env::SpeciesId;

/// Complete combatant record.
///
/// # Invariants
///
/// - `hp.current` stays within `0..=hp.maximum`; zero means dead
/// - `weapon`, if set, is also listed in `bag`
/// - `armour` is never listed in `bag`
/// - `exhaustion` stays within `0..=MAX_EXHAUSTION`
/// - the player's `target` is paired: if the player targets B then B targets
///   the player. A monster may hunt the player without being targeted back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub kind: CombatantKind,
    /// Species table key (monsters only).
    pub species: Option<SpeciesId>,
    pub position: Position,

    pub hp: ResourceMeter,
    pub abilities: AbilityScores,
    /// Explicit strength bonus; overrides `strength / 10` when present.
    pub strength_bonus: Option<i32>,
    pub level: u16,

    pub ions: i32,
    pub ions_max: i32,
    pub riblets: i32,
    pub experience: i64,

    // === Gear ===
    /// Wielded weapon; always one of the bag entries.
    pub weapon: Option<ItemId>,
    /// Worn armour; never in the bag.
    pub armour: Option<ItemId>,
    pub bag: Vec<ItemId>,
    /// Attack used when nothing is wielded.
    pub innate: InnateAttack,

    /// 0..=100.
    pub exhaustion: u8,
    pub statuses: StatusEffects,

    // === Engagement ===
    pub target: Option<CombatantId>,
    pub behavior: AiBehavior,
    /// Broken weapon waiting to be dropped.
    pub pending_drop: Option<PendingDrop>,
}

impl Combatant {
    pub const MAX_EXHAUSTION: u8 = 100;

    pub fn new(id: CombatantId, name: impl Into<String>, kind: CombatantKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            species: None,
            position: Position::ORIGIN,
            hp: ResourceMeter::full(10),
            abilities: AbilityScores::default(),
            strength_bonus: None,
            level: 1,
            ions: 0,
            ions_max: 0,
            riblets: 0,
            experience: 0,
            weapon: None,
            armour: None,
            bag: Vec::new(),
            innate: InnateAttack::default(),
            exhaustion: 0,
            statuses: StatusEffects::empty(),
            target: None,
            behavior: AiBehavior::Idle,
            pending_drop: None,
        }
    }

    /// The player record.
    pub fn player(name: impl Into<String>) -> Self {
        Self::new(CombatantId::PLAYER, name, CombatantKind::Player)
    }

    pub fn monster(id: CombatantId, name: impl Into<String>, species: SpeciesId) -> Self {
        let mut monster = Self::new(id, name, CombatantKind::Monster);
        monster.species = Some(species);
        monster
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp.current > 0
    }

    #[inline]
    pub fn is_monster(&self) -> bool {
        matches!(self.kind, CombatantKind::Monster)
    }

    /// Ions as a percentage of maximum; a combatant with no maximum reads 100%.
    pub fn ion_percent(&self) -> i32 {
        ResourceMeter::new(self.ions, self.ions_max).percent()
    }

    /// Strength-derived power bonus.
    pub fn strength_power(&self) -> i32 {
        match self.strength_bonus {
            Some(bonus) => bonus.max(0),
            None => i32::from(self.abilities.strength / 10),
        }
    }

    /// Dexterity-derived armour class.
    pub fn dexterity_armour(&self) -> i32 {
        i32::from(self.abilities.dexterity / 10)
    }

    /// True if the item is referenced from any gear slot.
    pub fn holds(&self, item: ItemId) -> bool {
        self.armour == Some(item) || self.bag.contains(&item)
    }

    /// Removes every reference to `item` from the gear slots.
    pub fn release(&mut self, item: ItemId) {
        self.bag.retain(|held| *held != item);
        if self.weapon == Some(item) {
            self.weapon = None;
        }
        if self.armour == Some(item) {
            self.armour = None;
        }
        if self.pending_drop.is_some_and(|pending| pending.item == item) {
            self.pending_drop = None;
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_hp(mut self, current: i32, maximum: i32) -> Self {
        self.hp = ResourceMeter::new(current, maximum);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u16) -> Self {
        self.level = level.max(1);
        self
    }

    #[must_use]
    pub fn with_ions(mut self, ions: i32, ions_max: i32) -> Self {
        self.ions = ions;
        self.ions_max = ions_max;
        self
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    #[must_use]
    pub fn with_innate(mut self, innate: InnateAttack) -> Self {
        self.innate = innate;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player,
    Monster,
}

/// Ability scores. All non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityScores {
    pub strength: u16,
    pub dexterity: u16,
    pub constitution: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub charisma: u16,
}

impl AbilityScores {
    pub fn new(strength: u16, dexterity: u16) -> Self {
        Self {
            strength,
            dexterity,
            ..Self::default()
        }
    }
}

/// Attack profile used when no weapon applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InnateAttack {
    pub name: String,
    pub base_power: i32,
    pub power_per_level: i32,
    /// Status inflicted on a damaging hit.
    pub status: Option<StatusEffect>,
}

impl InnateAttack {
    pub fn new(name: impl Into<String>, base_power: i32, power_per_level: i32) -> Self {
        Self {
            name: name.into(),
            base_power,
            power_per_level,
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.status = Some(status);
        self
    }

    /// False for the zero profile a combatant gets when none is configured.
    pub fn is_defined(&self) -> bool {
        self.base_power > 0 || self.power_per_level > 0
    }

    pub fn power_at(&self, level: u16) -> i32 {
        self.base_power + self.power_per_level * i32::from(level)
    }
}

/// Monster behaviour state.
///
/// `idle → patrol → taunt → pursue → attack ⇄ {heal, reequip, loot} → flee → patrol`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AiBehavior {
    #[default]
    Idle,
    Patrol,
    Taunt,
    Pursue,
    Attack,
    Heal,
    Reequip,
    Loot,
    Flee,
}

impl AiBehavior {
    /// Dormant monsters need a wake roll before they evaluate the cascade.
    pub fn is_dormant(self) -> bool {
        matches!(self, Self::Idle | Self::Patrol)
    }
}

/// A broken weapon scheduled for dropping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingDrop {
    pub item: ItemId,
    pub attempts: u8,
}
