//! Item-related state types.
//!
//! This module contains foundational item types:
//! - ItemHandle: Reference to catalog templates
//! - ItemInstance: A minted item, either on the ground or carried
//! - Origin: Native starter gear versus world-found loot

use super::{CombatantId, ItemId, Position};

/// Reference to an item template stored outside the core (lookup via the catalog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u32);

impl ItemHandle {
    /// Placeholder a cracked weapon turns into.
    pub const BROKEN_WEAPON: Self = Self(u32::MAX - 2);

    /// Placeholder a cracked armour piece turns into.
    pub const BROKEN_ARMOUR: Self = Self(u32::MAX - 1);

    /// Token dropped on every monster death.
    pub const SKULL: Self = Self(u32::MAX);

    /// Returns true for the two broken placeholders.
    #[inline]
    pub const fn is_broken(self) -> bool {
        self.0 == Self::BROKEN_WEAPON.0 || self.0 == Self::BROKEN_ARMOUR.0
    }
}

/// Where an item came from.
///
/// Conversion into ions is only ever legal for [`Origin::World`] items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    /// Part of a combatant's starting loadout.
    Native,
    /// Found in the world, dropped as loot, or picked up.
    #[default]
    World,
}

/// Where an item currently is. Exactly one of the two, always.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    Ground(Position),
    Carried(CombatantId),
}

impl Placement {
    pub fn owner(&self) -> Option<CombatantId> {
        match self {
            Self::Carried(owner) => Some(*owner),
            Self::Ground(_) => None,
        }
    }

    pub fn ground(&self) -> Option<Position> {
        match self {
            Self::Ground(pos) => Some(*pos),
            Self::Carried(_) => None,
        }
    }
}

/// A minted item instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub id: ItemId,
    pub template: ItemHandle,
    /// 1..=100 for intact items; `None` once cracked into a placeholder.
    pub condition: Option<u8>,
    /// 0..=100.
    pub enchant: u8,
    pub origin: Origin,
    pub placement: Placement,
}

impl ItemInstance {
    pub const MAX_CONDITION: u8 = 100;
    pub const MAX_ENCHANT: u8 = 100;

    pub fn new(id: ItemId, template: ItemHandle, origin: Origin, placement: Placement) -> Self {
        Self {
            id,
            template,
            condition: if template.is_broken() {
                None
            } else {
                Some(Self::MAX_CONDITION)
            },
            enchant: 0,
            origin,
            placement,
        }
    }

    #[must_use]
    pub fn with_enchant(mut self, enchant: u8) -> Self {
        self.enchant = enchant.min(Self::MAX_ENCHANT);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: u8) -> Self {
        self.condition = Some(condition.clamp(1, Self::MAX_CONDITION));
        self
    }

    pub fn is_broken(&self) -> bool {
        self.template.is_broken()
    }

    pub fn is_enchanted(&self) -> bool {
        self.enchant > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_have_no_condition() {
        let item = ItemInstance::new(
            ItemId(1),
            ItemHandle::BROKEN_WEAPON,
            Origin::World,
            Placement::Carried(CombatantId(4)),
        );
        assert!(item.is_broken());
        assert_eq!(item.condition, None);
    }

    #[test]
    fn builders_clamp_ranges() {
        let item = ItemInstance::new(
            ItemId(1),
            ItemHandle(10),
            Origin::Native,
            Placement::Ground(Position::ORIGIN),
        )
        .with_enchant(140)
        .with_condition(0);
        assert_eq!(item.enchant, 100);
        assert_eq!(item.condition, Some(1));
        assert!(!ItemHandle::SKULL.is_broken());
    }
}
