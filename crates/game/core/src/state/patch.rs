//! Partial combatant updates for the combatant store's `update_fields`.

use bitflags::bitflags;

use crate::state::{
    AiBehavior, Combatant, CombatantId, ItemId, PendingDrop, Position, ResourceMeter,
    StatusEffects,
};

bitflags! {
    /// Tracks which fields of a [`Combatant`] changed during a tick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatantFields: u16 {
        const HP           = 1 << 0;
        const IONS         = 1 << 1;
        const WALLET       = 1 << 2;
        const GEAR         = 1 << 3;
        const STATUSES     = 1 << 4;
        const TARGET       = 1 << 5;
        const BEHAVIOR     = 1 << 6;
        const PENDING_DROP = 1 << 7;
        const POSITION     = 1 << 8;
        const EXHAUSTION   = 1 << 9;
    }
}

/// Gear slots travel together so bag order and wield state stay consistent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearSlots {
    pub weapon: Option<ItemId>,
    pub armour: Option<ItemId>,
    pub bag: Vec<ItemId>,
}

/// Minimal combatant update.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantPatch {
    pub id: CombatantId,
    pub fields: CombatantFields,
    pub hp: Option<ResourceMeter>,
    pub ions: Option<i32>,
    /// (riblets, experience)
    pub wallet: Option<(i32, i64)>,
    pub gear: Option<GearSlots>,
    pub statuses: Option<StatusEffects>,
    pub target: Option<Option<CombatantId>>,
    pub behavior: Option<AiBehavior>,
    pub pending_drop: Option<Option<PendingDrop>>,
    pub position: Option<Position>,
    pub exhaustion: Option<u8>,
}

impl CombatantPatch {
    /// Builds the patch that turns `before` into `after`, or `None` if nothing changed.
    pub fn diff(before: &Combatant, after: &Combatant) -> Option<Self> {
        let mut patch = Self {
            id: after.id,
            fields: CombatantFields::empty(),
            hp: None,
            ions: None,
            wallet: None,
            gear: None,
            statuses: None,
            target: None,
            behavior: None,
            pending_drop: None,
            position: None,
            exhaustion: None,
        };

        if before.hp != after.hp {
            patch.fields |= CombatantFields::HP;
            patch.hp = Some(after.hp);
        }
        if before.ions != after.ions {
            patch.fields |= CombatantFields::IONS;
            patch.ions = Some(after.ions);
        }
        if before.riblets != after.riblets || before.experience != after.experience {
            patch.fields |= CombatantFields::WALLET;
            patch.wallet = Some((after.riblets, after.experience));
        }
        if before.weapon != after.weapon || before.armour != after.armour || before.bag != after.bag
        {
            patch.fields |= CombatantFields::GEAR;
            patch.gear = Some(GearSlots {
                weapon: after.weapon,
                armour: after.armour,
                bag: after.bag.clone(),
            });
        }
        if before.statuses != after.statuses {
            patch.fields |= CombatantFields::STATUSES;
            patch.statuses = Some(after.statuses.clone());
        }
        if before.target != after.target {
            patch.fields |= CombatantFields::TARGET;
            patch.target = Some(after.target);
        }
        if before.behavior != after.behavior {
            patch.fields |= CombatantFields::BEHAVIOR;
            patch.behavior = Some(after.behavior);
        }
        if before.pending_drop != after.pending_drop {
            patch.fields |= CombatantFields::PENDING_DROP;
            patch.pending_drop = Some(after.pending_drop);
        }
        if before.position != after.position {
            patch.fields |= CombatantFields::POSITION;
            patch.position = Some(after.position);
        }
        if before.exhaustion != after.exhaustion {
            patch.fields |= CombatantFields::EXHAUSTION;
            patch.exhaustion = Some(after.exhaustion);
        }

        if patch.fields.is_empty() {
            None
        } else {
            Some(patch)
        }
    }

    /// Writes every flagged field into `combatant`.
    pub fn apply_to(&self, combatant: &mut Combatant) {
        if let Some(hp) = self.hp {
            combatant.hp = hp;
        }
        if let Some(ions) = self.ions {
            combatant.ions = ions;
        }
        if let Some((riblets, experience)) = self.wallet {
            combatant.riblets = riblets;
            combatant.experience = experience;
        }
        if let Some(gear) = &self.gear {
            combatant.weapon = gear.weapon;
            combatant.armour = gear.armour;
            combatant.bag = gear.bag.clone();
        }
        if let Some(statuses) = &self.statuses {
            combatant.statuses = statuses.clone();
        }
        if let Some(target) = self.target {
            combatant.target = target;
        }
        if let Some(behavior) = self.behavior {
            combatant.behavior = behavior;
        }
        if let Some(pending_drop) = self.pending_drop {
            combatant.pending_drop = pending_drop;
        }
        if let Some(position) = self.position {
            combatant.position = position;
        }
        if let Some(exhaustion) = self.exhaustion {
            combatant.exhaustion = exhaustion;
        }
    }

    /// Rewrites item ids (provisional ids replaced by store-assigned ones).
    pub fn remap_items(&mut self, remap: impl Fn(ItemId) -> ItemId) {
        if let Some(gear) = self.gear.as_mut() {
            gear.weapon = gear.weapon.map(&remap);
            gear.armour = gear.armour.map(&remap);
            for item in gear.bag.iter_mut() {
                *item = remap(*item);
            }
        }
        if let Some(Some(pending)) = self.pending_drop.as_mut() {
            pending.item = remap(pending.item);
        }
    }
}
