//! Combat world snapshot.
//!
//! [`CombatWorld`] holds every combatant and item one tick can touch, plus
//! the ledger of resolved deaths. The orchestrator clones it, stages the
//! tick's mutations on the clone, and hands the clone back only after the
//! commit-time invariant check passes.
pub mod error;
pub mod invariants;
pub mod patch;
pub mod types;

use std::collections::BTreeMap;

pub use error::StateError;
pub use invariants::{InvariantViolation, check_invariants};
pub use patch::{CombatantFields, CombatantPatch};
pub use types::{
    AbilityScores, AiBehavior, Combatant, CombatantId, CombatantKind, InnateAttack, ItemHandle,
    ItemId, ItemInstance, Origin, PendingDrop, Placement, Position, ResourceMeter,
    StatusApplyOutcome, StatusEffect, StatusEffects, StatusKind, Tick,
};

use crate::loot::{DeathKey, LootOutcome, LootReport};

/// Snapshot of the combat-relevant world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatWorld {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at world creation and never modified.
    pub game_seed: u64,

    /// Tick most recently resolved.
    pub tick: Tick,

    combatants: BTreeMap<CombatantId, Combatant>,
    items: BTreeMap<ItemId, ItemInstance>,

    /// Provisional id allocator for items minted during a tick.
    ///
    /// The item store assigns final ids on commit.
    next_item_id: u64,

    /// Loot passes already applied, keyed by death.
    deaths: BTreeMap<DeathKey, LootReport>,
}

impl CombatWorld {
    pub fn new(game_seed: u64) -> Self {
        Self {
            game_seed,
            next_item_id: 1,
            ..Self::default()
        }
    }

    // ========================================================================
    // Combatants
    // ========================================================================

    pub fn insert_combatant(&mut self, combatant: Combatant) -> Result<(), StateError> {
        if self.combatants.contains_key(&combatant.id) {
            return Err(StateError::DuplicateCombatant(combatant.id));
        }
        self.combatants.insert(combatant.id, combatant);
        Ok(())
    }

    /// Replaces a combatant record wholesale (used when a store reload arrives).
    pub fn replace_combatant(&mut self, combatant: Combatant) {
        self.combatants.insert(combatant.id, combatant);
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn try_combatant(&self, id: CombatantId) -> Result<&Combatant, StateError> {
        self.combatant(id).ok_or(StateError::UnknownCombatant(id))
    }

    pub fn try_combatant_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, StateError> {
        self.combatants
            .get_mut(&id)
            .ok_or(StateError::UnknownCombatant(id))
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    /// Living monsters standing at `position`, in id order.
    pub fn monsters_at(&self, position: Position) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .values()
            .filter(move |c| c.is_monster() && c.is_alive() && c.position == position)
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub fn insert_item(&mut self, item: ItemInstance) -> Result<(), StateError> {
        if self.items.contains_key(&item.id) {
            return Err(StateError::DuplicateItem(item.id));
        }
        self.next_item_id = self.next_item_id.max(item.id.0 + 1);
        self.items.insert(item.id, item);
        Ok(())
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemInstance> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut ItemInstance> {
        self.items.get_mut(&id)
    }

    pub fn try_item(&self, id: ItemId) -> Result<&ItemInstance, StateError> {
        self.item(id).ok_or(StateError::UnknownItem(id))
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemInstance> {
        self.items.values()
    }

    /// Removes an item from play entirely (conversion).
    pub fn remove_item(&mut self, id: ItemId) -> Option<ItemInstance> {
        self.items.remove(&id)
    }

    /// Allocates an id for an item minted during this tick.
    pub fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id.max(1));
        self.next_item_id = id.0 + 1;
        id
    }

    /// Items lying at `position`, in id order.
    pub fn ground_at(&self, position: Position) -> Vec<ItemId> {
        self.items
            .values()
            .filter(|item| item.placement == Placement::Ground(position))
            .map(|item| item.id)
            .collect()
    }

    /// Renames items after the store assigned final ids to minted ones.
    pub fn remap_items(&mut self, remap: &BTreeMap<ItemId, ItemId>) {
        if remap.is_empty() {
            return;
        }
        let resolve = |id: ItemId| remap.get(&id).copied().unwrap_or(id);

        let items = std::mem::take(&mut self.items);
        self.items = items
            .into_values()
            .map(|mut item| {
                item.id = resolve(item.id);
                (item.id, item)
            })
            .collect();

        for combatant in self.combatants.values_mut() {
            combatant.weapon = combatant.weapon.map(resolve);
            combatant.armour = combatant.armour.map(resolve);
            for held in combatant.bag.iter_mut() {
                *held = resolve(*held);
            }
            if let Some(pending) = combatant.pending_drop.as_mut() {
                pending.item = resolve(pending.item);
            }
        }

        for report in self.deaths.values_mut() {
            for outcome in report.outcomes.iter_mut() {
                if let LootOutcome::Spawned { item, .. } = outcome {
                    *item = resolve(*item);
                }
            }
        }

        let highest = self.items.keys().next_back().map(|id| id.0).unwrap_or(0);
        self.next_item_id = self.next_item_id.max(highest + 1);
    }

    // ========================================================================
    // Deaths
    // ========================================================================

    pub fn death_report(&self, key: &DeathKey) -> Option<&LootReport> {
        self.deaths.get(key)
    }

    pub fn record_death(&mut self, report: LootReport) {
        self.deaths.insert(report.record.key(), report);
    }

    pub fn deaths(&self) -> impl Iterator<Item = &LootReport> {
        self.deaths.values()
    }

    /// Forgets deaths resolved before `tick`; their loot is already committed.
    pub fn prune_deaths_before(&mut self, tick: Tick) {
        self.deaths.retain(|key, _| key.tick >= tick);
    }
}
