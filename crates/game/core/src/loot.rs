//! Death loot ordering.
//!
//! A death produces a fixed-order drop list: bag entries as carried, then a
//! skull (monsters only), then worn armour. Entries spawn on the victim's
//! tile while it has room; once the tile is full every remaining entry is
//! vaporized and recorded. Each death is resolved once: re-running the pass
//! for the same death record returns the stored report without touching the
//! world again.

use crate::config::CombatConfig;
use crate::state::{
    Combatant, CombatantId, CombatWorld, ItemHandle, ItemId, ItemInstance, Origin, Placement,
    Position, Tick,
};

/// Identifies one death for idempotent loot handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathKey {
    pub victim: CombatantId,
    pub tick: Tick,
}

/// One entry of the drop list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootEntry {
    Item(ItemId),
    Skull,
}

/// What happened to a drop-list entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootOutcome {
    /// Placed on the ground as `item`.
    Spawned { entry: LootEntry, item: ItemId },
    /// Tile full; discarded.
    Vaporized { entry: LootEntry },
}

impl LootOutcome {
    pub fn entry(&self) -> LootEntry {
        match self {
            Self::Spawned { entry, .. } | Self::Vaporized { entry } => *entry,
        }
    }

    pub fn is_spawned(&self) -> bool {
        matches!(self, Self::Spawned { .. })
    }
}

/// Everything needed to replay a death's loot pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathRecord {
    pub victim: CombatantId,
    pub killer: Option<CombatantId>,
    pub tick: Tick,
    pub position: Position,
    pub bag: Vec<ItemId>,
    pub armour: Option<ItemId>,
    pub skull: bool,
}

impl DeathRecord {
    /// Captures the victim's carried gear at the moment of death.
    pub fn capture(victim: &Combatant, killer: Option<CombatantId>, tick: Tick) -> Self {
        Self {
            victim: victim.id,
            killer,
            tick,
            position: victim.position,
            bag: victim.bag.clone(),
            armour: victim.armour,
            skull: victim.is_monster(),
        }
    }

    pub fn key(&self) -> DeathKey {
        DeathKey {
            victim: self.victim,
            tick: self.tick,
        }
    }

    /// Drop list in its fixed order.
    pub fn entries(&self) -> Vec<LootEntry> {
        let mut entries: Vec<LootEntry> = self.bag.iter().copied().map(LootEntry::Item).collect();
        if self.skull {
            entries.push(LootEntry::Skull);
        }
        if let Some(armour) = self.armour {
            entries.push(LootEntry::Item(armour));
        }
        entries
    }
}

/// Stored result of a resolved death.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootReport {
    pub record: DeathRecord,
    pub outcomes: Vec<LootOutcome>,
}

impl LootReport {
    pub fn spawned(&self) -> impl Iterator<Item = &LootOutcome> {
        self.outcomes.iter().filter(|o| o.is_spawned())
    }

    pub fn vaporized(&self) -> impl Iterator<Item = &LootOutcome> {
        self.outcomes.iter().filter(|o| !o.is_spawned())
    }
}

/// Splits the drop list at the capacity cutoff.
///
/// Returns `(entry, fits)` pairs in drop order. Once one entry does not fit,
/// none after it do either.
pub fn plan_drops(entries: &[LootEntry], occupied: usize, ground_cap: usize) -> Vec<(LootEntry, bool)> {
    let free = ground_cap.saturating_sub(occupied);
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (*entry, index < free))
        .collect()
}

/// Runs the loot pass for `record` against the staged world.
///
/// Spawned items move to the ground, a spawned skull is minted under a
/// provisional id, and vaporized items leave play. Calling this again for a
/// death already in the ledger returns the stored report unchanged.
pub fn resolve_loot(world: &mut CombatWorld, record: DeathRecord, config: &CombatConfig) -> LootReport {
    if let Some(report) = world.death_report(&record.key()) {
        return report.clone();
    }

    let occupied = world.ground_at(record.position).len();
    let plan = plan_drops(&record.entries(), occupied, config.ground_cap);

    let mut outcomes = Vec::with_capacity(plan.len());
    for (entry, fits) in plan {
        let outcome = match (entry, fits) {
            (LootEntry::Item(item_id), true) => {
                release_from_victim(world, record.victim, item_id);
                match world.item_mut(item_id) {
                    Some(item) => {
                        item.placement = Placement::Ground(record.position);
                        LootOutcome::Spawned {
                            entry,
                            item: item_id,
                        }
                    }
                    None => {
                        tracing::warn!(victim = %record.victim, item = %item_id, "loot item missing; vaporized");
                        LootOutcome::Vaporized { entry }
                    }
                }
            }
            (LootEntry::Item(item_id), false) => {
                release_from_victim(world, record.victim, item_id);
                world.remove_item(item_id);
                LootOutcome::Vaporized { entry }
            }
            (LootEntry::Skull, true) => {
                let id = world.allocate_item_id();
                let skull = ItemInstance::new(
                    id,
                    ItemHandle::SKULL,
                    Origin::World,
                    Placement::Ground(record.position),
                );
                match world.insert_item(skull) {
                    Ok(()) => LootOutcome::Spawned { entry, item: id },
                    Err(err) => {
                        tracing::warn!(victim = %record.victim, error = %err, "skull mint failed; vaporized");
                        LootOutcome::Vaporized { entry }
                    }
                }
            }
            (LootEntry::Skull, false) => LootOutcome::Vaporized { entry },
        };
        tracing::debug!(victim = %record.victim, ?outcome, "loot entry resolved");
        outcomes.push(outcome);
    }

    let report = LootReport { record, outcomes };
    world.record_death(report.clone());
    report
}

fn release_from_victim(world: &mut CombatWorld, victim: CombatantId, item: ItemId) {
    if let Some(combatant) = world.combatant_mut(victim) {
        combatant.release(item);
    }
}
