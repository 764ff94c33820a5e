//! Store contracts and the intent batch written through them.
//!
//! The core never performs storage I/O while resolving a tick. It stages
//! every mutation on a cloned [`CombatWorld`], and once the staged world
//! passes the commit-time invariant check the difference between the two
//! snapshots is turned into an ordered [`IntentBatch`]. [`commit_batch`]
//! replays that batch against the item and combatant stores.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    Combatant, CombatantId, CombatantPatch, CombatWorld, ItemHandle, ItemId, ItemInstance, Origin,
    Placement, Position,
};

/// Errors raised by store implementations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreError {
    #[error("item {0} not found in store")]
    UnknownItem(ItemId),

    #[error("combatant {0} not found in store")]
    UnknownCombatant(CombatantId),

    #[error("item {0} was minted but never placed")]
    Unplaced(ItemId),

    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

impl GameError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unavailable(_) => ErrorSeverity::Recoverable,
            Self::UnknownItem(_) | Self::UnknownCombatant(_) => ErrorSeverity::Internal,
            Self::Unplaced(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "STORE_UNKNOWN_ITEM",
            Self::UnknownCombatant(_) => "STORE_UNKNOWN_COMBATANT",
            Self::Unplaced(_) => "STORE_UNPLACED_ITEM",
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

/// Where a moved item ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Destination {
    Ground(Position),
    Owner(CombatantId),
}

impl From<Placement> for Destination {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Ground(position) => Self::Ground(position),
            Placement::Carried(owner) => Self::Owner(owner),
        }
    }
}

impl From<Destination> for Placement {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Ground(position) => Self::Ground(position),
            Destination::Owner(owner) => Self::Carried(owner),
        }
    }
}

/// Item registry contract. Every call is atomic from the core's view.
pub trait ItemStore: Send + Sync {
    /// Creates a new instance. The store assigns the id.
    fn mint(&self, template: ItemHandle, origin: Origin) -> Result<ItemId, StoreError>;

    fn move_item(&self, item: ItemId, destination: Destination) -> Result<(), StoreError>;

    fn get_condition(&self, item: ItemId) -> Result<Option<u8>, StoreError>;

    fn set_condition(&self, item: ItemId, condition: u8) -> Result<(), StoreError>;

    /// Replaces the instance's template with a broken placeholder.
    fn crack(&self, item: ItemId, into: ItemHandle) -> Result<ItemInstance, StoreError>;

    /// Takes the instance out of play (conversion or vaporization).
    fn consume(&self, item: ItemId) -> Result<(), StoreError>;

    fn get(&self, item: ItemId) -> Result<ItemInstance, StoreError>;
}

/// Combatant registry contract.
pub trait CombatantStore: Send + Sync {
    fn get(&self, id: CombatantId) -> Result<Combatant, StoreError>;

    fn update_fields(&self, patch: &CombatantPatch) -> Result<(), StoreError>;
}

/// One store mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Mint under a provisional id, then place.
    Mint {
        provisional: ItemId,
        template: ItemHandle,
        origin: Origin,
        destination: Destination,
    },
    Crack {
        item: ItemId,
        into: ItemHandle,
    },
    SetCondition {
        item: ItemId,
        condition: u8,
    },
    Move {
        item: ItemId,
        destination: Destination,
    },
    Consume {
        item: ItemId,
    },
    UpdateCombatant(CombatantPatch),
}

/// Ordered intents produced by one tick.
///
/// Order: mints, cracks, condition updates, moves, consumes, then combatant
/// patches. Within each group items go in id order and combatants in id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntentBatch {
    intents: Vec<Intent>,
}

impl IntentBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the batch that turns `before` into `staged`.
    pub fn from_worlds(before: &CombatWorld, staged: &CombatWorld) -> Self {
        let mut mints = Vec::new();
        let mut cracks = Vec::new();
        let mut conditions = Vec::new();
        let mut moves = Vec::new();

        for item in staged.items() {
            let Some(previous) = before.item(item.id) else {
                mints.push(Intent::Mint {
                    provisional: item.id,
                    template: item.template,
                    origin: item.origin,
                    destination: item.placement.into(),
                });
                continue;
            };

            if previous.template != item.template && item.is_broken() {
                cracks.push(Intent::Crack {
                    item: item.id,
                    into: item.template,
                });
            } else if let Some(condition) = item.condition {
                if previous.condition != item.condition {
                    conditions.push(Intent::SetCondition {
                        item: item.id,
                        condition,
                    });
                }
            }

            if previous.placement != item.placement {
                moves.push(Intent::Move {
                    item: item.id,
                    destination: item.placement.into(),
                });
            }
        }

        let consumes = before
            .items()
            .filter(|item| staged.item(item.id).is_none())
            .map(|item| Intent::Consume { item: item.id });

        let patches = staged.combatants().filter_map(|after| {
            let previous = before.combatant(after.id)?;
            CombatantPatch::diff(previous, after).map(Intent::UpdateCombatant)
        });

        let mut intents = mints;
        intents.extend(cracks);
        intents.extend(conditions);
        intents.extend(moves);
        intents.extend(consumes);
        intents.extend(patches);
        Self { intents }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Provisional-to-final id mapping returned by [`commit_batch`].
pub type IdRemap = BTreeMap<ItemId, ItemId>;

/// Writes `batch` through the stores in order.
///
/// Provisional ids of minted items are replaced by the ids the item store
/// assigns, both in later intents and in combatant patches.
pub fn commit_batch(
    items: &dyn ItemStore,
    combatants: &dyn CombatantStore,
    batch: &IntentBatch,
) -> Result<IdRemap, StoreError> {
    let mut remap = IdRemap::new();
    let resolve = |remap: &IdRemap, id: ItemId| remap.get(&id).copied().unwrap_or(id);

    for intent in batch.intents() {
        match intent {
            Intent::Mint {
                provisional,
                template,
                origin,
                destination,
            } => {
                let id = items.mint(*template, *origin)?;
                items.move_item(id, *destination)?;
                remap.insert(*provisional, id);
            }
            Intent::Crack { item, into } => {
                items.crack(resolve(&remap, *item), *into)?;
            }
            Intent::SetCondition { item, condition } => {
                items.set_condition(resolve(&remap, *item), *condition)?;
            }
            Intent::Move { item, destination } => {
                items.move_item(resolve(&remap, *item), *destination)?;
            }
            Intent::Consume { item } => {
                items.consume(resolve(&remap, *item))?;
            }
            Intent::UpdateCombatant(patch) => {
                let mut patch = patch.clone();
                patch.remap_items(|id| resolve(&remap, id));
                combatants.update_fields(&patch)?;
            }
        }
    }

    tracing::debug!(intents = batch.len(), minted = remap.len(), "batch committed");
    Ok(remap)
}
