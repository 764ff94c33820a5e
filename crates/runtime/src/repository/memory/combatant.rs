//! In-memory CombatantStore implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::state::CombatantPatch;
use combat_core::{Combatant, CombatantId, CombatantStore, StoreError};

use crate::repository::poisoned;

/// In-memory implementation of CombatantStore.
pub struct InMemoryCombatantStore {
    combatants: RwLock<HashMap<CombatantId, Combatant>>,
}

impl InMemoryCombatantStore {
    pub fn new() -> Self {
        Self {
            combatants: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_combatants<'a>(combatants: impl IntoIterator<Item = &'a Combatant>) -> Self {
        let combatants = combatants.into_iter().map(|c| (c.id, c.clone())).collect();
        Self {
            combatants: RwLock::new(combatants),
        }
    }

    /// Registers or replaces a combatant.
    pub fn insert(&self, combatant: Combatant) -> Result<(), StoreError> {
        let mut combatants = self
            .combatants
            .write()
            .map_err(|_| poisoned("combatant store"))?;
        combatants.insert(combatant.id, combatant);
        Ok(())
    }

    /// Every combatant, in id order.
    pub fn snapshot(&self) -> Result<Vec<Combatant>, StoreError> {
        let combatants = self
            .combatants
            .read()
            .map_err(|_| poisoned("combatant store"))?;
        let mut all: Vec<Combatant> = combatants.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }
}

impl Default for InMemoryCombatantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatantStore for InMemoryCombatantStore {
    fn get(&self, id: CombatantId) -> Result<Combatant, StoreError> {
        let combatants = self
            .combatants
            .read()
            .map_err(|_| poisoned("combatant store"))?;
        combatants
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownCombatant(id))
    }

    fn update_fields(&self, patch: &CombatantPatch) -> Result<(), StoreError> {
        let mut combatants = self
            .combatants
            .write()
            .map_err(|_| poisoned("combatant store"))?;
        let combatant = combatants
            .get_mut(&patch.id)
            .ok_or(StoreError::UnknownCombatant(patch.id))?;
        patch.apply_to(combatant);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::SpeciesId;

    fn create_test_monster() -> Combatant {
        Combatant::monster(CombatantId(3), "Ghoul", SpeciesId(1)).with_hp(30, 30)
    }

    #[test]
    fn patches_touch_only_flagged_fields() {
        let store = InMemoryCombatantStore::with_combatants([&create_test_monster()]);

        let before = create_test_monster();
        let mut after = before.clone();
        after.hp.current = 12;
        after.ions = 77;
        let patch = CombatantPatch::diff(&before, &after).unwrap();

        // Out-of-band change the patch must not clobber.
        let mut renamed = store.get(CombatantId(3)).unwrap();
        renamed.name = "Ghast".to_string();
        store.insert(renamed).unwrap();

        store.update_fields(&patch).unwrap();
        let stored = store.get(CombatantId(3)).unwrap();
        assert_eq!(stored.hp.current, 12);
        assert_eq!(stored.ions, 77);
        assert_eq!(stored.name, "Ghast");
    }

    #[test]
    fn unknown_combatants_are_reported() {
        let store = InMemoryCombatantStore::new();
        assert_eq!(
            store.get(CombatantId(8)).unwrap_err(),
            StoreError::UnknownCombatant(CombatantId(8))
        );
    }
}
