//! Equipment wear and cracking.
//!
//! Wear is deterministic: every damaging hit takes a fixed amount of
//! condition from each degradable item involved. An item whose condition
//! reaches zero cracks into the broken placeholder of its slot, keeping its
//! instance id, owner and origin.

use crate::env::{ItemDefinition, ItemKind};
use crate::state::{ItemHandle, ItemInstance};

/// What one qualifying hit did to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WearOutcome {
    /// Enchanted, unbreakable, already broken, or not wearable.
    Unaffected,
    Worn { condition: u8 },
    Cracked { from: ItemHandle, into: ItemHandle },
}

/// Placeholder handle an item of this kind cracks into.
pub fn broken_placeholder(definition: &ItemDefinition) -> Option<ItemHandle> {
    match definition.kind {
        ItemKind::Weapon(_) => Some(ItemHandle::BROKEN_WEAPON),
        ItemKind::Armour(_) => Some(ItemHandle::BROKEN_ARMOUR),
        ItemKind::Trinket => None,
    }
}

/// True if the item loses condition on a damaging hit.
pub fn is_degradable(item: &ItemInstance, definition: &ItemDefinition) -> bool {
    !item.is_broken()
        && !item.is_enchanted()
        && !definition.unbreakable
        && broken_placeholder(definition).is_some()
}

/// A wielded weapon that has cracked and carries no enchantment.
pub fn is_cracked_weapon(item: &ItemInstance) -> bool {
    item.template == ItemHandle::BROKEN_WEAPON && !item.is_enchanted()
}

/// Applies one hit's wear to `item`, cracking it in place when condition
/// runs out.
pub fn wear_item(item: &mut ItemInstance, definition: &ItemDefinition, wear: u8) -> WearOutcome {
    if wear == 0 || !is_degradable(item, definition) {
        return WearOutcome::Unaffected;
    }
    let Some(placeholder) = broken_placeholder(definition) else {
        return WearOutcome::Unaffected;
    };

    let current = item.condition.unwrap_or(ItemInstance::MAX_CONDITION);
    let remaining = current.saturating_sub(wear);
    if remaining == 0 {
        let from = item.template;
        item.template = placeholder;
        item.condition = None;
        return WearOutcome::Cracked {
            from,
            into: placeholder,
        };
    }

    item.condition = Some(remaining);
    WearOutcome::Worn {
        condition: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::WeaponData;
    use crate::state::{CombatantId, ItemId, Origin, Placement};

    fn create_test_item() -> ItemInstance {
        ItemInstance::new(
            ItemId(4),
            ItemHandle(11),
            Origin::World,
            Placement::Carried(CombatantId(2)),
        )
    }

    fn sword() -> ItemDefinition {
        ItemDefinition::new(ItemHandle(11), "short sword", ItemKind::Weapon(WeaponData::melee(9)))
    }

    #[test]
    fn cracks_exactly_on_twentieth_hit() {
        let mut item = create_test_item();
        let definition = sword();

        for hit in 1..20 {
            let outcome = wear_item(&mut item, &definition, 5);
            assert_eq!(
                outcome,
                WearOutcome::Worn {
                    condition: 100 - 5 * hit
                },
                "hit {hit}"
            );
        }
        let outcome = wear_item(&mut item, &definition, 5);
        assert_eq!(
            outcome,
            WearOutcome::Cracked {
                from: ItemHandle(11),
                into: ItemHandle::BROKEN_WEAPON,
            }
        );
        assert_eq!(item.id, ItemId(4));
        assert_eq!(item.condition, None);
        assert!(is_cracked_weapon(&item));
    }

    #[test]
    fn enchanted_and_unbreakable_items_never_wear() {
        let mut enchanted = create_test_item().with_enchant(1);
        assert_eq!(wear_item(&mut enchanted, &sword(), 5), WearOutcome::Unaffected);
        assert_eq!(enchanted.condition, Some(100));

        let mut plain = create_test_item();
        let sturdy = sword().unbreakable();
        assert_eq!(wear_item(&mut plain, &sturdy, 5), WearOutcome::Unaffected);
    }

    #[test]
    fn broken_placeholder_is_terminal() {
        let mut item = create_test_item();
        item.template = ItemHandle::BROKEN_WEAPON;
        item.condition = None;
        let definition = ItemDefinition::placeholder(ItemHandle::BROKEN_WEAPON).unwrap();
        assert_eq!(wear_item(&mut item, &definition, 5), WearOutcome::Unaffected);
    }
}
