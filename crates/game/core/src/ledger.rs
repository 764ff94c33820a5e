//! Ion ledger helpers.
//!
//! Pure gating functions for heal, cast and convert. Nothing here mutates a
//! combatant; callers receive the planned balances and apply them.

use crate::config::CombatConfig;
use crate::env::ItemDefinition;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ItemId, ItemInstance, Origin};

/// Conversion refused by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerError {
    #[error("item {0} is native starter gear and cannot be converted")]
    NativeItem(ItemId),

    #[error("item {0} is a broken placeholder and cannot be converted")]
    BrokenItem(ItemId),

    #[error("item {0} has no ion value")]
    Worthless(ItemId),
}

impl GameError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NativeItem(_) => "LEDGER_NATIVE_ITEM",
            Self::BrokenItem(_) => "LEDGER_BROKEN_ITEM",
            Self::Worthless(_) => "LEDGER_WORTHLESS_ITEM",
        }
    }
}

pub fn can_afford(balance: i32, cost: i32) -> bool {
    balance >= cost.max(0)
}

/// Ion cost of a heal for a monster of `level`.
pub fn heal_cost(level: u16, config: &CombatConfig) -> i32 {
    i32::from(level.max(1)) * config.heal_cost
}

/// HP restored by one heal.
pub fn heal_amount(level: u16, config: &CombatConfig) -> i32 {
    i32::from(level.max(1)) + config.heal_bonus
}

/// Plans a heal.
///
/// Restored HP never exceeds the maximum, and the cost is only charged when
/// the balance covers it and at least one HP is restored.
///
/// # Returns
///
/// `(new_balance, new_hp)`
pub fn apply_heal(balance: i32, cost: i32, hp_current: i32, hp_max: i32, heal_amount: i32) -> (i32, i32) {
    if !can_afford(balance, cost) {
        return (balance, hp_current);
    }
    let new_hp = (hp_current + heal_amount.max(0)).min(hp_max).max(hp_current);
    if new_hp == hp_current {
        return (balance, hp_current);
    }
    (balance - cost.max(0), new_hp)
}

/// Plans a cast: full cost on success, half (rounded down) on failure.
pub fn apply_cast(balance: i32, full_cost: i32, success: bool) -> i32 {
    let cost = if success { full_cost } else { full_cost / 2 };
    (balance - cost.max(0)).max(0)
}

/// Ion value of converting `item`.
///
/// # Formula
///
/// ```text
/// value = ion_value * (100 + convert_enchant_step_pct * enchant) / 100
/// ```
pub fn convert_value(item: &ItemInstance, definition: &ItemDefinition, config: &CombatConfig) -> u32 {
    let scale = 100 + config.convert_enchant_step_pct * u32::from(item.enchant);
    definition.ion_value.saturating_mul(scale) / 100
}

/// Checks conversion legality. The origin check always runs first.
pub fn check_convertible(
    item: &ItemInstance,
    definition: Option<&ItemDefinition>,
    config: &CombatConfig,
) -> Result<u32, LedgerError> {
    if item.origin == Origin::Native {
        return Err(LedgerError::NativeItem(item.id));
    }
    if item.is_broken() {
        return Err(LedgerError::BrokenItem(item.id));
    }
    let value = definition
        .map(|definition| convert_value(item, definition, config))
        .unwrap_or(0);
    if value == 0 {
        return Err(LedgerError::Worthless(item.id));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemKind, WeaponData};
    use crate::state::{CombatantId, ItemHandle, Placement};

    fn create_test_item(origin: Origin) -> ItemInstance {
        ItemInstance::new(ItemId(8), ItemHandle(3), origin, Placement::Carried(CombatantId(2)))
    }

    fn axe() -> ItemDefinition {
        ItemDefinition::new(ItemHandle(3), "axe", ItemKind::Weapon(WeaponData::melee(9)))
            .with_ion_value(400)
    }

    #[test]
    fn heal_clamps_and_charges_only_when_restoring() {
        assert_eq!(apply_heal(20, 5, 10, 30, 8), (15, 18));
        assert_eq!(apply_heal(20, 5, 28, 30, 8), (15, 30));
        assert_eq!(apply_heal(20, 5, 30, 30, 8), (20, 30));
        assert_eq!(apply_heal(4, 5, 10, 30, 8), (4, 10));
    }

    #[test]
    fn failed_cast_costs_half_rounded_down() {
        assert_eq!(apply_cast(30, 10, true), 20);
        assert_eq!(apply_cast(30, 11, false), 25);
    }

    #[test]
    fn heal_cost_scales_with_level() {
        let config = CombatConfig::default();
        assert_eq!(heal_cost(4, &config), 20);
        assert_eq!(heal_amount(4, &config), 9);
    }

    #[test]
    fn native_items_are_always_rejected() {
        let config = CombatConfig::default();
        let native = create_test_item(Origin::Native).with_enchant(10);
        assert_eq!(
            check_convertible(&native, Some(&axe()), &config),
            Err(LedgerError::NativeItem(ItemId(8)))
        );
    }

    #[test]
    fn enchantment_raises_convert_value() {
        let config = CombatConfig::default();
        let plain = create_test_item(Origin::World);
        assert_eq!(check_convertible(&plain, Some(&axe()), &config), Ok(400));

        let enchanted = plain.with_enchant(2);
        assert_eq!(check_convertible(&enchanted, Some(&axe()), &config), Ok(600));
    }

    #[test]
    fn missing_catalog_entry_is_worthless() {
        let config = CombatConfig::default();
        let item = create_test_item(Origin::World);
        assert_eq!(
            check_convertible(&item, None, &config),
            Err(LedgerError::Worthless(ItemId(8)))
        );
    }
}
