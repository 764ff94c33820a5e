use std::collections::BTreeMap;

use crate::state::ItemHandle;

/// Read-only access to the item catalog.
///
/// The core never fails on a missing definition: callers degrade to a
/// zero-effect default and log the anomaly.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, handle: ItemHandle) -> Option<ItemDefinition>;

    /// Looks up a definition, falling back to the built-in placeholders for
    /// broken gear and skulls.
    fn resolve(&self, handle: ItemHandle) -> Option<ItemDefinition> {
        ItemDefinition::placeholder(handle).or_else(|| self.definition(handle))
    }
}

/// Item definition with common fields and type-specific data.
///
/// # Design: Base + Kind Pattern
///
/// - Base struct holds common fields (handle, ion value, unbreakable flag)
/// - `kind` enum holds type-specific data (weapon powers, armour class)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub handle: ItemHandle,
    pub name: String,
    pub kind: ItemKind,
    /// Ions credited when the item is converted. Zero means not convertible.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ion_value: u32,
    /// Unbreakable items never lose condition.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unbreakable: bool,
}

impl ItemDefinition {
    pub fn new(handle: ItemHandle, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            handle,
            name: name.into(),
            kind,
            ion_value: 0,
            unbreakable: false,
        }
    }

    #[must_use]
    pub fn with_ion_value(mut self, ion_value: u32) -> Self {
        self.ion_value = ion_value;
        self
    }

    #[must_use]
    pub fn unbreakable(mut self) -> Self {
        self.unbreakable = true;
        self
    }

    /// Built-in definitions for reserved handles.
    pub fn placeholder(handle: ItemHandle) -> Option<Self> {
        match handle {
            ItemHandle::BROKEN_WEAPON => Some(Self::new(
                handle,
                "broken weapon",
                ItemKind::Weapon(WeaponData::melee(0)),
            )),
            ItemHandle::BROKEN_ARMOUR => Some(Self::new(
                handle,
                "broken armour",
                ItemKind::Armour(ArmourData::default()),
            )),
            ItemHandle::SKULL => Some(Self::new(handle, "skull", ItemKind::Trinket)),
            _ => None,
        }
    }

    pub fn weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }

    pub fn armour(&self) -> Option<&ArmourData> {
        match &self.kind {
            ItemKind::Armour(data) => Some(data),
            _ => None,
        }
    }
}

/// Item type with type-specific data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Wieldable weapon.
    Weapon(WeaponData),

    /// Wearable armour.
    Armour(ArmourData),

    /// Anything else: skulls, keys, junk.
    Trinket,
}

/// Weapon-specific data.
///
/// A weapon may support melee, bolts, or both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponData {
    #[cfg_attr(feature = "serde", serde(default))]
    pub melee_power: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bolt_power: Option<u32>,
}

impl WeaponData {
    pub fn melee(power: u32) -> Self {
        Self {
            melee_power: Some(power),
            bolt_power: None,
        }
    }

    /// Weapons with bolt power count as ranged.
    pub fn is_ranged(&self) -> bool {
        self.bolt_power.is_some()
    }

    pub fn bolt(power: u32) -> Self {
        Self {
            melee_power: None,
            bolt_power: Some(power),
        }
    }
}

/// Armour-specific data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmourData {
    pub armour_class: u32,
}

/// In-memory item catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCatalog {
    definitions: BTreeMap<ItemHandle, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, replacing any previous one with the same handle.
    pub fn insert(&mut self, definition: ItemDefinition) -> Option<ItemDefinition> {
        self.definitions.insert(definition.handle, definition)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<ItemDefinition> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = ItemDefinition>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

impl ItemOracle for ItemCatalog {
    fn definition(&self, handle: ItemHandle) -> Option<ItemDefinition> {
        self.definitions.get(&handle).cloned()
    }
}
