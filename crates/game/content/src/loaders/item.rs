//! Item catalog loader.

use std::path::Path;

use combat_core::{ItemCatalog, ItemDefinition, ItemHandle};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// Duplicate handles are an error; broken and skull placeholders are
    /// built in and may not be redefined.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        let file: ItemFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut catalog = ItemCatalog::new();
        for definition in file.items {
            if definition.handle.is_broken() || definition.handle == ItemHandle::SKULL {
                anyhow::bail!("Item handle {} is reserved", definition.handle.0);
            }
            let handle = definition.handle;
            if catalog.insert(definition).is_some() {
                anyhow::bail!("Duplicate item handle {} in {}", handle.0, path.display());
            }
        }
        tracing::debug!(items = catalog.len(), path = %path.display(), "item catalog loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ItemKind, ItemOracle};

    const CATALOG: &str = r#"(
    items: [
        (
            handle: (1),
            name: "Dagger",
            kind: Weapon((melee_power: Some(6))),
            ion_value: 40,
        ),
        (
            handle: (2),
            name: "Leather",
            kind: Armour((armour_class: 5)),
            ion_value: 60,
            unbreakable: true,
        ),
        (
            handle: (3),
            name: "Key",
            kind: Trinket,
        ),
    ],
)"#;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn loads_every_kind() {
        let file = write(CATALOG);
        let catalog = ItemLoader::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);

        let dagger = catalog.definition(ItemHandle(1)).unwrap();
        assert_eq!(dagger.weapon().and_then(|w| w.melee_power), Some(6));
        assert_eq!(dagger.ion_value, 40);
        assert!(!dagger.unbreakable);

        let leather = catalog.definition(ItemHandle(2)).unwrap();
        assert_eq!(leather.armour().map(|a| a.armour_class), Some(5));
        assert!(leather.unbreakable);

        let key = catalog.definition(ItemHandle(3)).unwrap();
        assert_eq!(key.kind, ItemKind::Trinket);
        assert_eq!(key.ion_value, 0);
    }

    #[test]
    fn duplicate_handles_are_rejected() {
        let file = write(
            r#"(items: [
                (handle: (1), name: "A", kind: Trinket),
                (handle: (1), name: "B", kind: Trinket),
            ])"#,
        );
        let error = ItemLoader::load(file.path()).unwrap_err();
        assert!(error.to_string().contains("Duplicate item handle"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.ron");
        let error = ItemLoader::load(&path).unwrap_err();
        assert!(error.to_string().contains("items.ron"));
    }
}
