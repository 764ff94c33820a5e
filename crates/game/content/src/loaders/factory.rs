//! Content factory for loading a data directory in one go.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, ItemCatalog, SpeciesTable};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, SpeciesLoader};

/// Everything a combat session reads from content files.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub items: ItemCatalog,
    pub species: SpeciesTable,
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── overrides.json   (optional)
/// ├── items.ron
/// └── species.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const OVERRIDES_FILE: &'static str = "overrides.json";
    pub const ITEMS_FILE: &'static str = "items.ron";
    pub const SPECIES_FILE: &'static str = "species.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`, applying
    /// `overrides.json` when it exists.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        let overrides = self.data_dir.join(Self::OVERRIDES_FILE);
        if overrides.is_file() {
            ConfigLoader::load_with_overrides(&path, &overrides)
        } else {
            ConfigLoader::load(&path)
        }
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        let path = self.data_dir.join(Self::ITEMS_FILE);
        ItemLoader::load(&path)
    }

    /// Load species table from `species.ron`.
    pub fn load_species(&self) -> LoadResult<SpeciesTable> {
        let path = self.data_dir.join(Self::SPECIES_FILE);
        SpeciesLoader::load(&path)
    }

    /// Load config, items and species together.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            config: self.load_config()?,
            items: self.load_items()?,
            species: self.load_species()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
