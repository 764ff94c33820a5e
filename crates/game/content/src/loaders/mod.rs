//! Content loaders for reading combat data from files.
//!
//! Every loader turns a file into a `combat-core` value directly, relying on
//! the core's serde derives.

pub mod config;
pub mod factory;
pub mod item;
pub mod species;

pub use config::{ConfigLoader, apply_json_overrides};
pub use factory::{ContentBundle, ContentFactory};
pub use item::ItemLoader;
pub use species::SpeciesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
