//! Data-driven combat content and loaders.
//!
//! This crate reads the static data the combat core consults through its
//! oracles:
//! - Combat configuration (TOML, plus an optional JSON override file)
//! - Item catalogs (RON)
//! - Species tables (RON)
//!
//! Content is consumed by the runtime and never appears in combat state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, ItemLoader, LoadResult, SpeciesLoader,
    apply_json_overrides,
};
