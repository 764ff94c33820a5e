//! Traits describing read-only world data.
//!
//! Oracles expose item definitions, species data and the roll source. The
//! [`Env`] aggregate bundles them so the orchestrator can access everything
//! it needs without hard coupling to concrete implementations.
mod error;
mod items;
mod rng;
mod species;

pub use error::OracleError;
pub use items::{ArmourData, ItemCatalog, ItemDefinition, ItemKind, ItemOracle, WeaponData};
pub use rng::{Dice, PcgRng, RngOracle, RollPurpose, RollRecord, ScriptedRng, compute_seed};
pub use species::{
    DEFAULT_EMOTES, GateOverrides, READY_LINE, SpeciesId, SpeciesOracle, SpeciesProfile,
    SpeciesTable,
};

/// Aggregates read-only oracles required by the orchestrator.
pub struct Env<'a, I, S, R>
where
    I: ItemOracle + ?Sized,
    S: SpeciesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    items: Option<&'a I>,
    species: Option<&'a S>,
    rng: Option<&'a R>,
}

impl<I, S, R> Clone for Env<'_, I, S, R>
where
    I: ItemOracle + ?Sized,
    S: SpeciesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, S, R> Copy for Env<'_, I, S, R>
where
    I: ItemOracle + ?Sized,
    S: SpeciesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type CombatEnv<'a> = Env<'a, dyn ItemOracle + 'a, dyn SpeciesOracle + 'a, dyn RngOracle + 'a>;

impl<'a, I, S, R> Env<'a, I, S, R>
where
    I: ItemOracle + ?Sized,
    S: SpeciesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(items: Option<&'a I>, species: Option<&'a S>, rng: Option<&'a R>) -> Self {
        Self {
            items,
            species,
            rng,
        }
    }

    pub fn with_all(items: &'a I, species: &'a S, rng: &'a R) -> Self {
        Self::new(Some(items), Some(species), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            items: None,
            species: None,
            rng: None,
        }
    }

    /// Returns the ItemOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no items oracle was provided.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the SpeciesOracle, or an error if not available.
    pub fn species(&self) -> Result<&'a S, OracleError> {
        self.species.ok_or(OracleError::SpeciesNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, I, S, R> Env<'a, I, S, R>
where
    I: ItemOracle + 'a,
    S: SpeciesOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `CombatEnv`.
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        let items: Option<&'a dyn ItemOracle> = self.items.map(|items| items as _);
        let species: Option<&'a dyn SpeciesOracle> = self.species.map(|species| species as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(items, species, rng)
    }
}
