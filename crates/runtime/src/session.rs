//! Combat session: runs ticks and commits them through the stores.
//!
//! A session owns the content (config, item catalog, species table), the
//! roll source, the committed [`CombatWorld`] and the audit log. Each
//! [`CombatSession::tick`] asks the core to resolve one tick, writes the
//! resulting intent batch through the item and combatant stores, renames
//! minted items to their store-assigned ids, and appends the events to the
//! log. A rejected tick leaves the world, stores and log untouched.

use std::sync::Arc;

use combat_content::ContentBundle;
use combat_core::{
    CombatConfig, CombatEnv, CombatEvent, Combatant, CombatantId, CombatantStore, CombatWorld,
    EventSink, IdRemap, ItemCatalog, ItemId, ItemOracle, ItemStore, PcgRng, PlayerAction, RngOracle,
    RollRecord, SpeciesOracle, SpeciesTable, Tick, TickError, TickInput, TurnOrchestrator,
    commit_batch,
};
use serde::Serialize;

use crate::error::{Result, RuntimeError};
use crate::repository::{InMemoryCombatantStore, InMemoryEventLog, InMemoryItemStore};

/// What one committed tick produced.
#[derive(Clone, Debug, Serialize)]
pub struct TickReport {
    pub tick: Tick,
    /// Events with store-assigned item ids.
    pub events: Vec<CombatEvent>,
    pub rolls: Vec<RollRecord>,
    /// Provisional-to-final ids of items minted this tick.
    pub minted: IdRemap,
    pub intents: usize,
}

/// A running combat session.
pub struct CombatSession {
    config: CombatConfig,
    items: ItemCatalog,
    species: SpeciesTable,
    rng: Box<dyn RngOracle>,
    world: CombatWorld,
    item_store: Arc<dyn ItemStore>,
    combatant_store: Arc<dyn CombatantStore>,
    log: InMemoryEventLog,
}

impl CombatSession {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Resolves and commits one tick.
    pub fn tick(&mut self, action: PlayerAction) -> Result<TickReport> {
        let env = CombatEnv::new(
            Some(&self.items as &dyn ItemOracle),
            Some(&self.species as &dyn SpeciesOracle),
            Some(self.rng.as_ref()),
        );
        let orchestrator = TurnOrchestrator::new(env, &self.config);
        let outcome = match orchestrator.resolve(&self.world, &TickInput::new(action)) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::info!(
                    session = self.log.session_id(),
                    tick = %self.world.tick.next(),
                    ?action,
                    %error,
                    "tick rejected"
                );
                return Err(error.into());
            }
        };

        let minted = commit_batch(
            self.item_store.as_ref(),
            self.combatant_store.as_ref(),
            &outcome.batch,
        )
        .map_err(TickError::from)?;

        let mut world = outcome.world;
        world.remap_items(&minted);
        self.world = world;

        let resolve = |id: ItemId| minted.get(&id).copied().unwrap_or(id);
        let mut events = outcome.events;
        for event in events.iter_mut() {
            event.remap_items(resolve);
        }
        self.log.record_all(events.iter().cloned());

        tracing::info!(
            session = self.log.session_id(),
            tick = %outcome.tick,
            ?action,
            events = events.len(),
            intents = outcome.batch.len(),
            minted = minted.len(),
            "tick committed"
        );

        Ok(TickReport {
            tick: outcome.tick,
            events,
            rolls: outcome.rolls,
            intents: outcome.batch.len(),
            minted,
        })
    }

    /// Runs `actions` in order, stopping at the first failure.
    pub fn run(&mut self, actions: impl IntoIterator<Item = PlayerAction>) -> Result<Vec<TickReport>> {
        actions.into_iter().map(|action| self.tick(action)).collect()
    }

    pub fn world(&self) -> &CombatWorld {
        &self.world
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.world.combatant(CombatantId::PLAYER)
    }

    pub fn log(&self) -> &InMemoryEventLog {
        &self.log
    }

    /// Golden-log digest of every committed event so far.
    pub fn digest(&self) -> Result<String> {
        Ok(self.log.digest()?)
    }

    pub fn item_store(&self) -> &dyn ItemStore {
        self.item_store.as_ref()
    }

    pub fn combatant_store(&self) -> &dyn CombatantStore {
        self.combatant_store.as_ref()
    }
}

/// Builder for [`CombatSession`].
pub struct SessionBuilder {
    session_id: String,
    content: ContentBundle,
    rng: Option<Box<dyn RngOracle>>,
    world: Option<CombatWorld>,
    spawns: Vec<Combatant>,
    stores: Option<(Arc<dyn ItemStore>, Arc<dyn CombatantStore>)>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            session_id: "local".to_string(),
            content: ContentBundle::default(),
            rng: None,
            world: None,
            spawns: Vec::new(),
            stores: None,
        }
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Use config, items and species loaded from a data directory.
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = content;
        self
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.content.config = config;
        self
    }

    pub fn items(mut self, items: ItemCatalog) -> Self {
        self.content.items = items;
        self
    }

    pub fn species(mut self, species: SpeciesTable) -> Self {
        self.content.species = species;
        self
    }

    /// Roll source. Defaults to [`PcgRng`].
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Starting world. Defaults to an empty world seeded from the config.
    pub fn world(mut self, world: CombatWorld) -> Self {
        self.world = Some(world);
        self
    }

    /// Adds a combatant to the starting world. Monsters without an innate
    /// attack take their species' profile.
    pub fn spawn(mut self, combatant: Combatant) -> Self {
        self.spawns.push(combatant);
        self
    }

    /// Use external stores that already mirror the starting world, species
    /// innate attacks included.
    pub fn stores(mut self, items: Arc<dyn ItemStore>, combatants: Arc<dyn CombatantStore>) -> Self {
        self.stores = Some((items, combatants));
        self
    }

    /// Build the session
    pub fn build(self) -> Result<CombatSession> {
        let ContentBundle {
            config,
            items,
            species,
        } = self.content;

        let mut world = self
            .world
            .unwrap_or_else(|| CombatWorld::new(config.seed.unwrap_or_default()));
        for combatant in self.spawns {
            world.insert_combatant(combatant).map_err(RuntimeError::Seed)?;
        }

        let monsters: Vec<CombatantId> = world
            .combatants()
            .filter(|c| c.is_monster())
            .map(|c| c.id)
            .collect();
        for id in monsters {
            let monster = world.try_combatant_mut(id).map_err(RuntimeError::Seed)?;
            let Some(kind) = monster.species else {
                continue;
            };
            let profile = species.profile(kind).ok_or(RuntimeError::UnknownSpecies {
                monster: id,
                species: kind,
            })?;
            if !monster.innate.is_defined() {
                monster.innate = profile.innate.clone();
            }
        }

        if world.combatant(CombatantId::PLAYER).is_none() {
            return Err(RuntimeError::MissingPlayer);
        }

        let (item_store, combatant_store) = match self.stores {
            Some(stores) => stores,
            None => (
                Arc::new(InMemoryItemStore::with_items(world.items())) as Arc<dyn ItemStore>,
                Arc::new(InMemoryCombatantStore::with_combatants(world.combatants()))
                    as Arc<dyn CombatantStore>,
            ),
        };

        tracing::debug!(
            session = %self.session_id,
            combatants = world.combatants().count(),
            items = world.items().count(),
            "session built"
        );

        Ok(CombatSession {
            config,
            items,
            species,
            rng: self.rng.unwrap_or_else(|| Box::new(PcgRng)),
            world,
            item_store,
            combatant_store,
            log: InMemoryEventLog::new(self.session_id),
        })
    }
}
