//! Staged world plus everything a tick phase needs to mutate it.

use crate::config::CombatConfig;
use crate::engine::errors::{ActionError, TickError};
use crate::env::{Dice, ItemOracle, SpeciesOracle, SpeciesProfile};
use crate::event::{CombatEvent, EventKind, EventPayload};
use crate::loot::{DeathRecord, LootEntry, LootOutcome, resolve_loot};
use crate::state::{
    AiBehavior, Combatant, CombatantId, CombatWorld, ItemId, Placement, StateError, Tick,
};

pub(crate) struct TickContext<'a> {
    pub world: CombatWorld,
    pub items: &'a dyn ItemOracle,
    pub species: &'a dyn SpeciesOracle,
    pub config: &'a CombatConfig,
    pub dice: Dice<'a>,
    pub events: Vec<CombatEvent>,
}

impl<'a> TickContext<'a> {
    pub fn tick(&self) -> Tick {
        self.dice.tick()
    }

    pub fn event(&self, kind: EventKind, actor: CombatantId) -> CombatEvent {
        CombatEvent::new(self.tick(), kind, actor)
    }

    pub fn emit(&mut self, event: CombatEvent) {
        tracing::trace!(kind = %event.kind, actor = %event.actor, "event");
        self.events.push(event);
    }

    pub fn reject(&self, error: ActionError) -> TickError {
        tracing::debug!(tick = %self.tick(), %error, "action rejected");
        TickError::rejected(error, self.tick())
    }

    pub fn combatant(&self, id: CombatantId) -> Result<&Combatant, StateError> {
        self.world.try_combatant(id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, StateError> {
        self.world.try_combatant_mut(id)
    }

    /// Species profile of a monster, if the table knows it.
    pub fn profile(&self, id: CombatantId) -> Option<&'a SpeciesProfile> {
        let species = self.world.combatant(id)?.species?;
        let table: &'a dyn SpeciesOracle = self.species;
        let profile = table.profile(species);
        if profile.is_none() {
            tracing::warn!(monster = %id, %species, "species missing from table; using global thresholds");
        }
        profile
    }

    pub fn set_behavior(&mut self, id: CombatantId, behavior: AiBehavior) -> Result<(), StateError> {
        self.combatant_mut(id)?.behavior = behavior;
        Ok(())
    }

    /// Clears the `a`/`b` pairing on both sides.
    pub fn clear_pairing(&mut self, a: CombatantId, b: CombatantId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(combatant) = self.world.combatant_mut(from) {
                if combatant.target == Some(to) {
                    combatant.target = None;
                }
            }
        }
    }

    /// Clears every pairing that involves `id`, returning the former partners.
    pub fn release_pairings(&mut self, id: CombatantId) -> Vec<CombatantId> {
        let partners: Vec<CombatantId> = self
            .world
            .combatants()
            .filter(|c| c.id != id && c.target == Some(id))
            .map(|c| c.id)
            .collect();
        for &partner in &partners {
            self.clear_pairing(id, partner);
        }
        if let Some(combatant) = self.world.combatant_mut(id) {
            combatant.target = None;
        }
        partners
    }

    /// Drops a carried item at its owner's feet.
    ///
    /// A full tile vaporizes the item instead; both outcomes are recorded.
    pub fn drop_item(&mut self, owner: CombatantId, item: ItemId) -> Result<(), StateError> {
        let position = {
            let combatant = self.combatant_mut(owner)?;
            combatant.release(item);
            combatant.position
        };
        let template = self.world.try_item(item)?.template;

        if self.world.ground_at(position).len() >= self.config.ground_cap {
            self.world.remove_item(item);
            tracing::debug!(%owner, %item, %position, "tile full; dropped item vaporized");
            let outcome = LootOutcome::Vaporized {
                entry: LootEntry::Item(item),
            };
            let event = CombatEvent::loot(self.tick(), owner, outcome);
            self.emit(event);
            return Ok(());
        }

        if let Some(instance) = self.world.item_mut(item) {
            instance.placement = Placement::Ground(position);
        }
        let event = self
            .event(EventKind::Drop, owner)
            .with_payload(EventPayload::Item { item, template });
        self.emit(event);
        Ok(())
    }

    /// Synchronous death handling for a combatant whose HP reached 0.
    ///
    /// Transfers rewards to the killer, clears every pairing, and runs the
    /// loot pass. Running it twice for the same victim in one tick is a
    /// no-op.
    pub fn handle_death(
        &mut self,
        victim_id: CombatantId,
        killer_id: Option<CombatantId>,
    ) -> Result<(), StateError> {
        let victim = self.combatant(victim_id)?.clone();
        if victim.is_alive() {
            return Ok(());
        }
        let record = DeathRecord::capture(&victim, killer_id, self.tick());
        if self.world.death_report(&record.key()).is_some() {
            return Ok(());
        }

        let killer_id = killer_id
            .filter(|&id| id != victim_id)
            .filter(|&id| self.world.combatant(id).is_some_and(|k| k.is_alive()));

        let mut payload = EventPayload::Death {
            killer: killer_id,
            ions: 0,
            riblets: 0,
            experience: 0,
        };
        if let Some(killer_id) = killer_id {
            let ions = victim.ions.max(0);
            let riblets = victim.riblets.max(0);
            let experience = if victim.is_monster() {
                let bonus = self.profile(victim_id).map(|p| p.exp_bonus).unwrap_or(0);
                i64::from(victim.level) * self.config.exp_per_level + bonus
            } else {
                0
            };

            let killer = self.combatant_mut(killer_id)?;
            killer.ions = killer.ions.saturating_add(ions);
            killer.riblets = killer.riblets.saturating_add(riblets);
            killer.experience = killer.experience.saturating_add(experience);

            let victim = self.combatant_mut(victim_id)?;
            victim.ions = 0;
            victim.riblets = 0;

            payload = EventPayload::Death {
                killer: Some(killer_id),
                ions,
                riblets,
                experience,
            };
        }

        let mut event = self.event(EventKind::Death, victim_id).with_payload(payload);
        if let Some(killer_id) = killer_id {
            event = event.with_target(killer_id);
        }
        self.emit(event);
        tracing::debug!(victim = %victim_id, killer = ?killer_id, "death");

        for partner in self.release_pairings(victim_id) {
            if let Some(partner) = self.world.combatant_mut(partner) {
                if partner.is_monster() && partner.is_alive() {
                    partner.behavior = AiBehavior::Patrol;
                }
            }
        }
        if victim.is_monster() {
            self.set_behavior(victim_id, AiBehavior::Idle)?;
        }

        let report = resolve_loot(&mut self.world, record, self.config);
        for outcome in report.outcomes {
            let event = CombatEvent::loot(self.tick(), victim_id, outcome);
            self.emit(event);
        }
        Ok(())
    }
}
