//! Tick orchestration.
//!
//! The [`TurnOrchestrator`] is the single entry point that advances the
//! combat world by one tick. It never touches the stores: every mutation is
//! staged on a clone of the caller's [`CombatWorld`], checked against the
//! commit-time invariants, and returned together with the [`IntentBatch`]
//! that replays it. A tick that fails anywhere leaves nothing behind.
//!
//! Phase order within a tick:
//!
//! 1. the player's action (including pursuit and wake rolls it triggers)
//! 2. every engaged monster's action credits, in acting order
//! 3. status effects on every living combatant

mod context;
mod errors;
mod monster;
mod player;
mod status;
mod strike;

pub use errors::{ActionError, TickError, TickPhase};

use std::collections::BTreeSet;

use crate::config::CombatConfig;
use crate::env::{CombatEnv, Dice, RollRecord};
use crate::event::CombatEvent;
use crate::state::{CombatWorld, CombatantId, Position, StateError, Tick, check_invariants};
use crate::store::IntentBatch;

use context::TickContext;

/// What the player does this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    /// Inspect the current location; dormant monsters may notice.
    Look,
    /// Walk to another location.
    Move { to: Position },
    /// Pick a fight with a monster here.
    Engage { target: CombatantId },
    /// Hit the engaged monster with whatever is wielded.
    Strike,
    /// Break off every fight at this location.
    Disengage,
    Wait,
    /// Leave the game; pairings are released and nothing else happens.
    Exit,
}

/// Input for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickInput {
    pub action: PlayerAction,
}

impl TickInput {
    pub fn new(action: PlayerAction) -> Self {
        Self { action }
    }
}

impl From<PlayerAction> for TickInput {
    fn from(action: PlayerAction) -> Self {
        Self::new(action)
    }
}

/// Everything one tick produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub tick: Tick,
    /// Staged world, already checked against the commit-time invariants.
    pub world: CombatWorld,
    /// Store writes that turn the input world into `world`.
    pub batch: IntentBatch,
    /// Ordered event stream.
    pub events: Vec<CombatEvent>,
    /// Every roll drawn, in draw order.
    pub rolls: Vec<RollRecord>,
}

/// Resolves ticks against a set of oracles and a fixed configuration.
pub struct TurnOrchestrator<'a> {
    env: CombatEnv<'a>,
    config: &'a CombatConfig,
}

impl<'a> TurnOrchestrator<'a> {
    pub fn new(env: CombatEnv<'a>, config: &'a CombatConfig) -> Self {
        Self { env, config }
    }

    pub fn config(&self) -> &CombatConfig {
        self.config
    }

    /// Resolves one tick starting from `world`.
    ///
    /// The same world, input, configuration and roll source always produce
    /// the same outcome.
    pub fn resolve(&self, world: &CombatWorld, input: &TickInput) -> Result<TickOutcome, TickError> {
        let items = self.env.items()?;
        let species = self.env.species()?;
        let rng = self.env.rng()?;

        let player = world
            .try_combatant(CombatantId::PLAYER)
            .map_err(|e| TickError::state(TickPhase::Snapshot, e))?;
        let tick = world.tick.next();
        let seed = self.config.seed.unwrap_or(world.game_seed);

        // Monsters hunting the player from another location before anyone moves.
        let apart: BTreeSet<CombatantId> = world
            .combatants()
            .filter(|c| c.is_monster() && c.is_alive() && c.target == Some(player.id))
            .filter(|c| c.position != player.position)
            .map(|c| c.id)
            .collect();

        let mut staged = world.clone();
        staged.tick = tick;
        staged.prune_deaths_before(tick);
        let mut ctx = TickContext {
            world: staged,
            items,
            species,
            config: self.config,
            dice: Dice::new(rng, seed, tick),
            events: Vec::new(),
        };

        let resolve = |e: StateError| TickError::state(TickPhase::Resolve, e);
        let woken = player::apply_player_action(&mut ctx, input.action)?;
        if input.action == PlayerAction::Exit {
            player::exit(&mut ctx).map_err(resolve)?;
        } else {
            monster::run_monster_phase(&mut ctx, &apart, &woken).map_err(resolve)?;
            status::tick_statuses(&mut ctx).map_err(resolve)?;
        }

        let TickContext {
            world: staged,
            dice,
            events,
            ..
        } = ctx;

        if let Err(violation) = check_invariants(world, &staged) {
            tracing::error!(%tick, %violation, "staged world rejected");
            return Err(violation.into());
        }
        let batch = IntentBatch::from_worlds(world, &staged);
        tracing::debug!(
            %tick,
            action = ?input.action,
            events = events.len(),
            intents = batch.len(),
            "tick resolved"
        );

        Ok(TickOutcome {
            tick,
            world: staged,
            batch,
            events,
            rolls: dice.into_history(),
        })
    }
}

/// Orders combatants by dexterity (highest first), then id.
pub(crate) fn acting_order(world: &CombatWorld, mut ids: Vec<CombatantId>) -> Vec<CombatantId> {
    ids.sort_by_key(|&id| {
        let dexterity = world
            .combatant(id)
            .map(|c| c.abilities.dexterity)
            .unwrap_or(0);
        (std::cmp::Reverse(dexterity), id)
    });
    ids.dedup();
    ids
}
