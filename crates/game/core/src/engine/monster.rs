//! Monster phase: credits, gear upkeep, cascade and gate actions.

use std::collections::BTreeSet;

use crate::ai::{
    CascadeFacts, Gate, GateThresholds, GearResponse, best_convertible, best_pickup, draw_credits,
    evaluate, improves_wielded, pick_emote, plan_gear_response,
};
use crate::combat::{is_cracked_weapon, plan_monster_attack};
use crate::engine::acting_order;
use crate::engine::context::TickContext;
use crate::engine::strike::perform_strike;
use crate::env::RollPurpose;
use crate::event::{EventKind, EventPayload};
use crate::ledger::{apply_cast, apply_heal, heal_amount, heal_cost};
use crate::state::{
    AiBehavior, CombatantId, ItemId, Origin, Placement, StateError, StatusKind,
};

const PLAYER: CombatantId = CombatantId::PLAYER;

/// Effect tag narrated on a successful cast.
const CAST_EFFECT: &str = "arcane-burst";

/// Runs every engaged monster's action credits.
///
/// `apart` holds monsters that were hunting the player from another location
/// when the tick began; sharing a location now earns them the re-entry
/// credit bias. Monsters in `woken` spent this tick waking.
pub(crate) fn run_monster_phase(
    ctx: &mut TickContext<'_>,
    apart: &BTreeSet<CombatantId>,
    woken: &BTreeSet<CombatantId>,
) -> Result<(), StateError> {
    let Some(player) = ctx.world.combatant(PLAYER) else {
        return Ok(());
    };
    let position = player.position;

    // Fled monsters that the player caught up with go back to patrolling.
    let settled: Vec<CombatantId> = ctx
        .world
        .monsters_at(position)
        .filter(|m| m.is_alive() && m.behavior == AiBehavior::Flee && m.target.is_none())
        .map(|m| m.id)
        .collect();
    for id in settled {
        ctx.set_behavior(id, AiBehavior::Patrol)?;
    }

    let present: Vec<CombatantId> = ctx
        .world
        .monsters_at(position)
        .filter(|m| !woken.contains(&m.id))
        .map(|m| m.id)
        .collect();
    let engaged: Vec<CombatantId> = present.into_iter().filter(|&id| is_engaged(ctx, id)).collect();

    for id in acting_order(&ctx.world, engaged) {
        if !is_engaged(ctx, id) {
            continue;
        }
        if ctx.combatant(id)?.statuses.has(StatusKind::Stunned) {
            tracing::debug!(monster = %id, "stunned; turn skipped");
            continue;
        }

        let reentry = apart.contains(&id);
        let credits = draw_credits(id, &ctx.config.credit_weights, reentry, &mut ctx.dice);
        tracing::debug!(monster = %id, credits, reentry, "monster turn");

        for _ in 0..credits {
            if !is_engaged(ctx, id) {
                break;
            }
            if !spend_credit(ctx, id)? {
                break;
            }
        }
    }
    Ok(())
}

/// Monster is awake, alive, hunting the living player, and shares the tile.
fn is_engaged(ctx: &TickContext<'_>, id: CombatantId) -> bool {
    let (Some(monster), Some(player)) = (ctx.world.combatant(id), ctx.world.combatant(PLAYER))
    else {
        return false;
    };
    monster.is_monster()
        && monster.is_alive()
        && !monster.behavior.is_dormant()
        && monster.target == Some(PLAYER)
        && player.is_alive()
        && monster.position == player.position
}

/// Spends one action credit. Returns false when the monster stops acting.
fn spend_credit(ctx: &mut TickContext<'_>, id: CombatantId) -> Result<bool, StateError> {
    shed_broken_gear(ctx, id)?;

    let monster = ctx.combatant(id)?.clone();
    let profile = ctx.profile(id);
    let facts = CascadeFacts::gather(&monster, &ctx.world, ctx.items, ctx.config);
    let thresholds = GateThresholds::resolve(ctx.config, profile.map(|p| &p.overrides))
        .biased(&facts, ctx.config);
    let decision = evaluate(&monster, &facts, &thresholds, ctx.config, &mut ctx.dice);
    let gate = decision.gate;

    let event = ctx
        .event(EventKind::Gate, id)
        .with_target(PLAYER)
        .with_payload(EventPayload::Gate(decision));
    ctx.emit(event);

    match gate {
        Gate::Flee => {
            ctx.clear_pairing(id, PLAYER);
            ctx.set_behavior(id, AiBehavior::Flee)?;
            let event = ctx.event(EventKind::Flee, id).with_target(PLAYER);
            ctx.emit(event);
            return Ok(false);
        }
        Gate::Heal => heal(ctx, id)?,
        Gate::Convert => convert(ctx, id)?,
        Gate::Cast => cast(ctx, id)?,
        Gate::Attack => {
            let prefers_ranged = profile.is_some_and(|p| p.prefers_ranged);
            let plan = plan_monster_attack(&monster, &ctx.world, ctx.items, prefers_ranged, &mut ctx.dice);
            ctx.set_behavior(id, AiBehavior::Attack)?;
            perform_strike(ctx, id, PLAYER, plan)?;
        }
        Gate::Pickup => pickup(ctx, id)?,
        Gate::Emote => {
            let line = pick_emote(&monster, profile, &mut ctx.dice);
            let event = ctx
                .event(EventKind::Emote, id)
                .with_target(PLAYER)
                .with_payload(EventPayload::Line(line));
            ctx.emit(event);
        }
        Gate::Idle => {
            let event = ctx.event(EventKind::Idle, id);
            ctx.emit(event);
        }
    }
    Ok(true)
}

fn shed_broken_gear(ctx: &mut TickContext<'_>, id: CombatantId) -> Result<(), StateError> {
    let monster = ctx.combatant(id)?.clone();
    let responses = plan_gear_response(&monster, &ctx.world, ctx.items, ctx.config, &mut ctx.dice);

    for response in responses {
        match response {
            GearResponse::DropArmour(item) => ctx.drop_item(id, item)?,
            GearResponse::DropWeapon {
                item,
                replacement,
                attempts,
            } => {
                tracing::debug!(monster = %id, %item, attempts, "broken weapon dropped");
                ctx.drop_item(id, item)?;
                if let Some(replacement) = replacement {
                    wield(ctx, id, replacement)?;
                }
                ctx.combatant_mut(id)?.pending_drop = None;
            }
            GearResponse::KeepWeapon(pending) => {
                tracing::debug!(monster = %id, item = %pending.item, attempts = pending.attempts, "broken weapon kept");
                ctx.combatant_mut(id)?.pending_drop = Some(pending);
            }
        }
    }
    Ok(())
}

fn wield(ctx: &mut TickContext<'_>, id: CombatantId, item: ItemId) -> Result<(), StateError> {
    let template = ctx.world.try_item(item)?.template;
    {
        let monster = ctx.combatant_mut(id)?;
        monster.weapon = Some(item);
        monster.behavior = AiBehavior::Reequip;
    }
    let event = ctx
        .event(EventKind::Reequip, id)
        .with_payload(EventPayload::Item { item, template });
    ctx.emit(event);
    Ok(())
}

fn heal(ctx: &mut TickContext<'_>, id: CombatantId) -> Result<(), StateError> {
    let config = ctx.config;
    let monster = ctx.combatant_mut(id)?;
    let cost = heal_cost(monster.level, config);
    let amount = heal_amount(monster.level, config);
    let (balance, hp) = apply_heal(monster.ions, cost, monster.hp.current, monster.hp.maximum, amount);
    let restored = hp - monster.hp.current;
    monster.ions = balance;
    monster.hp.current = hp;
    monster.behavior = AiBehavior::Heal;

    if restored > 0 {
        let event = ctx.event(EventKind::Heal, id).with_payload(EventPayload::Heal {
            amount: restored,
            cost,
            hp,
        });
        ctx.emit(event);
    }
    Ok(())
}

/// Moves a ground item into the monster's bag.
fn take_from_ground(ctx: &mut TickContext<'_>, id: CombatantId, item: ItemId) -> Result<(), StateError> {
    let template = {
        let instance = ctx.world.item_mut(item).ok_or(StateError::UnknownItem(item))?;
        instance.placement = Placement::Carried(id);
        instance.origin = Origin::World;
        instance.template
    };
    ctx.combatant_mut(id)?.bag.push(item);
    let event = ctx
        .event(EventKind::Pickup, id)
        .with_payload(EventPayload::Item { item, template });
    ctx.emit(event);
    Ok(())
}

fn convert(ctx: &mut TickContext<'_>, id: CombatantId) -> Result<(), StateError> {
    let monster = ctx.combatant(id)?.clone();
    let carried = best_convertible(&monster.bag, monster.weapon, &ctx.world, ctx.items, ctx.config);
    let (item, value) = match carried {
        Some(found) => found,
        None => {
            let ground = ctx.world.ground_at(monster.position);
            let Some(found) = best_convertible(&ground, None, &ctx.world, ctx.items, ctx.config)
            else {
                tracing::warn!(monster = %id, "convert gate fired with nothing to convert");
                return Ok(());
            };
            take_from_ground(ctx, id, found.0)?;
            found
        }
    };

    ctx.world.remove_item(item);
    let ions = i32::try_from(value).unwrap_or(i32::MAX);
    {
        let monster = ctx.combatant_mut(id)?;
        monster.release(item);
        monster.ions = monster.ions.saturating_add(ions);
        monster.behavior = AiBehavior::Loot;
    }
    let event = ctx
        .event(EventKind::Convert, id)
        .with_payload(EventPayload::Convert { item, ions: value });
    ctx.emit(event);
    Ok(())
}

fn cast(ctx: &mut TickContext<'_>, id: CombatantId) -> Result<(), StateError> {
    let config = ctx.config;
    let success = ctx.dice.passes(id, RollPurpose::CastSuccess, config.spell_success_pct);
    let monster = ctx.combatant_mut(id)?;
    let before = monster.ions;
    monster.ions = apply_cast(before, config.spell_cost, success);
    monster.behavior = AiBehavior::Attack;
    let cost = before - monster.ions;

    let event = ctx
        .event(EventKind::CastAttempt, id)
        .with_target(PLAYER)
        .with_payload(EventPayload::Cast {
            cost,
            success,
            effect: None,
        });
    ctx.emit(event);
    if success {
        let event = ctx
            .event(EventKind::CastSuccess, id)
            .with_target(PLAYER)
            .with_payload(EventPayload::Cast {
                cost,
                success,
                effect: Some(CAST_EFFECT.to_string()),
            });
        ctx.emit(event);
    }
    Ok(())
}

fn pickup(ctx: &mut TickContext<'_>, id: CombatantId) -> Result<(), StateError> {
    let position = ctx.combatant(id)?.position;
    let ground = ctx.world.ground_at(position);
    let Some(item) = best_pickup(&ground, &ctx.world, ctx.items, ctx.config) else {
        tracing::warn!(monster = %id, "pickup gate fired on an empty tile");
        return Ok(());
    };
    take_from_ground(ctx, id, item)?;

    let monster = ctx.combatant(id)?.clone();
    if !improves_wielded(&monster, item, &ctx.world, ctx.items) {
        ctx.set_behavior(id, AiBehavior::Loot)?;
        return Ok(());
    }

    let previous = monster.weapon;
    wield(ctx, id, item)?;
    if let Some(previous) = previous {
        if ctx.world.item(previous).is_some_and(is_cracked_weapon) {
            ctx.drop_item(id, previous)?;
            ctx.combatant_mut(id)?.pending_drop = None;
        }
    }
    Ok(())
}
