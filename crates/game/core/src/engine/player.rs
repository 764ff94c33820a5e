//! Player-side phase: the action itself, pursuit and wake rolls.

use std::collections::BTreeSet;

use crate::ai::{WakeTrigger, roll_pursuit, roll_wake, taunt_lines, wake_threshold};
use crate::combat::plan_wielded_attack;
use crate::engine::context::TickContext;
use crate::engine::errors::{ActionError, TickError, TickPhase};
use crate::engine::{PlayerAction, acting_order};
use crate::event::{EventKind, EventPayload};
use crate::state::{AiBehavior, CombatantId, Position, StateError};

const PLAYER: CombatantId = CombatantId::PLAYER;

/// Applies the player's action. Returns the monsters woken this tick.
pub(crate) fn apply_player_action(
    ctx: &mut TickContext<'_>,
    action: PlayerAction,
) -> Result<BTreeSet<CombatantId>, TickError> {
    let resolve = |error: StateError| TickError::state(TickPhase::Resolve, error);

    if !ctx.combatant(PLAYER).map_err(resolve)?.is_alive() {
        return Err(ctx.reject(ActionError::PlayerDead));
    }

    match action {
        PlayerAction::Look => {
            let position = ctx.combatant(PLAYER).map_err(resolve)?.position;
            wake_dormant(ctx, position, WakeTrigger::Look).map_err(resolve)
        }
        PlayerAction::Move { to } => {
            let from = ctx.combatant(PLAYER).map_err(resolve)?.position;
            relocate(ctx, PLAYER, from, to).map_err(resolve)?;
            if from != to {
                pursue(ctx, from, to).map_err(resolve)?;
            }
            wake_dormant(ctx, to, WakeTrigger::Entry).map_err(resolve)
        }
        PlayerAction::Engage { target } => {
            engage(ctx, target)?;
            Ok(BTreeSet::new())
        }
        PlayerAction::Strike => {
            strike(ctx)?;
            Ok(BTreeSet::new())
        }
        PlayerAction::Disengage => {
            disengage(ctx)?;
            Ok(BTreeSet::new())
        }
        PlayerAction::Wait | PlayerAction::Exit => Ok(BTreeSet::new()),
    }
}

/// Moves a combatant, narrating the departure and the arrival.
fn relocate(
    ctx: &mut TickContext<'_>,
    id: CombatantId,
    from: Position,
    to: Position,
) -> Result<(), StateError> {
    if from == to {
        return Ok(());
    }
    let payload = EventPayload::Move { from, to };
    let leave = ctx.event(EventKind::Leave, id).with_payload(payload.clone());
    ctx.emit(leave);
    ctx.combatant_mut(id)?.position = to;
    let arrive = ctx.event(EventKind::Arrive, id).with_payload(payload);
    ctx.emit(arrive);
    Ok(())
}

/// Monsters left behind by the player roll to follow.
///
/// A failed roll keeps the target; the monster acts again once it shares a
/// location with the player.
fn pursue(ctx: &mut TickContext<'_>, from: Position, to: Position) -> Result<(), StateError> {
    let hunters: Vec<CombatantId> = ctx
        .world
        .monsters_at(from)
        .filter(|m| m.target == Some(PLAYER) && !m.behavior.is_dormant())
        .map(|m| m.id)
        .collect();

    for id in acting_order(&ctx.world, hunters) {
        let monster = ctx.combatant(id)?.clone();
        let roll = roll_pursuit(&monster, &ctx.world, ctx.items, ctx.config, &mut ctx.dice);
        let success = roll.success;
        let event = ctx
            .event(EventKind::Pursue, id)
            .with_target(PLAYER)
            .with_payload(EventPayload::Pursuit(roll));
        ctx.emit(event);

        if success {
            relocate(ctx, id, from, to)?;
            ctx.set_behavior(id, AiBehavior::Pursue)?;
        }
    }
    Ok(())
}

/// Dormant monsters at `position` roll to wake. Failed rolls leave no trace.
fn wake_dormant(
    ctx: &mut TickContext<'_>,
    position: Position,
    trigger: WakeTrigger,
) -> Result<BTreeSet<CombatantId>, StateError> {
    let sleepers: Vec<CombatantId> = ctx
        .world
        .monsters_at(position)
        .filter(|m| m.behavior.is_dormant())
        .map(|m| m.id)
        .collect();

    let mut woken = BTreeSet::new();
    for id in acting_order(&ctx.world, sleepers) {
        let monster = ctx.combatant(id)?.clone();
        let profile = ctx.profile(id);
        let threshold = wake_threshold(trigger, ctx.config, profile);
        let roll = roll_wake(&monster, trigger, threshold, &mut ctx.dice);
        if !roll.woke {
            continue;
        }

        {
            let monster = ctx.combatant_mut(id)?;
            monster.target = Some(PLAYER);
            monster.behavior = AiBehavior::Taunt;
        }
        let event = ctx
            .event(EventKind::Wake, id)
            .with_target(PLAYER)
            .with_payload(EventPayload::Wake(roll));
        ctx.emit(event);

        for line in taunt_lines(&monster, profile, ctx.config, &mut ctx.dice) {
            let event = ctx
                .event(EventKind::Taunt, id)
                .with_target(PLAYER)
                .with_payload(EventPayload::Line(line));
            ctx.emit(event);
        }
        woken.insert(id);
    }
    Ok(woken)
}

fn engage(ctx: &mut TickContext<'_>, target: CombatantId) -> Result<(), TickError> {
    let resolve = |error: StateError| TickError::state(TickPhase::Resolve, error);
    let position = ctx.combatant(PLAYER).map_err(resolve)?.position;
    let monster = ctx.combatant(target).map_err(resolve)?;

    if !monster.is_monster() {
        return Err(ctx.reject(ActionError::NotAMonster(target)));
    }
    if !monster.is_alive() {
        return Err(ctx.reject(ActionError::TargetDead(target)));
    }
    if monster.position != position {
        return Err(ctx.reject(ActionError::TargetAbsent { target, position }));
    }

    let monster = ctx.combatant_mut(target).map_err(resolve)?;
    monster.target = Some(PLAYER);
    if monster.behavior.is_dormant() {
        monster.behavior = AiBehavior::Attack;
    }
    ctx.combatant_mut(PLAYER).map_err(resolve)?.target = Some(target);
    tracing::debug!(%target, "player engaged");
    Ok(())
}

fn strike(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let resolve = |error: StateError| TickError::state(TickPhase::Resolve, error);
    let player = ctx.combatant(PLAYER).map_err(resolve)?.clone();

    let target = player
        .target
        .and_then(|id| ctx.world.combatant(id))
        .filter(|t| t.is_alive() && t.position == player.position)
        .map(|t| t.id)
        .ok_or_else(|| ctx.reject(ActionError::NotEngaged))?;

    let plan = plan_wielded_attack(&player, &ctx.world, ctx.items);
    super::strike::perform_strike(ctx, PLAYER, target, plan).map_err(resolve)?;
    Ok(())
}

/// Clears the player's pairing and every monster here hunting the player.
fn disengage(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let resolve = |error: StateError| TickError::state(TickPhase::Resolve, error);
    let player = ctx.combatant(PLAYER).map_err(resolve)?.clone();

    let mut partners: Vec<CombatantId> = ctx
        .world
        .monsters_at(player.position)
        .filter(|m| m.target == Some(PLAYER))
        .map(|m| m.id)
        .collect();
    if let Some(target) = player.target {
        if !partners.contains(&target) {
            partners.push(target);
        }
    }
    if partners.is_empty() {
        return Err(ctx.reject(ActionError::NotEngaged));
    }

    for partner in acting_order(&ctx.world, partners) {
        ctx.clear_pairing(PLAYER, partner);
        if let Some(monster) = ctx.world.combatant_mut(partner) {
            if monster.target.is_none() {
                monster.behavior = AiBehavior::Patrol;
            }
        }
        let event = ctx.event(EventKind::Disengage, PLAYER).with_target(partner);
        ctx.emit(event);
    }
    Ok(())
}

/// Process-level exit: every pairing with the player is released.
pub(crate) fn exit(ctx: &mut TickContext<'_>) -> Result<(), StateError> {
    let partners = ctx.release_pairings(PLAYER);
    for partner in acting_order(&ctx.world, partners) {
        ctx.set_behavior(partner, AiBehavior::Patrol)?;
        let event = ctx.event(EventKind::Disengage, PLAYER).with_target(partner);
        ctx.emit(event);
    }
    Ok(())
}
