//! Attack resolution against the staged world: damage, wear, statuses and
//! synchronous death.

use crate::combat::{
    AttackPlan, AttackResult, AttackSource, Strike, WearOutcome, apply_damage, armour_class,
    attack_power, resolve_strike, wear_item,
};
use crate::engine::context::TickContext;
use crate::env::RollPurpose;
use crate::event::{CombatEvent, EventKind, EventPayload};
use crate::state::{CombatantId, ItemId, StateError, StatusApplyOutcome};

/// Resolves one strike from `attacker_id` on `defender_id`.
pub(crate) fn perform_strike(
    ctx: &mut TickContext<'_>,
    attacker_id: CombatantId,
    defender_id: CombatantId,
    plan: AttackPlan,
) -> Result<AttackResult, StateError> {
    let attacker = ctx.combatant(attacker_id)?.clone();
    let defender = ctx.combatant(defender_id)?.clone();

    let (source, power) = attack_power(&attacker, &plan, &ctx.world, ctx.items, ctx.config);
    let weapon = plan.weapon.filter(|_| source != AttackSource::Innate);
    let defence = armour_class(&defender, &ctx.world, ctx.items);

    let fumbled = ctx.dice.passes(attacker_id, RollPurpose::Fumble, ctx.config.fumble_pct);
    let critical = !fumbled && ctx.dice.passes(attacker_id, RollPurpose::Crit, ctx.config.crit_pct);
    let status = match source {
        AttackSource::Innate => attacker.innate.status,
        AttackSource::Melee | AttackSource::Bolt => None,
    };

    let result = resolve_strike(
        &Strike {
            source,
            power,
            armour_class: defence,
            defender_hp: defender.hp,
            status,
            critical,
            fumbled,
        },
        ctx.config,
    );
    tracing::debug!(
        attacker = %attacker_id,
        defender = %defender_id,
        %source,
        power,
        armour_class = defence,
        damage = result.damage,
        "strike resolved"
    );

    let event = ctx
        .event(CombatEvent::hit_kind(&result), attacker_id)
        .with_target(defender_id)
        .with_payload(EventPayload::Strike(result));
    ctx.emit(event);

    if result.damage > 0 {
        let defender = ctx.combatant_mut(defender_id)?;
        defender.hp.current = apply_damage(defender.hp.current, result.damage);
    }

    if result.check_wear {
        if let Some(weapon) = weapon {
            wear(ctx, attacker_id, weapon)?;
        }
        if let Some(armour) = defender.armour {
            wear(ctx, defender_id, armour)?;
        }
    }

    if let Some(effect) = result.status {
        let defender = ctx.combatant_mut(defender_id)?;
        if defender.is_alive() {
            let outcome = defender.statuses.apply(effect);
            if matches!(outcome, StatusApplyOutcome::Added | StatusApplyOutcome::Refreshed) {
                let event = ctx
                    .event(EventKind::StatusApplied, defender_id)
                    .with_target(attacker_id)
                    .with_payload(EventPayload::Status(effect));
                ctx.emit(event);
            }
        }
    }

    if !ctx.combatant(defender_id)?.is_alive() {
        ctx.handle_death(defender_id, Some(attacker_id))?;
    }
    Ok(result)
}

/// Applies one hit's wear to an item held by `owner`.
fn wear(ctx: &mut TickContext<'_>, owner: CombatantId, item_id: ItemId) -> Result<(), StateError> {
    let template = ctx.world.try_item(item_id)?.template;
    let Some(definition) = ctx.items.resolve(template) else {
        tracing::warn!(%owner, item = %item_id, template = template.0, "no catalog entry; wear skipped");
        return Ok(());
    };

    let outcome = match ctx.world.item_mut(item_id) {
        Some(item) => wear_item(item, &definition, ctx.config.wear_per_hit),
        None => return Err(StateError::UnknownItem(item_id)),
    };

    if let WearOutcome::Cracked { from, into } = outcome {
        tracing::debug!(%owner, item = %item_id, "item cracked");
        let event = ctx.event(EventKind::Crack, owner).with_payload(EventPayload::Crack {
            item: item_id,
            from,
            into,
        });
        ctx.emit(event);
    }
    Ok(())
}
