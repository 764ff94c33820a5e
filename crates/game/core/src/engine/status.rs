//! End-of-tick status processing.

use crate::engine::context::TickContext;
use crate::event::{EventKind, EventPayload};
use crate::state::{CombatantId, StateError, StatusEffect};

/// Advances every living combatant's statuses by one tick.
///
/// Damage-over-time that drops a combatant to 0 HP is credited to whoever
/// the victim was fighting.
pub(crate) fn tick_statuses(ctx: &mut TickContext<'_>) -> Result<(), StateError> {
    let afflicted: Vec<CombatantId> = ctx
        .world
        .combatants()
        .filter(|c| c.is_alive() && !c.statuses.is_empty())
        .map(|c| c.id)
        .collect();

    for id in afflicted {
        let active: Vec<StatusEffect> = ctx.combatant(id)?.statuses.iter().copied().collect();
        let (damage, expired) = {
            let combatant = ctx.combatant_mut(id)?;
            let (damage, expired) = combatant.statuses.tick();
            combatant.hp.current = (combatant.hp.current - damage).max(0);
            (damage, expired)
        };

        for effect in &active {
            let dealt = effect.kind.damage_per_tick(effect.intensity);
            if dealt > 0 {
                let event = ctx.event(EventKind::StatusTick, id).with_payload(EventPayload::StatusTick {
                    kind: effect.kind,
                    damage: dealt,
                });
                ctx.emit(event);
            }
        }
        for kind in expired {
            let payload = active
                .iter()
                .find(|e| e.kind == kind)
                .map(|&e| EventPayload::Status(e))
                .unwrap_or(EventPayload::None);
            let event = ctx.event(EventKind::StatusExpired, id).with_payload(payload);
            ctx.emit(event);
        }

        let victim = ctx.combatant(id)?;
        if damage > 0 && !victim.is_alive() {
            let killer = victim.target;
            tracing::debug!(victim = %id, damage, "status damage was fatal");
            ctx.handle_death(id, killer)?;
        }
    }
    Ok(())
}
