//! Structured combat records.
//!
//! Every decision and state change the orchestrator makes is narrated as a
//! [`CombatEvent`]. Events are emitted in resolution order; sinks must keep
//! that order.

use crate::ai::{CascadeDecision, PursuitRoll, WakeRoll};
use crate::combat::AttackResult;
use crate::loot::{LootEntry, LootOutcome};
use crate::state::{CombatantId, ItemHandle, ItemId, Position, StatusEffect, StatusKind, Tick};

/// Event vocabulary.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    MeleeHit,
    RangedHit,
    InnateHit,
    Miss,
    Heal,
    Convert,
    CastAttempt,
    CastSuccess,
    Pickup,
    Drop,
    Reequip,
    Crack,
    Arrive,
    Leave,
    Gate,
    Wake,
    Taunt,
    Emote,
    Flee,
    Idle,
    Pursue,
    Disengage,
    Death,
    LootSpawn,
    LootVaporize,
    StatusApplied,
    StatusTick,
    StatusExpired,
}

/// Kind-specific event data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventPayload {
    None,
    Gate(CascadeDecision),
    Wake(WakeRoll),
    /// Text spoken by the actor (taunts and emotes).
    Line(String),
    Strike(AttackResult),
    Heal {
        amount: i32,
        cost: i32,
        hp: i32,
    },
    Convert {
        item: ItemId,
        ions: u32,
    },
    Cast {
        cost: i32,
        success: bool,
        effect: Option<String>,
    },
    Item {
        item: ItemId,
        template: ItemHandle,
    },
    Crack {
        item: ItemId,
        from: ItemHandle,
        into: ItemHandle,
    },
    Move {
        from: Position,
        to: Position,
    },
    Pursuit(PursuitRoll),
    Death {
        killer: Option<CombatantId>,
        ions: i32,
        riblets: i32,
        experience: i64,
    },
    Loot(LootOutcome),
    Status(StatusEffect),
    StatusTick {
        kind: StatusKind,
        damage: i32,
    },
}

/// One structured record: `{kind, actor, target?, payload}` stamped with the tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    pub tick: Tick,
    pub kind: EventKind,
    pub actor: CombatantId,
    pub target: Option<CombatantId>,
    pub payload: EventPayload,
}

impl CombatEvent {
    pub fn new(tick: Tick, kind: EventKind, actor: CombatantId) -> Self {
        Self {
            tick,
            kind,
            actor,
            target: None,
            payload: EventPayload::None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Loot record for a death outcome.
    pub fn loot(tick: Tick, victim: CombatantId, outcome: LootOutcome) -> Self {
        let kind = match outcome {
            LootOutcome::Spawned { .. } => EventKind::LootSpawn,
            LootOutcome::Vaporized { .. } => EventKind::LootVaporize,
        };
        Self::new(tick, kind, victim).with_payload(EventPayload::Loot(outcome))
    }

    /// Hit kind for a landed strike.
    pub fn hit_kind(result: &AttackResult) -> EventKind {
        use crate::combat::{AttackOutcome, AttackSource};
        match (result.outcome, result.source) {
            (AttackOutcome::Miss, _) => EventKind::Miss,
            (_, AttackSource::Melee) => EventKind::MeleeHit,
            (_, AttackSource::Bolt) => EventKind::RangedHit,
            (_, AttackSource::Innate) => EventKind::InnateHit,
        }
    }

    /// True for loot records about a skull.
    pub fn is_skull_loot(&self) -> bool {
        matches!(&self.payload, EventPayload::Loot(outcome) if outcome.entry() == LootEntry::Skull)
    }

    /// Rewrites item ids in the payload (provisional ids replaced by
    /// store-assigned ones).
    pub fn remap_items(&mut self, remap: impl Fn(ItemId) -> ItemId) {
        match &mut self.payload {
            EventPayload::Convert { item, .. }
            | EventPayload::Item { item, .. }
            | EventPayload::Crack { item, .. } => *item = remap(*item),
            EventPayload::Loot(LootOutcome::Spawned { entry, item }) => {
                *item = remap(*item);
                if let LootEntry::Item(source) = entry {
                    *source = remap(*source);
                }
            }
            EventPayload::Loot(LootOutcome::Vaporized { entry: LootEntry::Item(source) }) => {
                *source = remap(*source);
            }
            _ => {}
        }
    }
}

/// Receives events in emission order.
pub trait EventSink {
    fn record(&mut self, event: CombatEvent);

    fn record_all(&mut self, events: impl IntoIterator<Item = CombatEvent>)
    where
        Self: Sized,
    {
        for event in events {
            self.record(event);
        }
    }
}

impl EventSink for Vec<CombatEvent> {
    fn record(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Serialization failure while digesting an event stream.
#[cfg(feature = "serde")]
pub type DigestError = bincode::Error;

/// Digest over an event stream for golden-log comparison.
///
/// Each event is serialized with bincode and fed to SHA-256 in order, so two
/// streams hash equal only if they match event for event. An event that
/// cannot be serialized fails the whole digest.
///
/// Requires the `serde` feature.
#[cfg(feature = "serde")]
pub fn compute_events_root(events: &[CombatEvent]) -> Result<[u8; 32], DigestError> {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for event in events {
        hasher.update(bincode::serialize(event)?);
    }
    Ok(hasher.finalize().into())
}
