//! Status effect system for combatants.
//!
//! Status effects are temporary conditions that tick down once per world
//! tick. Each effect tracks its remaining duration in ticks and an intensity.
//!
//! # Refresh rule
//!
//! Reapplying an active status with equal or greater intensity takes the new
//! intensity and extends the remaining duration to the larger of the two.
//! A weaker reapplication never shortens or weakens the existing effect.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Ticks left before the effect expires.
    pub remaining: u16,
    pub intensity: u8,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, remaining: u16, intensity: u8) -> Self {
        Self {
            kind,
            remaining,
            intensity,
        }
    }
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// Loses `intensity` HP every tick.
    Poisoned,

    /// Loses `intensity` HP every tick.
    Burning,

    /// Skips every action credit while active.
    Stunned,

    /// Attack power reduced by `intensity`.
    Weakened,
}

impl StatusKind {
    /// HP lost per tick at the given intensity.
    pub const fn damage_per_tick(self, intensity: u8) -> i32 {
        match self {
            Self::Poisoned | Self::Burning => intensity as i32,
            Self::Stunned | Self::Weakened => 0,
        }
    }
}

/// What [`StatusEffects::apply`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplyOutcome {
    Added,
    Refreshed,
    /// Weaker reapplication; existing effect unchanged.
    Ignored,
    /// No free slot.
    Full,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind && e.remaining > 0)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Applies or refreshes an effect.
    pub fn apply(&mut self, effect: StatusEffect) -> StatusApplyOutcome {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            if effect.intensity < existing.intensity {
                return StatusApplyOutcome::Ignored;
            }
            existing.intensity = effect.intensity;
            existing.remaining = existing.remaining.max(effect.remaining);
            return StatusApplyOutcome::Refreshed;
        }

        if effect.remaining == 0 {
            return StatusApplyOutcome::Ignored;
        }
        if self.effects.try_push(effect).is_err() {
            return StatusApplyOutcome::Full;
        }
        StatusApplyOutcome::Added
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Advances every effect by one tick.
    ///
    /// Returns the damage dealt this tick and the kinds that expired.
    pub fn tick(&mut self) -> (i32, ArrayVec<StatusKind, { CombatConfig::MAX_STATUS_EFFECTS }>) {
        let mut damage = 0;
        let mut expired = ArrayVec::new();
        for effect in self.effects.iter_mut() {
            damage += effect.kind.damage_per_tick(effect.intensity);
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        (damage, expired)
    }

    /// Sum of active `Weakened` intensity.
    pub fn power_penalty(&self) -> i32 {
        self.get(StatusKind::Weakened)
            .map(|e| i32::from(e.intensity))
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
