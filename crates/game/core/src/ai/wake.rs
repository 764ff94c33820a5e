//! Wake rolls and taunts for dormant monsters.

use crate::config::CombatConfig;
use crate::env::{Dice, READY_LINE, RollPurpose, SpeciesProfile};
use crate::state::Combatant;

/// Player event that can wake a dormant monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WakeTrigger {
    Look,
    Entry,
}

impl WakeTrigger {
    fn purpose(self) -> RollPurpose {
        match self {
            Self::Look => RollPurpose::WakeLook,
            Self::Entry => RollPurpose::WakeEntry,
        }
    }
}

/// Wake threshold for `trigger`, honouring species overrides.
pub fn wake_threshold(
    trigger: WakeTrigger,
    config: &CombatConfig,
    profile: Option<&SpeciesProfile>,
) -> i32 {
    let overrides = profile.map(|p| p.overrides).unwrap_or_default();
    match trigger {
        WakeTrigger::Look => overrides.wake_on_look.unwrap_or(config.wake_on_look),
        WakeTrigger::Entry => overrides.wake_on_entry.unwrap_or(config.wake_on_entry),
    }
}

/// Result of one wake roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WakeRoll {
    pub trigger: WakeTrigger,
    pub roll: Option<u32>,
    pub threshold: i32,
    pub woke: bool,
}

/// Rolls to wake a dormant monster. A threshold of 0 never wakes and never rolls.
pub fn roll_wake(
    monster: &Combatant,
    trigger: WakeTrigger,
    threshold: i32,
    dice: &mut Dice<'_>,
) -> WakeRoll {
    if threshold <= 0 {
        return WakeRoll {
            trigger,
            roll: None,
            threshold,
            woke: false,
        };
    }
    let roll = dice.roll(monster.id, trigger.purpose());
    let woke = (roll as i32) < threshold;
    tracing::debug!(monster = %monster.id, %trigger, roll, threshold, woke, "wake roll");
    WakeRoll {
        trigger,
        roll: Some(roll),
        threshold,
        woke,
    }
}

/// Lines a freshly woken monster shouts: the species taunt, plus the generic
/// ready line on a successful taunt roll.
pub fn taunt_lines(
    monster: &Combatant,
    profile: Option<&SpeciesProfile>,
    config: &CombatConfig,
    dice: &mut Dice<'_>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(taunt) = profile.and_then(|p| p.taunt.as_deref()) {
        lines.push(taunt.replace("{monster}", &monster.name));
    }
    if dice.passes(monster.id, RollPurpose::Taunt, config.taunt_pct) {
        lines.push(READY_LINE.replace("{monster}", &monster.name));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{GateOverrides, ScriptedRng, SpeciesId};
    use crate::state::{CombatantId, Tick};

    fn create_test_monster() -> Combatant {
        Combatant::monster(CombatantId(4), "Mutant", SpeciesId(1))
    }

    #[test]
    fn look_and_entry_use_their_own_thresholds() {
        let config = CombatConfig::default();
        assert_eq!(wake_threshold(WakeTrigger::Look, &config, None), 15);
        assert_eq!(wake_threshold(WakeTrigger::Entry, &config, None), 10);

        let profile = SpeciesProfile::new(SpeciesId(1), "light sleeper").with_overrides(GateOverrides {
            wake_on_entry: Some(60),
            ..GateOverrides::default()
        });
        assert_eq!(wake_threshold(WakeTrigger::Entry, &config, Some(&profile)), 60);
    }

    #[test]
    fn wake_roll_is_strictly_below_threshold() {
        let rng = ScriptedRng::new(vec![14, 15]);
        let mut dice = Dice::new(&rng, 0, Tick(1));
        let monster = create_test_monster();
        assert!(roll_wake(&monster, WakeTrigger::Look, 15, &mut dice).woke);
        assert!(!roll_wake(&monster, WakeTrigger::Look, 15, &mut dice).woke);
    }

    #[test]
    fn ready_line_needs_taunt_roll() {
        let config = CombatConfig::default();
        let profile = SpeciesProfile::new(SpeciesId(1), "mutant").with_taunt("{monster} snarls!");
        let rng = ScriptedRng::new(vec![4]);
        let mut dice = Dice::new(&rng, 0, Tick(1));

        let lines = taunt_lines(&create_test_monster(), Some(&profile), &config, &mut dice);
        assert_eq!(
            lines,
            vec![
                "Mutant snarls!".to_string(),
                "Mutant is getting ready to combat you!".to_string(),
            ]
        );
    }
}
