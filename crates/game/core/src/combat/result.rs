//! Combat result types and attack resolution.

use crate::combat::damage::{mitigation, source_floor};
use crate::combat::source::AttackSource;
use crate::config::CombatConfig;
use crate::state::{ResourceMeter, StatusEffect};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Attack fumbled and missed the target.
    Miss,
    /// Attack hit the target.
    Hit,
    /// Critical hit.
    Critical,
}

/// Everything the resolver needs about one strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub source: AttackSource,
    pub power: i32,
    pub armour_class: i32,
    pub defender_hp: ResourceMeter,
    /// Status carried by the attack profile.
    pub status: Option<StatusEffect>,
    pub critical: bool,
    pub fumbled: bool,
}

/// Result of a combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    pub source: AttackSource,
    pub power: i32,
    pub mitigation: i32,
    /// Damage delivered (0 on a miss).
    pub damage: i32,
    /// A damaging hit wears the weapon and the defender's armour.
    pub check_wear: bool,
    /// Status to apply to the defender.
    pub status: Option<StatusEffect>,
}

/// Resolve a strike.
///
/// # Formula
///
/// ```text
/// damage = max(power - mitigation(ac), 0)
/// damage = max(damage, floor(source))       // bolt and innate only
/// damage = damage * crit_multiplier / 100   // critical hits
/// damage = min(damage, defender.hp.max)     // opening melee strike
/// ```
///
/// An opening strike is one landed on a defender still at full HP.
pub fn resolve_strike(strike: &Strike, config: &CombatConfig) -> AttackResult {
    let mitigated = mitigation(strike.armour_class, config);

    if strike.fumbled {
        return AttackResult {
            outcome: AttackOutcome::Miss,
            source: strike.source,
            power: strike.power,
            mitigation: mitigated,
            damage: 0,
            check_wear: false,
            status: None,
        };
    }

    let mut damage = (strike.power - mitigated).max(0);
    damage = damage.max(source_floor(strike.source, config));

    let outcome = if strike.critical {
        damage = damage * config.crit_multiplier_pct.max(100) / 100;
        AttackOutcome::Critical
    } else {
        AttackOutcome::Hit
    };

    if strike.source == AttackSource::Melee && strike.defender_hp.is_full() {
        damage = damage.min(strike.defender_hp.maximum.max(0));
    }

    AttackResult {
        outcome,
        source: strike.source,
        power: strike.power,
        mitigation: mitigated,
        damage,
        check_wear: damage > 0,
        status: if damage > 0 { strike.status } else { None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusKind;

    fn strike(source: AttackSource, power: i32, armour_class: i32) -> Strike {
        Strike {
            source,
            power,
            armour_class,
            defender_hp: ResourceMeter::full(50),
            status: None,
            critical: false,
            fumbled: false,
        }
    }

    #[test]
    fn zero_armour_takes_full_power() {
        let config = CombatConfig::default();
        let result = resolve_strike(&strike(AttackSource::Melee, 17, 0), &config);
        assert_eq!(result.damage, 17);
        assert!(result.check_wear);
    }

    #[test]
    fn heavy_armour_removes_thirty_two_but_floor_holds() {
        let config = CombatConfig::default();
        let melee = resolve_strike(&strike(AttackSource::Melee, 40, 100), &config);
        assert_eq!(melee.mitigation, 32);
        assert_eq!(melee.damage, 8);

        let bolt = resolve_strike(&strike(AttackSource::Bolt, 20, 100), &config);
        assert_eq!(bolt.damage, 6);

        let swing = resolve_strike(&strike(AttackSource::Melee, 20, 100), &config);
        assert_eq!(swing.damage, 0);
        assert!(!swing.check_wear);
    }

    #[test]
    fn opening_melee_strike_is_clamped_to_max_hp() {
        let config = CombatConfig::default();
        let mut opening = strike(AttackSource::Melee, 500, 0);
        opening.defender_hp = ResourceMeter::full(30);
        assert_eq!(resolve_strike(&opening, &config).damage, 30);

        let mut follow_up = opening;
        follow_up.defender_hp = ResourceMeter::new(10, 30);
        assert_eq!(resolve_strike(&follow_up, &config).damage, 500);
    }

    #[test]
    fn critical_multiplies_after_floor() {
        let config = CombatConfig::default().with_crit(10, 200);
        let mut crit = strike(AttackSource::Innate, 2, 0);
        crit.critical = true;
        let result = resolve_strike(&crit, &config);
        assert_eq!(result.outcome, AttackOutcome::Critical);
        assert_eq!(result.damage, 12);
    }

    #[test]
    fn fumble_is_a_clean_miss() {
        let config = CombatConfig::default();
        let mut fumble = strike(AttackSource::Bolt, 30, 0);
        fumble.fumbled = true;
        fumble.status = Some(StatusEffect::new(StatusKind::Poisoned, 3, 1));
        let result = resolve_strike(&fumble, &config);
        assert_eq!(result.outcome, AttackOutcome::Miss);
        assert_eq!(result.damage, 0);
        assert_eq!(result.status, None);
    }
}
