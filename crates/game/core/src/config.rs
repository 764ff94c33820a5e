/// Combat configuration constants and tunable parameters.
///
/// Every probability is a percentage compared against a 0..=99 roll: a
/// gate passes when `roll < threshold`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    // ===== wake =====
    pub wake_on_look: i32,
    pub wake_on_entry: i32,

    // ===== cascade gates =====
    /// FLEE is eligible below this HP percentage.
    pub flee_hp_pct: i32,
    pub flee_pct: i32,
    /// HEAL is eligible below this HP percentage.
    pub heal_at_pct: i32,
    pub heal_pct: i32,
    /// Ion cost of a heal, per monster level.
    pub heal_cost: i32,
    /// Heal amount is `level + heal_bonus`.
    pub heal_bonus: i32,
    pub convert_pct: i32,
    /// Ion percentage below which a monster counts as low on ions.
    pub low_ion_pct: i32,
    pub cast_pct: i32,
    pub spell_cost: i32,
    pub spell_success_pct: i32,
    pub attack_pct: i32,
    pub pickup_pct: i32,
    pub emote_pct: i32,

    // ===== biases =====
    pub cracked_pickup_bonus: i32,
    pub cracked_flee_bonus: i32,
    pub cracked_attack_scale_pct: i32,
    pub low_ion_convert_bonus: i32,
    pub low_ion_scale_pct: i32,
    pub courage_level_gap: i32,
    pub courage_bonus: i32,

    // ===== attack resolution =====
    pub wear_per_hit: u8,
    pub min_bolt_damage: i32,
    pub min_innate_damage: i32,
    pub enchant_power_per_level: i32,
    /// Mitigation per armour-class point, in thousandths.
    pub mitigation_permille: i32,
    pub crit_pct: i32,
    pub crit_multiplier_pct: i32,
    pub fumble_pct: i32,

    // ===== gear and loot =====
    /// Items a single tile can hold.
    pub ground_cap: usize,
    pub broken_weapon_drop_pct: i32,
    pub convert_enchant_step_pct: u32,

    // ===== pursuit and taunt =====
    pub pursuit_base_pct: i32,
    pub pursuit_loot_penalty: i32,
    pub pursuit_low_ion_penalty: i32,
    pub pursuit_low_hp_pct: i32,
    pub pursuit_low_hp_penalty: i32,
    pub pursuit_cracked_penalty: i32,
    pub taunt_pct: i32,

    // ===== tick pacing =====
    /// Weights for drawing 0, 1, 2 or 3 action credits per tick.
    pub credit_weights: [u32; 4],
    pub exp_per_level: i64,

    /// Fixed seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WAKE_ON_LOOK: i32 = 15;
    pub const DEFAULT_WAKE_ON_ENTRY: i32 = 10;

    pub const DEFAULT_FLEE_HP_PCT: i32 = 25;
    pub const DEFAULT_FLEE_PCT: i32 = 10;
    pub const DEFAULT_HEAL_AT_PCT: i32 = 80;
    pub const DEFAULT_HEAL_PCT: i32 = 20;
    pub const DEFAULT_HEAL_COST: i32 = 5;
    pub const DEFAULT_HEAL_BONUS: i32 = 5;
    pub const DEFAULT_CONVERT_PCT: i32 = 20;
    pub const DEFAULT_LOW_ION_PCT: i32 = 50;
    pub const DEFAULT_CAST_PCT: i32 = 25;
    pub const DEFAULT_SPELL_COST: i32 = 10;
    pub const DEFAULT_SPELL_SUCCESS_PCT: i32 = 75;
    pub const DEFAULT_ATTACK_PCT: i32 = 35;
    pub const DEFAULT_PICKUP_PCT: i32 = 15;
    pub const DEFAULT_EMOTE_PCT: i32 = 10;

    pub const DEFAULT_CRACKED_PICKUP_BONUS: i32 = 10;
    pub const DEFAULT_CRACKED_FLEE_BONUS: i32 = 5;
    pub const DEFAULT_CRACKED_ATTACK_SCALE_PCT: i32 = 50;
    pub const DEFAULT_LOW_ION_CONVERT_BONUS: i32 = 10;
    pub const DEFAULT_LOW_ION_SCALE_PCT: i32 = 60;
    pub const DEFAULT_COURAGE_LEVEL_GAP: i32 = 5;
    pub const DEFAULT_COURAGE_BONUS: i32 = 5;

    pub const DEFAULT_WEAR_PER_HIT: u8 = 5;
    pub const DEFAULT_MIN_BOLT_DAMAGE: i32 = 6;
    pub const DEFAULT_MIN_INNATE_DAMAGE: i32 = 6;
    pub const DEFAULT_ENCHANT_POWER_PER_LEVEL: i32 = 4;
    pub const DEFAULT_MITIGATION_PERMILLE: i32 = 315;
    pub const DEFAULT_CRIT_PCT: i32 = 0;
    pub const DEFAULT_CRIT_MULTIPLIER_PCT: i32 = 200;
    pub const DEFAULT_FUMBLE_PCT: i32 = 0;

    pub const DEFAULT_GROUND_CAP: usize = 6;
    pub const DEFAULT_BROKEN_WEAPON_DROP_PCT: i32 = 80;
    pub const DEFAULT_CONVERT_ENCHANT_STEP_PCT: u32 = 25;

    pub const DEFAULT_PURSUIT_BASE_PCT: i32 = 70;
    pub const DEFAULT_PURSUIT_LOOT_PENALTY: i32 = 20;
    pub const DEFAULT_PURSUIT_LOW_ION_PENALTY: i32 = 15;
    pub const DEFAULT_PURSUIT_LOW_HP_PCT: i32 = 40;
    pub const DEFAULT_PURSUIT_LOW_HP_PENALTY: i32 = 20;
    pub const DEFAULT_PURSUIT_CRACKED_PENALTY: i32 = 25;
    pub const DEFAULT_TAUNT_PCT: i32 = 5;

    pub const DEFAULT_CREDIT_WEIGHTS: [u32; 4] = [50, 30, 15, 5];
    pub const DEFAULT_EXP_PER_LEVEL: i64 = 100;

    pub fn new() -> Self {
        Self {
            wake_on_look: Self::DEFAULT_WAKE_ON_LOOK,
            wake_on_entry: Self::DEFAULT_WAKE_ON_ENTRY,
            flee_hp_pct: Self::DEFAULT_FLEE_HP_PCT,
            flee_pct: Self::DEFAULT_FLEE_PCT,
            heal_at_pct: Self::DEFAULT_HEAL_AT_PCT,
            heal_pct: Self::DEFAULT_HEAL_PCT,
            heal_cost: Self::DEFAULT_HEAL_COST,
            heal_bonus: Self::DEFAULT_HEAL_BONUS,
            convert_pct: Self::DEFAULT_CONVERT_PCT,
            low_ion_pct: Self::DEFAULT_LOW_ION_PCT,
            cast_pct: Self::DEFAULT_CAST_PCT,
            spell_cost: Self::DEFAULT_SPELL_COST,
            spell_success_pct: Self::DEFAULT_SPELL_SUCCESS_PCT,
            attack_pct: Self::DEFAULT_ATTACK_PCT,
            pickup_pct: Self::DEFAULT_PICKUP_PCT,
            emote_pct: Self::DEFAULT_EMOTE_PCT,
            cracked_pickup_bonus: Self::DEFAULT_CRACKED_PICKUP_BONUS,
            cracked_flee_bonus: Self::DEFAULT_CRACKED_FLEE_BONUS,
            cracked_attack_scale_pct: Self::DEFAULT_CRACKED_ATTACK_SCALE_PCT,
            low_ion_convert_bonus: Self::DEFAULT_LOW_ION_CONVERT_BONUS,
            low_ion_scale_pct: Self::DEFAULT_LOW_ION_SCALE_PCT,
            courage_level_gap: Self::DEFAULT_COURAGE_LEVEL_GAP,
            courage_bonus: Self::DEFAULT_COURAGE_BONUS,
            wear_per_hit: Self::DEFAULT_WEAR_PER_HIT,
            min_bolt_damage: Self::DEFAULT_MIN_BOLT_DAMAGE,
            min_innate_damage: Self::DEFAULT_MIN_INNATE_DAMAGE,
            enchant_power_per_level: Self::DEFAULT_ENCHANT_POWER_PER_LEVEL,
            mitigation_permille: Self::DEFAULT_MITIGATION_PERMILLE,
            crit_pct: Self::DEFAULT_CRIT_PCT,
            crit_multiplier_pct: Self::DEFAULT_CRIT_MULTIPLIER_PCT,
            fumble_pct: Self::DEFAULT_FUMBLE_PCT,
            ground_cap: Self::DEFAULT_GROUND_CAP,
            broken_weapon_drop_pct: Self::DEFAULT_BROKEN_WEAPON_DROP_PCT,
            convert_enchant_step_pct: Self::DEFAULT_CONVERT_ENCHANT_STEP_PCT,
            pursuit_base_pct: Self::DEFAULT_PURSUIT_BASE_PCT,
            pursuit_loot_penalty: Self::DEFAULT_PURSUIT_LOOT_PENALTY,
            pursuit_low_ion_penalty: Self::DEFAULT_PURSUIT_LOW_ION_PENALTY,
            pursuit_low_hp_pct: Self::DEFAULT_PURSUIT_LOW_HP_PCT,
            pursuit_low_hp_penalty: Self::DEFAULT_PURSUIT_LOW_HP_PENALTY,
            pursuit_cracked_penalty: Self::DEFAULT_PURSUIT_CRACKED_PENALTY,
            taunt_pct: Self::DEFAULT_TAUNT_PCT,
            credit_weights: Self::DEFAULT_CREDIT_WEIGHTS,
            exp_per_level: Self::DEFAULT_EXP_PER_LEVEL,
            seed: None,
        }
    }

    /// Every engaged monster acts exactly once per tick.
    #[must_use]
    pub fn with_single_credit(mut self) -> Self {
        self.credit_weights = [0, 1, 0, 0];
        self
    }

    #[must_use]
    pub fn with_ground_cap(mut self, ground_cap: usize) -> Self {
        self.ground_cap = ground_cap;
        self
    }

    #[must_use]
    pub fn with_wear_per_hit(mut self, wear_per_hit: u8) -> Self {
        self.wear_per_hit = wear_per_hit;
        self
    }

    #[must_use]
    pub fn with_crit(mut self, crit_pct: i32, crit_multiplier_pct: i32) -> Self {
        self.crit_pct = crit_pct;
        self.crit_multiplier_pct = crit_multiplier_pct;
        self
    }

    #[must_use]
    pub fn with_fumble_pct(mut self, fumble_pct: i32) -> Self {
        self.fumble_pct = fumble_pct;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets every cascade gate threshold to 0 except the ones given.
    ///
    /// Handy for scenario tests that isolate one gate.
    #[must_use]
    pub fn with_only_gates(mut self, gates: &[(crate::ai::Gate, i32)]) -> Self {
        use crate::ai::Gate;

        self.flee_pct = 0;
        self.heal_pct = 0;
        self.convert_pct = 0;
        self.cast_pct = 0;
        self.attack_pct = 0;
        self.pickup_pct = 0;
        self.emote_pct = 0;
        self.cracked_flee_bonus = 0;
        self.cracked_pickup_bonus = 0;
        self.low_ion_convert_bonus = 0;
        self.courage_bonus = 0;
        for &(gate, threshold) in gates {
            match gate {
                Gate::Flee => self.flee_pct = threshold,
                Gate::Heal => self.heal_pct = threshold,
                Gate::Convert => self.convert_pct = threshold,
                Gate::Cast => self.cast_pct = threshold,
                Gate::Attack => self.attack_pct = threshold,
                Gate::Pickup => self.pickup_pct = threshold,
                Gate::Emote => self.emote_pct = threshold,
                Gate::Idle => {}
            }
        }
        self
    }

    /// Total of the credit weight table; zero disables monster actions.
    pub fn credit_weight_total(&self) -> u32 {
        self.credit_weights.iter().sum()
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Gate;

    #[test]
    fn defaults_match_documented_values() {
        let config = CombatConfig::default();
        assert_eq!(config.wake_on_look, 15);
        assert_eq!(config.wake_on_entry, 10);
        assert_eq!(config.ground_cap, 6);
        assert_eq!(config.crit_pct, 0);
        assert_eq!(config.credit_weight_total(), 100);
    }

    #[test]
    fn only_gates_zeroes_the_rest() {
        let config = CombatConfig::new().with_only_gates(&[(Gate::Attack, 100)]);
        assert_eq!(config.attack_pct, 100);
        assert_eq!(config.flee_pct, 0);
        assert_eq!(config.emote_pct, 0);
    }
}
