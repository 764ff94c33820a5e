//! RNG oracle for deterministic random number generation.
//!
//! All probabilistic combat decisions (wake rolls, cascade gates, loot-free
//! weapon drops, crits) draw a 0..=99 percentile roll through [`Dice`], which
//! keys every draw by `(game seed, tick, actor, purpose, draw index)`.
//!
//! # Determinism
//!
//! All RNG implementations must be deterministic: given the same seed, they
//! must produce the same value. Two runs over the same world and inputs
//! therefore produce byte-identical roll sequences.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ai::Gate;
use crate::state::{CombatantId, Tick};

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a percentile (0-99 inclusive).
    fn roll_percent(&self, seed: u64) -> u32 {
        self.next_u32(seed) % 100
    }

    /// Generate a random value in range [0, bound).
    fn below(&self, seed: u64, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32(seed) % bound
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Test double that replays a fixed script of values, ignoring the seed.
///
/// Once the script runs out every draw returns `fallback` (99 by default,
/// which fails every percentile gate).
#[derive(Debug, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: AtomicUsize,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: AtomicUsize::new(0),
            fallback: 99,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of scripted values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor.load(Ordering::SeqCst).min(self.values.len())
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.values.get(index).copied().unwrap_or(self.fallback)
    }
}

/// Compute deterministic seed from world components.
///
/// # Arguments
///
/// * `game_seed` - Base seed set at world creation (for replay/determinism)
/// * `tick` - World tick being resolved
/// * `actor_id` - Combatant the roll belongs to
/// * `context` - Purpose code and draw index for multiple rolls in one tick
pub fn compute_seed(game_seed: u64, tick: u64, actor_id: u32, context: u32) -> u64 {
    // These constants are based on SplitMix64 and FxHash multipliers
    let mut hash = game_seed;

    hash ^= tick.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Why a roll was drawn. Part of the seed key and of the roll history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollPurpose {
    WakeLook,
    WakeEntry,
    Gate(Gate),
    CastSuccess,
    BrokenWeaponDrop,
    AttackSource,
    Crit,
    Fumble,
    Emote,
    Taunt,
    Pursuit,
    Credits,
}

impl RollPurpose {
    /// Stable numeric code mixed into the seed.
    pub const fn code(self) -> u32 {
        match self {
            Self::WakeLook => 1,
            Self::WakeEntry => 2,
            Self::Gate(gate) => 16 + gate.order() as u32,
            Self::CastSuccess => 3,
            Self::BrokenWeaponDrop => 4,
            Self::AttackSource => 5,
            Self::Crit => 6,
            Self::Fumble => 7,
            Self::Emote => 8,
            Self::Taunt => 9,
            Self::Pursuit => 10,
            Self::Credits => 11,
        }
    }
}

/// One drawn roll, kept for golden-log comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollRecord {
    pub actor: CombatantId,
    pub purpose: RollPurpose,
    pub value: u32,
}

/// Per-tick roll source.
///
/// Wraps an [`RngOracle`] and derives a fresh seed for every draw so that the
/// same `(seed, tick, actor, purpose)` input always yields the same roll,
/// independent of how many unrelated rolls were drawn before it.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    game_seed: u64,
    tick: Tick,
    draws: BTreeMap<(CombatantId, RollPurpose), u32>,
    history: Vec<RollRecord>,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, game_seed: u64, tick: Tick) -> Self {
        Self {
            rng,
            game_seed,
            tick,
            draws: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    fn next_seed(&mut self, actor: CombatantId, purpose: RollPurpose) -> u64 {
        let draw = self.draws.entry((actor, purpose)).or_insert(0);
        let context = purpose.code() | (*draw << 8);
        *draw += 1;
        compute_seed(self.game_seed, self.tick.0, actor.0, context)
    }

    /// Draws a 0..=99 roll.
    pub fn roll(&mut self, actor: CombatantId, purpose: RollPurpose) -> u32 {
        let seed = self.next_seed(actor, purpose);
        let value = self.rng.roll_percent(seed);
        self.history.push(RollRecord {
            actor,
            purpose,
            value,
        });
        value
    }

    /// Draws a value in `0..bound`.
    pub fn pick(&mut self, actor: CombatantId, purpose: RollPurpose, bound: u32) -> u32 {
        let seed = self.next_seed(actor, purpose);
        let value = self.rng.below(seed, bound);
        self.history.push(RollRecord {
            actor,
            purpose,
            value,
        });
        value
    }

    /// Rolls against a percentage threshold.
    ///
    /// Thresholds at or below 0 never pass and thresholds at or above 100
    /// always pass; neither draws a roll.
    pub fn passes(&mut self, actor: CombatantId, purpose: RollPurpose, threshold: i32) -> bool {
        if threshold <= 0 {
            return false;
        }
        if threshold >= 100 {
            return true;
        }
        self.roll(actor, purpose) < threshold as u32
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn history(&self) -> &[RollRecord] {
        &self.history
    }

    pub fn into_history(self) -> Vec<RollRecord> {
        self.history
    }
}
