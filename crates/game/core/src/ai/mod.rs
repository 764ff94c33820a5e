//! Monster decision making.
//!
//! Dormant monsters only roll to wake. Engaged monsters draw action credits
//! and spend each one on a cascade evaluation, after shedding broken gear.
//! Everything here decides; the turn orchestrator applies.

pub mod cascade;
pub mod credits;
pub mod emote;
pub mod gear;
pub mod pursuit;
pub mod wake;

pub use cascade::{
    CascadeDecision, CascadeFacts, Gate, GateRecord, GateThresholds, SkipReason, evaluate,
};
pub use credits::draw_credits;
pub use emote::pick_emote;
pub use gear::{
    GearResponse, best_convertible, best_pickup, best_replacement_weapon, improves_wielded,
    pickup_score, plan_gear_response,
};
pub use pursuit::{PursuitModifier, PursuitRoll, pursuit_chance, roll_pursuit};
pub use wake::{WakeRoll, WakeTrigger, roll_wake, taunt_lines, wake_threshold};
