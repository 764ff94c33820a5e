//! Action credits: how many cascade evaluations a monster gets per tick.

use crate::env::{Dice, RollPurpose};
use crate::state::CombatantId;

/// Draws 0..=3 credits from the weight table.
///
/// A monster whose target has just re-entered its location always gets at
/// least one credit.
pub fn draw_credits(monster: CombatantId, weights: &[u32; 4], reentry: bool, dice: &mut Dice<'_>) -> u8 {
    let total: u32 = weights.iter().sum();
    let drawn = if total == 0 {
        0
    } else if weights.iter().filter(|w| **w > 0).count() == 1 {
        weights.iter().position(|w| *w > 0).unwrap_or(0) as u8
    } else {
        let draw = dice.pick(monster, RollPurpose::Credits, total);
        let mut cumulative = 0;
        let mut credits = 0;
        for (count, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                credits = count as u8;
                break;
            }
        }
        credits
    };

    if reentry && drawn == 0 { 1 } else { drawn }
}
