//! Emote line selection.

use crate::env::{DEFAULT_EMOTES, Dice, RollPurpose, SpeciesProfile};
use crate::state::Combatant;

/// Picks an emote line for `monster`, drawing the index from the dice.
pub fn pick_emote(monster: &Combatant, profile: Option<&SpeciesProfile>, dice: &mut Dice<'_>) -> String {
    let count = profile.map(|p| p.emote_count()).unwrap_or(DEFAULT_EMOTES.len());
    let index = dice.pick(monster.id, RollPurpose::Emote, count as u32) as usize;
    profile
        .and_then(|p| p.emote_line(index, &monster.name))
        .unwrap_or_else(|| DEFAULT_EMOTES[index % DEFAULT_EMOTES.len()].replace("{monster}", &monster.name))
}
