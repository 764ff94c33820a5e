//! Per-species monster data.
//!
//! Species never subclass behaviour: everything that varies between monster
//! kinds (thresholds, innate attack, flavour lines) is plain data looked up
//! through [`SpeciesOracle`].

use std::collections::BTreeMap;
use std::fmt;

use crate::state::InnateAttack;

/// Species table key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesId(pub u16);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "species:{}", self.0)
    }
}

/// Emote lines used when a species does not define its own.
pub const DEFAULT_EMOTES: [&str; 7] = [
    "{monster} is looking awfully sad.",
    "{monster} is singing a strange song.",
    "{monster} is making strange noises.",
    "{monster} looks at you.",
    "{monster} pleads with you.",
    "{monster} is trying to make friends with you.",
    "{monster} is wondering what you're doing.",
];

/// Generic line emitted on a successful taunt roll.
pub const READY_LINE: &str = "{monster} is getting ready to combat you!";

/// Optional per-gate threshold overrides. `None` keeps the global value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GateOverrides {
    pub flee: Option<i32>,
    pub heal: Option<i32>,
    pub convert: Option<i32>,
    pub cast: Option<i32>,
    pub attack: Option<i32>,
    pub pickup: Option<i32>,
    pub emote: Option<i32>,
    pub wake_on_look: Option<i32>,
    pub wake_on_entry: Option<i32>,
}

/// Data describing one monster species.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesProfile {
    pub id: SpeciesId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: GateOverrides,
    #[cfg_attr(feature = "serde", serde(default))]
    pub innate: InnateAttack,
    /// Prefers bolts over melee when both are available.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefers_ranged: bool,
    /// Line emitted when the monster wakes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub taunt: Option<String>,
    /// Replaces the default emote lines when non-empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub emotes: Vec<String>,
    /// Extra experience granted to the killer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exp_bonus: i64,
}

impl SpeciesProfile {
    pub fn new(id: SpeciesId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: GateOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_innate(mut self, innate: InnateAttack) -> Self {
        self.innate = innate;
        self
    }

    #[must_use]
    pub fn with_taunt(mut self, taunt: impl Into<String>) -> Self {
        self.taunt = Some(taunt.into());
        self
    }

    #[must_use]
    pub fn preferring_ranged(mut self) -> Self {
        self.prefers_ranged = true;
        self
    }

    /// Emote line `index` with the monster name substituted.
    pub fn emote_line(&self, index: usize, monster: &str) -> Option<String> {
        let template = if self.emotes.is_empty() {
            DEFAULT_EMOTES.get(index).copied()
        } else {
            self.emotes.get(index).map(String::as_str)
        }?;
        Some(template.replace("{monster}", monster))
    }

    pub fn emote_count(&self) -> usize {
        if self.emotes.is_empty() {
            DEFAULT_EMOTES.len()
        } else {
            self.emotes.len()
        }
    }
}

/// Read-only access to species data.
pub trait SpeciesOracle: Send + Sync {
    fn profile(&self, id: SpeciesId) -> Option<&SpeciesProfile>;
}

/// In-memory species table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesTable {
    profiles: BTreeMap<SpeciesId, SpeciesProfile>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: SpeciesProfile) -> Option<SpeciesProfile> {
        self.profiles.insert(profile.id, profile)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesProfile> {
        self.profiles.values()
    }
}

impl FromIterator<SpeciesProfile> for SpeciesTable {
    fn from_iter<T: IntoIterator<Item = SpeciesProfile>>(iter: T) -> Self {
        let mut table = Self::new();
        for profile in iter {
            table.insert(profile);
        }
        table
    }
}

impl SpeciesOracle for SpeciesTable {
    fn profile(&self, id: SpeciesId) -> Option<&SpeciesProfile> {
        self.profiles.get(&id)
    }
}
