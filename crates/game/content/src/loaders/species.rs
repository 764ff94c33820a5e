//! Species table loader.

use std::path::Path;

use combat_core::{SpeciesProfile, SpeciesTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Species table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesFile {
    pub species: Vec<SpeciesProfile>,
}

/// Loader for monster species from RON files.
pub struct SpeciesLoader;

impl SpeciesLoader {
    /// Load the species table from a RON file.
    pub fn load(path: &Path) -> LoadResult<SpeciesTable> {
        let content = read_file(path)?;
        let file: SpeciesFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse species RON: {}", e))?;

        let mut table = SpeciesTable::new();
        for profile in file.species {
            let id = profile.id;
            if table.insert(profile).is_some() {
                anyhow::bail!("Duplicate {} in {}", id, path.display());
            }
        }
        tracing::debug!(species = table.len(), path = %path.display(), "species table loaded");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{SpeciesId, SpeciesOracle, StatusKind};

    #[test]
    fn loads_overrides_and_innate_attacks() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"(
    species: [
        (
            id: (1),
            name: "ghoul",
            overrides: (flee: Some(40), wake_on_look: Some(50)),
            innate: (
                name: "claw",
                base_power: 4,
                power_per_level: 1,
                status: Some((kind: Poisoned, remaining: 3, intensity: 2)),
            ),
            taunt: Some("{monster} hisses at you!"),
        ),
        (
            id: (2),
            name: "archer",
            prefers_ranged: true,
            emotes: ["{monster} nocks an arrow."],
            exp_bonus: 25,
        ),
    ],
)"#,
        )
        .unwrap();

        let table = SpeciesLoader::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);

        let ghoul = table.profile(SpeciesId(1)).unwrap();
        assert_eq!(ghoul.overrides.flee, Some(40));
        assert_eq!(ghoul.overrides.heal, None);
        assert_eq!(ghoul.overrides.wake_on_look, Some(50));
        assert_eq!(ghoul.innate.power_at(3), 7);
        assert_eq!(ghoul.innate.status.map(|s| s.kind), Some(StatusKind::Poisoned));

        let archer = table.profile(SpeciesId(2)).unwrap();
        assert!(archer.prefers_ranged);
        assert_eq!(archer.emote_count(), 1);
        assert_eq!(archer.exp_bonus, 25);
        assert_eq!(archer.taunt, None);
    }

    #[test]
    fn duplicate_species_are_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"(species: [(id: (1), name: "a"), (id: (1), name: "b")])"#,
        )
        .unwrap();
        let error = SpeciesLoader::load(file.path()).unwrap_err();
        assert!(error.to_string().contains("Duplicate species:1"));
    }
}
