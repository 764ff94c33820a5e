//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;
use serde_json::Value;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing knobs keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config: CombatConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }

    /// Load a TOML config, then layer the JSON override file on top of it.
    pub fn load_with_overrides(path: &Path, overrides: &Path) -> LoadResult<CombatConfig> {
        let config = Self::load(path)?;
        let content = read_file(overrides)?;
        apply_json_overrides(config, &content)
    }
}

/// Applies a JSON object of knob overrides to `config`.
///
/// The override file is tolerant: unknown keys and values of the wrong type
/// are skipped with a warning and the remaining keys still apply. Only a
/// document that is not a JSON object is an error.
pub fn apply_json_overrides(config: CombatConfig, json: &str) -> LoadResult<CombatConfig> {
    let overrides: Value = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("Failed to parse config overrides JSON: {}", e))?;
    let Value::Object(overrides) = overrides else {
        anyhow::bail!("Config overrides must be a JSON object");
    };

    let mut current = serde_json::to_value(&config)?;
    for (key, value) in overrides {
        let known = current.as_object().is_some_and(|fields| fields.contains_key(&key));
        if !known {
            tracing::warn!(%key, "unknown config override ignored");
            continue;
        }

        let mut candidate = current.clone();
        candidate[key.as_str()] = value;
        match serde_json::from_value::<CombatConfig>(candidate.clone()) {
            Ok(_) => {
                tracing::debug!(%key, "config override applied");
                current = candidate;
            }
            Err(error) => {
                tracing::warn!(%key, %error, "config override has the wrong type; ignored");
            }
        }
    }

    Ok(serde_json::from_value(current)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_keeps_defaults_for_missing_knobs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "flee_pct = 40\nground_cap = 3\ncredit_weights = [0, 1, 0, 0]").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.flee_pct, 40);
        assert_eq!(config.ground_cap, 3);
        assert_eq!(config.credit_weights, [0, 1, 0, 0]);
        assert_eq!(config.heal_cost, CombatConfig::default().heal_cost);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "flee_pct = \"often\"").unwrap();

        let error = ConfigLoader::load(file.path()).unwrap_err();
        assert!(error.to_string().contains("config TOML"));
    }

    #[test]
    fn overrides_apply_known_keys() {
        let config = apply_json_overrides(
            CombatConfig::default(),
            r#"{ "attack_pct": 90, "seed": 42 }"#,
        )
        .unwrap();
        assert_eq!(config.attack_pct, 90);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn bad_override_entries_are_skipped() {
        let config = apply_json_overrides(
            CombatConfig::default(),
            r#"{ "no_such_knob": 1, "heal_pct": "lots", "emote_pct": 12 }"#,
        )
        .unwrap();
        let defaults = CombatConfig::default();
        assert_eq!(config.heal_pct, defaults.heal_pct);
        assert_eq!(config.emote_pct, 12);
    }

    #[test]
    fn non_object_overrides_are_rejected() {
        assert!(apply_json_overrides(CombatConfig::default(), "[1, 2]").is_err());
        assert!(apply_json_overrides(CombatConfig::default(), "{ nope").is_err());
    }

    #[test]
    fn load_with_overrides_layers_json_on_toml() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("config.toml");
        let json_path = dir.path().join("overrides.json");
        std::fs::write(&toml_path, "cast_pct = 20\nspell_cost = 8\n").unwrap();
        std::fs::write(&json_path, r#"{ "spell_cost": 12 }"#).unwrap();

        let config = ConfigLoader::load_with_overrides(&toml_path, &json_path).unwrap();
        assert_eq!(config.cast_pct, 20);
        assert_eq!(config.spell_cost, 12);
    }
}
