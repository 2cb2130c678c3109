//! Caller-supplied configuration, loaded from YAML.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::derive::DerivedCharacter;
use crate::error::{EngineError, EngineResult};
use crate::history::DEFAULT_HISTORY;
use crate::Ability;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Class name → key ability used for class DC.
    pub key_abilities: IndexMap<String, Ability>,
    /// How many rolls the dice history keeps.
    pub roll_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let key_abilities = [
            ("alchemist", Ability::Int),
            ("barbarian", Ability::Str),
            ("bard", Ability::Cha),
            ("cleric", Ability::Wis),
            ("druid", Ability::Wis),
            ("oracle", Ability::Cha),
            ("sorcerer", Ability::Cha),
            ("witch", Ability::Int),
            ("wizard", Ability::Int),
        ]
        .into_iter()
        .map(|(class, ability)| (class.to_string(), ability))
        .collect();
        Self {
            key_abilities,
            roll_history: DEFAULT_HISTORY,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(text: &str) -> EngineResult<Self> {
        serde_yaml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| EngineError::Io {
            path: path.display().to_string(),
            source: e.into(),
        })?;
        Self::from_yaml_str(&text)
    }

    /// Class table first, then the export's own key ability. The default
    /// table only lists classes with a fixed key ability; classes that
    /// choose (champion, fighter, monk, ranger, rogue, ...) fall through to
    /// the export unless a config entry names them.
    pub fn key_ability_for(&self, character: &DerivedCharacter) -> Option<Ability> {
        self.key_abilities
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(&character.class_name))
            .map(|(_, ability)| *ability)
            .or(character.key_ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = EngineConfig::from_yaml_str("roll_history: 5\n").unwrap();
        assert_eq!(cfg.roll_history, 5);
        assert_eq!(cfg.key_abilities.get("cleric"), Some(&Ability::Wis));
    }

    #[test]
    fn yaml_overrides_key_abilities() {
        let cfg = EngineConfig::from_yaml_str("key_abilities:\n  Fighter: dex\n").unwrap();
        assert_eq!(cfg.key_abilities.len(), 1);
        assert_eq!(cfg.key_abilities.get("Fighter"), Some(&Ability::Dex));
    }

    #[test]
    fn choice_classes_are_not_in_the_default_table() {
        let cfg = EngineConfig::default();
        for class in ["champion", "fighter", "monk", "ranger", "rogue"] {
            assert!(!cfg.key_abilities.contains_key(class), "{class}");
        }
    }

    #[test]
    fn missing_file_keeps_the_io_source() {
        use std::error::Error;

        let err = EngineConfig::load("no/such/pathkeeper.yaml").unwrap_err();
        match &err {
            EngineError::Io { path, source } => {
                assert_eq!(path, "no/such/pathkeeper.yaml");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}"),
        }
        let io = err.source().and_then(|s| s.source());
        assert!(io.is_some_and(|e| e.is::<std::io::Error>()));
    }

    #[test]
    fn bad_yaml_is_a_config_error() {
        assert!(matches!(
            EngineConfig::from_yaml_str("roll_history: lots"),
            Err(EngineError::Config(_))
        ));
    }
}
