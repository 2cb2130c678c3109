//! Rules core for a Pathfinder 2e table companion.
//!
//! Turns Pathbuilder character exports into derived sheets, answers
//! modifier/DC lookups against them, and rolls dice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod backup;
pub mod build;
pub mod checks;
pub mod config;
pub mod content;
pub mod derive;
pub mod dice;
pub mod error;
pub mod history;
pub mod import;
pub mod lookup;
pub mod notes;
pub mod proficiency;
pub mod store;

pub use backup::BackupEnvelope;
pub use build::{ExportDocument, MAX_LEVEL, RawCharacterBuild, builtin_builds, parse_export};
pub use checks::{CheckResult, Natural, check};
pub use config::EngineConfig;
pub use content::{ContentItem, ContentKind};
pub use derive::{DerivedCharacter, SpellcastingLine, StatLine, derive_character};
pub use dice::{Dice, DiceSpec, RollRecord, roll};
pub use error::{EngineError, EngineResult, IoError};
pub use history::RollHistory;
pub use import::{ImportFailure, ImportReport, import_documents, import_into};
pub use lookup::{DcTarget, Lookup};
pub use notes::{GmNote, NoteCategory};
pub use proficiency::{ProficiencyRank, proficiency_bonus};
pub use store::{CharacterStore, MemoryStore};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Ability::Str => "STR",
            Ability::Dex => "DEX",
            Ability::Con => "CON",
            Ability::Int => "INT",
            Ability::Wis => "WIS",
            Ability::Cha => "CHA",
        };
        f.write_str(label)
    }
}

impl FromStr for Ability {
    type Err = EngineError;

    /// Accepts the export's three-letter keys as well as full names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Str),
            "dex" | "dexterity" => Ok(Ability::Dex),
            "con" | "constitution" => Ok(Ability::Con),
            "int" | "intelligence" => Ok(Ability::Int),
            "wis" | "wisdom" => Ok(Ability::Wis),
            "cha" | "charisma" => Ok(Ability::Cha),
            other => Err(EngineError::Config(format!("unknown ability '{other}'"))),
        }
    }
}

/// The six raw ability scores, keyed the way Pathbuilder exports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str")]
    pub str_: i32,
    pub dex: i32,
    pub con: i32,
    #[serde(rename = "int")]
    pub int_: i32,
    pub wis: i32,
    pub cha: i32,
}

impl AbilityScores {
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str_,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int_,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn mod_of(&self, ability: Ability) -> i32 {
        ability_mod(self.score(ability))
    }
}

/// Ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division;
    // halving first keeps every i32 in range.
    score.div_euclid(2) - 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_parses_short_and_long_names() {
        assert_eq!("cha".parse::<Ability>().unwrap(), Ability::Cha);
        assert_eq!("Wisdom".parse::<Ability>().unwrap(), Ability::Wis);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn ability_serializes_as_export_key() {
        assert_eq!(serde_json::to_string(&Ability::Int).unwrap(), "\"int\"");
        assert_eq!(Ability::Int.to_string(), "INT");
    }
}
