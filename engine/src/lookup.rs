//! Modifier and DC lookups over a collection of derived characters.
//!
//! Every lookup answers `None` when the character or the stat is absent.
//! That is the normal "not found" branch, not an error.

use crate::derive::DerivedCharacter;
use crate::{Ability, ability_mod};

/// Which DC a caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DcTarget {
    /// Class DC keyed off the given ability.
    Class(Ability),
    /// DC of the first trained spellcasting entry.
    Spell,
    /// `10 + skill total`.
    Skill(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    characters: &'a [DerivedCharacter],
}

impl<'a> Lookup<'a> {
    pub fn new(characters: &'a [DerivedCharacter]) -> Self {
        Self { characters }
    }

    pub fn character(&self, id: &str) -> Option<&'a DerivedCharacter> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn skill(&self, id: &str, skill: &str) -> Option<i32> {
        Some(self.character(id)?.skill(skill)?.total)
    }

    pub fn save(&self, id: &str, save: &str) -> Option<i32> {
        Some(self.character(id)?.save(save)?.total)
    }

    /// Loose match: first attack whose name contains `fragment`.
    pub fn attack(&self, id: &str, fragment: &str) -> Option<i32> {
        Some(self.character(id)?.attack(fragment)?.total)
    }

    pub fn perception(&self, id: &str) -> Option<i32> {
        Some(self.character(id)?.perception.total)
    }

    /// `10 + mod(key_ability) + prof(classDC rank, level)`. The key ability
    /// is the caller's call; see `EngineConfig::key_ability_for`.
    pub fn class_dc(&self, id: &str, key_ability: Ability) -> Option<i32> {
        let character = self.character(id)?;
        let modifier = ability_mod(character.abilities.score(key_ability));
        Some(10 + modifier + character.class_dc_rank.bonus(character.level))
    }

    pub fn spell_dc(&self, id: &str) -> Option<i32> {
        Some(self.character(id)?.primary_caster()?.dc)
    }

    pub fn spell_attack(&self, id: &str) -> Option<i32> {
        Some(self.character(id)?.primary_caster()?.attack_bonus)
    }

    pub fn skill_dc(&self, id: &str, skill: &str) -> Option<i32> {
        self.skill(id, skill).map(|total| 10 + total)
    }

    pub fn dc(&self, id: &str, target: &DcTarget) -> Option<i32> {
        match target {
            DcTarget::Class(ability) => self.class_dc(id, *ability),
            DcTarget::Spell => self.spell_dc(id),
            DcTarget::Skill(name) => self.skill_dc(id, name),
        }
    }
}
