//! Stat derivation: raw Pathbuilder build in, fully derived sheet out.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::build::{CLASS_DC_KEY, ExportDocument, PERCEPTION_KEY, RawCharacterBuild};
use crate::error::{EngineError, EngineResult};
use crate::proficiency::ProficiencyRank;
use crate::{Ability, AbilityScores};

/// Skill → governing ability. Keys match the export's proficiency keys.
pub const SKILL_ABILITIES: [(&str, Ability); 16] = [
    ("acrobatics", Ability::Dex),
    ("arcana", Ability::Int),
    ("athletics", Ability::Str),
    ("crafting", Ability::Int),
    ("deception", Ability::Cha),
    ("diplomacy", Ability::Cha),
    ("intimidation", Ability::Cha),
    ("medicine", Ability::Wis),
    ("nature", Ability::Wis),
    ("occultism", Ability::Int),
    ("performance", Ability::Cha),
    ("religion", Ability::Wis),
    ("society", Ability::Int),
    ("stealth", Ability::Dex),
    ("survival", Ability::Wis),
    ("thievery", Ability::Dex),
];

/// Saving throw → governing ability.
pub const SAVE_ABILITIES: [(&str, Ability); 3] = [
    ("fortitude", Ability::Con),
    ("reflex", Ability::Dex),
    ("will", Ability::Wis),
];

/// Weapon category proficiency key → display name.
pub const WEAPON_CATEGORIES: [(&str, &str); 4] = [
    ("simple", "Simple Weapons"),
    ("martial", "Martial Weapons"),
    ("advanced", "Advanced Weapons"),
    ("unarmed", "Unarmed"),
];

/// Every weapon category attacks off Strength; finesse is not modelled.
pub const WEAPON_ABILITY: Ability = Ability::Str;
pub const PERCEPTION_ABILITY: Ability = Ability::Wis;
pub const LORE_ABILITY: Ability = Ability::Int;

/// One derived skill, save, or attack bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    pub name: String,
    pub ability: Ability,
    pub rank: ProficiencyRank,
    pub ability_modifier: i32,
    pub proficiency_bonus: i32,
    /// Always `ability_modifier + proficiency_bonus`.
    pub total: i32,
}

impl StatLine {
    pub fn new(
        name: impl Into<String>,
        ability: Ability,
        rank: ProficiencyRank,
        scores: &AbilityScores,
        level: u32,
    ) -> Self {
        let ability_modifier = scores.mod_of(ability);
        let proficiency_bonus = rank.bonus(level);
        Self {
            name: name.into(),
            ability,
            rank,
            ability_modifier,
            proficiency_bonus,
            total: ability_modifier.saturating_add(proficiency_bonus),
        }
    }
}

impl fmt::Display for StatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {:+} [mod {:+}, prof {:+}, {}]",
            self.name, self.ability, self.total, self.ability_modifier, self.proficiency_bonus, self.rank
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingLine {
    pub name: String,
    pub tradition: String,
    pub ability: Ability,
    pub rank: ProficiencyRank,
    pub ability_modifier: i32,
    pub proficiency_bonus: i32,
    pub dc: i32,
    pub attack_bonus: i32,
}

impl fmt::Display for SpellcastingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) DC {} attack {:+}",
            self.name, self.tradition, self.ability, self.dc, self.attack_bonus
        )
    }
}

/// A character sheet derived once at import time. Never edited in place;
/// re-derive from the raw build instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCharacter {
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub level: u32,
    pub ancestry: String,
    #[serde(default)]
    pub heritage: Option<String>,
    /// Key ability as declared by the export, if it named a valid one.
    #[serde(default)]
    pub key_ability: Option<Ability>,
    pub abilities: AbilityScores,
    pub proficiencies: IndexMap<String, i32>,
    pub class_dc_rank: ProficiencyRank,
    pub skills: Vec<StatLine>,
    pub saves: Vec<StatLine>,
    pub attacks: Vec<StatLine>,
    pub spellcasting: Vec<SpellcastingLine>,
    pub perception: StatLine,
    #[serde(default)]
    pub lores: Vec<StatLine>,
    pub ac: i32,
    pub hp: i32,
}

impl DerivedCharacter {
    pub fn skill(&self, name: &str) -> Option<&StatLine> {
        find_exact(&self.skills, name)
    }

    pub fn save(&self, name: &str) -> Option<&StatLine> {
        find_exact(&self.saves, name)
    }

    /// First attack whose name contains `fragment`, ignoring case.
    pub fn attack(&self, fragment: &str) -> Option<&StatLine> {
        let needle = fragment.to_lowercase();
        self.attacks
            .iter()
            .find(|a| a.name.to_lowercase().contains(&needle))
    }

    /// First spellcasting entry the character is actually trained in.
    pub fn primary_caster(&self) -> Option<&SpellcastingLine> {
        self.spellcasting.iter().find(|s| s.rank.is_trained())
    }
}

fn find_exact<'a>(lines: &'a [StatLine], name: &str) -> Option<&'a StatLine> {
    lines.iter().find(|l| l.name.eq_ignore_ascii_case(name))
}

/// Derive a sheet from a whole export document. Rejects exports that
/// report failure or carry no build.
pub fn derive_character(export: &ExportDocument) -> EngineResult<DerivedCharacter> {
    derive_character_as(export, "export")
}

/// Like [`derive_character`], with `label` naming the record when the
/// build is absent.
pub(crate) fn derive_character_as(
    export: &ExportDocument,
    label: &str,
) -> EngineResult<DerivedCharacter> {
    let record = export
        .build
        .as_ref()
        .map(|b| b.name.as_str())
        .unwrap_or(label);
    if !export.success {
        return Err(EngineError::import(record, "export reports success: false"));
    }
    let build = export
        .build
        .as_ref()
        .ok_or_else(|| EngineError::import(record, "missing build"))?;
    derive_build(build)
}

/// Derive a sheet from a build that is already known to be present.
pub fn derive_build(build: &RawCharacterBuild) -> EngineResult<DerivedCharacter> {
    build.validate()?;

    let scores = &build.abilities;
    let level = build.level;
    let line = |name: &str, key: &str, ability: Ability| -> EngineResult<StatLine> {
        let rank = ProficiencyRank::try_from(build.rank_of(key))?;
        Ok(StatLine::new(name, ability, rank, scores, level))
    };

    let skills = SKILL_ABILITIES
        .iter()
        .map(|(key, ability)| line(&title_case(key), key, *ability))
        .collect::<EngineResult<Vec<_>>>()?;

    let saves = SAVE_ABILITIES
        .iter()
        .map(|(key, ability)| line(&title_case(key), key, *ability))
        .collect::<EngineResult<Vec<_>>>()?;

    let mut attacks = Vec::with_capacity(WEAPON_CATEGORIES.len());
    for (key, display) in WEAPON_CATEGORIES {
        let attack = line(display, key, WEAPON_ABILITY)?;
        if attack.rank.is_trained() {
            attacks.push(attack);
        }
    }

    let spellcasting = build
        .spell_casters
        .iter()
        .map(|caster| -> EngineResult<SpellcastingLine> {
            let ability: Ability = caster.ability.parse().map_err(|_| {
                EngineError::import(
                    &build.name,
                    format!(
                        "spellcasting entry '{}' has unknown ability '{}'",
                        caster.name, caster.ability
                    ),
                )
            })?;
            let rank = ProficiencyRank::try_from(caster.proficiency)?;
            let ability_modifier = scores.mod_of(ability);
            let proficiency_bonus = rank.bonus(level);
            Ok(SpellcastingLine {
                name: caster.name.clone(),
                tradition: caster.magic_tradition.clone(),
                ability,
                rank,
                ability_modifier,
                proficiency_bonus,
                dc: 10 + ability_modifier + proficiency_bonus,
                attack_bonus: ability_modifier + proficiency_bonus,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let perception = line("Perception", PERCEPTION_KEY, PERCEPTION_ABILITY)?;

    let lores = build
        .lores
        .iter()
        .map(|(topic, raw)| -> EngineResult<StatLine> {
            let rank = ProficiencyRank::try_from(*raw)?;
            Ok(StatLine::new(
                format!("{topic} Lore"),
                LORE_ABILITY,
                rank,
                scores,
                level,
            ))
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let class_dc_rank = ProficiencyRank::try_from(build.rank_of(CLASS_DC_KEY))?;

    let attrs = &build.attributes;
    // Con and per-level bonuses apply uniformly at every level, first included.
    let per_level = i64::from(attrs.classhp)
        + i64::from(scores.mod_of(Ability::Con))
        + i64::from(attrs.bonushp_per_level);
    let hp = i64::from(attrs.ancestryhp) + per_level * i64::from(level) + i64::from(attrs.bonushp);
    let hp = i32::try_from(hp)
        .map_err(|_| EngineError::import(&build.name, format!("hit points {hp} out of range")))?;

    let character = DerivedCharacter {
        id: generate_id(&build.name),
        name: build.name.clone(),
        class_name: build.class_name.clone(),
        level,
        ancestry: build.ancestry.clone(),
        heritage: build.heritage.clone(),
        key_ability: build.keyability.as_deref().and_then(|k| k.parse().ok()),
        abilities: *scores,
        proficiencies: build.proficiencies.clone(),
        class_dc_rank,
        skills,
        saves,
        attacks,
        spellcasting,
        perception,
        lores,
        ac: build.ac_total.ac_total,
        hp,
    };
    debug!(
        name = %character.name,
        level = character.level,
        hp = character.hp,
        ac = character.ac,
        "derived character"
    );
    Ok(character)
}

/// Slug of the name plus a v4 UUID, so rapid re-imports never collide.
pub fn generate_id(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    let slug = if slug.is_empty() { "character".to_string() } else { slug };
    format!("{slug}-{}", Uuid::new_v4().simple())
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
