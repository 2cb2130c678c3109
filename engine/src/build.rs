//! Serde model of the Pathbuilder 2e JSON export.
//!
//! Only the fields the derivation reads are modelled; everything else in
//! the export (feats, equipment, money, ...) is ignored on parse.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::derive::{SAVE_ABILITIES, SKILL_ABILITIES, WEAPON_CATEGORIES};
use crate::error::{EngineError, EngineResult};
use crate::AbilityScores;

/// Proficiency keys that sit outside the skill/save/weapon tables but are
/// still required.
pub const CLASS_DC_KEY: &str = "classDC";
pub const PERCEPTION_KEY: &str = "perception";

/// Highest character level the rules cover.
pub const MAX_LEVEL: u32 = 20;

/// Top-level export document: `{ "success": bool, "build": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub success: bool,
    #[serde(default)]
    pub build: Option<RawCharacterBuild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacterBuild {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub level: u32,
    pub ancestry: String,
    #[serde(default)]
    pub heritage: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub keyability: Option<String>,
    pub abilities: AbilityScores,
    pub proficiencies: IndexMap<String, i32>,
    #[serde(default)]
    pub spell_casters: Vec<RawSpellCaster>,
    pub attributes: RawAttributes,
    pub ac_total: RawAcTotal,
    #[serde(default)]
    pub lores: Vec<(String, i32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpellCaster {
    pub name: String,
    pub magic_tradition: String,
    pub ability: String,
    pub proficiency: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttributes {
    pub ancestryhp: i32,
    pub classhp: i32,
    pub bonushp: i32,
    pub bonushp_per_level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAcTotal {
    pub ac_total: i32,
}

impl RawCharacterBuild {
    /// Checks the parts serde can't: level range and presence of every
    /// proficiency key the derivation reads.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Err(EngineError::import(
                &self.name,
                format!("level {} is outside 1..={MAX_LEVEL}", self.level),
            ));
        }
        let required = SKILL_ABILITIES
            .iter()
            .chain(SAVE_ABILITIES.iter())
            .map(|(key, _)| *key)
            .chain(WEAPON_CATEGORIES.iter().map(|(key, _)| *key))
            .chain([CLASS_DC_KEY, PERCEPTION_KEY]);
        for key in required {
            if !self.proficiencies.contains_key(key) {
                return Err(EngineError::import(
                    &self.name,
                    format!("missing proficiency '{key}'"),
                ));
            }
        }
        Ok(())
    }

    /// Rank integer for a proficiency key. Callers run `validate` first.
    pub(crate) fn rank_of(&self, key: &str) -> i32 {
        self.proficiencies.get(key).copied().unwrap_or(0)
    }
}

/// Parse one export document.
pub fn parse_export(text: &str) -> EngineResult<ExportDocument> {
    parse_export_as(text, "export")
}

/// Like [`parse_export`], but errors for documents whose name can't be
/// read are attributed to `label`.
pub(crate) fn parse_export_as(text: &str, label: &str) -> EngineResult<ExportDocument> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| EngineError::import(label, format!("not valid JSON: {e}")))?;

    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| EngineError::import(label, "missing boolean 'success' field"))?;

    let build = match value.get("build") {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let record = raw
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(label)
                .to_string();
            let build = RawCharacterBuild::deserialize(raw)
                .map_err(|e| EngineError::import(record, format!("malformed build: {e}")))?;
            Some(build)
        }
    };

    Ok(ExportDocument { success, build })
}

/// Sample exports bundled with the crate, keyed by character slug.
pub fn builtin_builds() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("valeros", include_str!("../content/builds/valeros.json")),
        ("kyra", include_str!("../content/builds/kyra.json")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_parse() {
        for (slug, text) in builtin_builds() {
            let doc = parse_export(text).unwrap_or_else(|e| panic!("{slug}: {e}"));
            assert!(doc.success);
            doc.build.expect("build present").validate().unwrap();
        }
    }

    #[test]
    fn missing_build_parses_as_none() {
        let doc = parse_export(r#"{"success": false}"#).unwrap();
        assert!(!doc.success);
        assert!(doc.build.is_none());
    }

    #[test]
    fn malformed_build_names_the_record() {
        let err = parse_export(r#"{"success": true, "build": {"name": "Ezren", "level": "five"}}"#)
            .unwrap_err();
        match err {
            EngineError::InvalidImportFormat { record, .. } => assert_eq!(record, "Ezren"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_success_flag_is_rejected() {
        assert!(matches!(
            parse_export("{}"),
            Err(EngineError::InvalidImportFormat { .. })
        ));
    }
}
