//! JSON backup of everything the companion persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::content::ContentItem;
use crate::derive::DerivedCharacter;
use crate::error::{EngineError, EngineResult};
use crate::notes::GmNote;

pub const BACKUP_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub characters: Vec<DerivedCharacter>,
    pub content: Vec<ContentItem>,
    pub gm_notes: Vec<GmNote>,
}

impl BackupEnvelope {
    pub fn new(
        characters: Vec<DerivedCharacter>,
        content: Vec<ContentItem>,
        gm_notes: Vec<GmNote>,
    ) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            exported_at: Utc::now(),
            characters,
            content,
            gm_notes,
        }
    }

    pub fn to_json(&self) -> EngineResult<String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::InvalidBackup(e.to_string()))?;
        info!(
            characters = self.characters.len(),
            content = self.content.len(),
            notes = self.gm_notes.len(),
            "exported backup"
        );
        Ok(json)
    }

    /// Restore a backup. The version and all three collections must be
    /// present before the contents are parsed.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| EngineError::InvalidBackup(e.to_string()))?;
        match value.get("version").and_then(Value::as_str) {
            Some(v) if !v.trim().is_empty() => {}
            _ => return Err(EngineError::InvalidBackup("missing version".into())),
        }
        for key in ["characters", "content", "gmNotes"] {
            if !value.get(key).is_some_and(Value::is_array) {
                return Err(EngineError::InvalidBackup(format!("missing '{key}' array")));
            }
        }
        let envelope: BackupEnvelope =
            serde_json::from_value(value).map_err(|e| EngineError::InvalidBackup(e.to_string()))?;
        info!(
            version = %envelope.version,
            characters = envelope.characters.len(),
            "restored backup"
        );
        Ok(envelope)
    }
}
