use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    Session,
    Campaign,
    Npc,
    Location,
    Plot,
    Other,
}

/// Free-form GM note. `content` is whatever the editor produced (HTML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<NoteCategory>,
}

impl GmNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("note-{}", Uuid::new_v4().simple()),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: NoteCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace title and body, bumping `updated_at`.
    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Case-insensitive match on title, body, or any tag.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

pub fn search<'a>(notes: &'a [GmNote], query: &str) -> Vec<&'a GmNote> {
    notes.iter().filter(|n| n.matches(query)).collect()
}

pub fn by_category(notes: &[GmNote], category: NoteCategory) -> Vec<&GmNote> {
    notes
        .iter()
        .filter(|n| n.category == Some(category))
        .collect()
}
