//! Media the GM shows to players: uploaded images and YouTube videos.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

pub const IMAGE_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("youtube id pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub kind: ContentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentKind {
    Image {
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        video_id: String,
        title: String,
        #[serde(default)]
        duration: Option<String>,
        #[serde(default)]
        autoplay: bool,
        #[serde(default, rename = "loop")]
        looped: bool,
    },
}

impl ContentItem {
    pub fn image(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_kind(
            name.into(),
            url.into(),
            None,
            ContentKind::Image {
                width: None,
                height: None,
            },
        )
    }

    /// A YouTube video item. Fails when no video id can be pulled from `url`.
    pub fn youtube(name: impl Into<String>, url: impl Into<String>) -> EngineResult<Self> {
        let url = url.into();
        let video_id = youtube_id(&url)
            .ok_or_else(|| EngineError::InvalidContent(format!("not a YouTube URL: {url}")))?;
        let name = name.into();
        let thumbnail = youtube_thumbnail(&video_id);
        Ok(Self::with_kind(
            name.clone(),
            url,
            Some(thumbnail),
            ContentKind::Video {
                video_id,
                title: name,
                duration: None,
                autoplay: false,
                looped: false,
            },
        ))
    }

    fn with_kind(name: String, url: String, thumbnail: Option<String>, kind: ContentKind) -> Self {
        Self {
            id: format!("content-{}", Uuid::new_v4().simple()),
            name,
            url,
            thumbnail,
            created_at: Utc::now(),
            tags: Vec::new(),
            kind,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self.kind, ContentKind::Video { .. })
    }
}

/// The 11-character video id from any common YouTube URL shape.
pub fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn youtube_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}

pub fn is_supported_image(mime: &str) -> bool {
    IMAGE_MIME_TYPES.contains(&mime.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_url_shapes() {
        let id = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://www.youtube.com/watch?list=x&v=dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://vimeo.com/12345"), None);
    }

    #[test]
    fn video_item_gets_thumbnail_and_tag() {
        let item = ContentItem::youtube("Tavern ambience", "https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert!(item.is_video());
        assert_eq!(
            item.thumbnail.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["videoId"], "dQw4w9WgXcQ");
    }

    #[test]
    fn image_round_trips_with_type_tag() {
        let item = ContentItem::image("Map", "data:image/png;base64,AAAA");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""type":"image""#));
        let back: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn image_mime_check() {
        assert!(is_supported_image("image/WEBP"));
        assert!(!is_supported_image("image/tiff"));
    }
}
