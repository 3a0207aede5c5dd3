use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::platform::Platform;

// ============================================================================
// News Items
// ============================================================================

/// Record kind tag for news items. Always serialized as `"news"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    #[default]
    News,
}

/// Lifecycle tag of a news item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    /// Not yet turned into a post
    #[default]
    Inbox,
    Posted,
    Archived,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Inbox => "inbox",
            NewsStatus::Posted => "posted",
            NewsStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news story that is a candidate for a future post.
///
/// Field order matches the snapshot document so that serialization is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// `news-YYYYMMDD-NN`
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NewsKind,
    #[serde(default)]
    pub status: NewsStatus,
    /// Display date, e.g. `Feb 22, 2026`
    pub date: String,
    /// Ordering hint among items sharing a date; 1 is the top story.
    pub rank: u32,
    pub title: String,
    pub source: String,
    pub url: String,
    pub summary: String,
    pub key_angle: String,
    pub pillar: String,
}

// ============================================================================
// Posted Items
// ============================================================================

/// Media category of a posted item's source.
///
/// Unknown categories are kept verbatim so that a snapshot written by a newer
/// producer survives a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Video,
    Article,
    Other(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Video => "video",
            MediaType::Article => "article",
            MediaType::Other(s) => s,
        }
    }
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "video" => MediaType::Video,
            "article" => MediaType::Article,
            _ => MediaType::Other(s),
        }
    }
}

impl From<MediaType> for String {
    fn from(t: MediaType) -> Self {
        match t {
            MediaType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status tag of a posted item. Always serialized as `"posted"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostedStatus {
    #[default]
    Posted,
}

/// Content that has already been published, with the caption used on each
/// platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub status: PostedStatus,
    pub title: String,
    pub pillar: String,
    pub source: String,
    pub date: String,
    /// Platform display names, e.g. `LinkedIn`.
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(rename = "keyQuote", default)]
    pub key_quote: String,
    /// Platform key (`linkedin`, `twitter`, ...) to the exact caption posted.
    /// A `BTreeMap` keeps serialization order deterministic.
    #[serde(default)]
    pub captions: BTreeMap<String, String>,
}

impl PostedItem {
    /// Caption posted (or drafted) for the given platform.
    pub fn caption_for(&self, platform: Platform) -> Option<&str> {
        self.captions
            .iter()
            .find(|(key, _)| Platform::parse(key) == Some(platform))
            .map(|(_, text)| text.as_str())
    }

    /// Platforms this item was published to. Unrecognized names are skipped.
    pub fn published_platforms(&self) -> Vec<Platform> {
        self.platforms
            .iter()
            .filter_map(|name| Platform::parse(name))
            .collect()
    }
}
