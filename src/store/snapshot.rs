use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use super::types::{NewsItem, PostedItem};
use super::validate::{validate, CaptionPolicy, Issue, ValidationReport};

/// Snapshot shipped with the binary.
const BUILTIN_SNAPSHOT: &str = include_str!("../../data/news.json");

/// Maximum snapshot file size (10 MB).
const MAX_SNAPSHOT_SIZE: u64 = 10 * 1024 * 1024;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Snapshot file too large: {0}")]
    TooLarge(String),

    #[error("Snapshot failed validation with {} error(s): {}", .0.errors.len(), join_issues(&.0.errors))]
    Invalid(ValidationReport),
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Snapshot Document
// ============================================================================

#[derive(Deserialize)]
struct SnapshotDoc {
    #[serde(default)]
    news_items: Vec<NewsItem>,
    #[serde(default)]
    posted_items: Vec<PostedItem>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    news_items: &'a [NewsItem],
    posted_items: &'a [PostedItem],
}

// ============================================================================
// Content Store
// ============================================================================

/// Immutable, validated pair of news and posted collections.
///
/// A store is only obtainable through a validating constructor, so holding one
/// means every invariant has been checked. Changing the news list produces a
/// new store via [`ContentStore::with_news`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStore {
    news: Vec<NewsItem>,
    posted: Vec<PostedItem>,
    warnings: Vec<Issue>,
    policy: CaptionPolicy,
}

impl ContentStore {
    /// Validate the collections and build a store.
    pub fn new(
        news: Vec<NewsItem>,
        posted: Vec<PostedItem>,
        policy: CaptionPolicy,
    ) -> Result<Self, StoreError> {
        let report = validate(&news, &posted, policy);
        if !report.is_ok() {
            return Err(StoreError::Invalid(report));
        }
        for warning in &report.warnings {
            tracing::warn!(issue = %warning, "Snapshot validation warning");
        }
        Ok(Self {
            news,
            posted,
            warnings: report.warnings,
            policy,
        })
    }

    /// Parse a snapshot document.
    pub fn from_json(json: &str, policy: CaptionPolicy) -> Result<Self, StoreError> {
        let doc: SnapshotDoc = serde_json::from_str(json)?;
        Self::new(doc.news_items, doc.posted_items, policy)
    }

    /// The snapshot embedded at build time.
    pub fn builtin() -> Result<Self, StoreError> {
        Self::from_json(BUILTIN_SNAPSHOT, CaptionPolicy::default())
    }

    /// Read and validate a snapshot file.
    pub fn load(path: &Path, policy: CaptionPolicy) -> Result<Self, StoreError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SNAPSHOT_SIZE {
            return Err(StoreError::TooLarge(format!(
                "{} is {} bytes (max {} bytes)",
                path.display(),
                meta.len(),
                MAX_SNAPSHOT_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json(&content, policy)?;
        tracing::debug!(
            path = %path.display(),
            news = store.news.len(),
            posted = store.posted.len(),
            "Loaded snapshot"
        );
        Ok(store)
    }

    pub fn news(&self) -> &[NewsItem] {
        &self.news
    }

    pub fn posted(&self) -> &[PostedItem] {
        &self.posted
    }

    /// Non-fatal findings from validation.
    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn policy(&self) -> CaptionPolicy {
        self.policy
    }

    pub fn news_by_id(&self, id: &str) -> Option<&NewsItem> {
        self.news.iter().find(|n| n.id == id)
    }

    pub fn posted_by_id(&self, id: &str) -> Option<&PostedItem> {
        self.posted.iter().find(|p| p.id == id)
    }

    /// News items with the given display date, in rank order.
    pub fn news_on<'a>(&'a self, date: &'a str) -> impl Iterator<Item = &'a NewsItem> + 'a {
        self.news.iter().filter(move |n| n.date == date)
    }

    /// New store with the news list replaced and the posted archive kept.
    pub fn with_news(&self, news: Vec<NewsItem>) -> Result<Self, StoreError> {
        Self::new(news, self.posted.clone(), self.policy)
    }

    /// Canonical pretty-printed JSON, newline terminated.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let mut json = serde_json::to_string_pretty(&SnapshotRef {
            news_items: &self.news,
            posted_items: &self.posted,
        })?;
        json.push('\n');
        Ok(json)
    }

    /// SHA-256 of the canonical JSON, hex encoded.
    pub fn fingerprint(&self) -> Result<String, StoreError> {
        let json = self.to_json()?;
        Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
    }

    /// Write the snapshot atomically, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = self.to_json()?;
        write_atomic(path, json.as_bytes())?;
        tracing::info!(
            path = %path.display(),
            news = self.news.len(),
            posted = self.posted.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}

/// Write-to-temp-then-rename so `dst` is never left partially written.
fn write_atomic(dst: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let result = (|| {
        let mut temp_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        temp_file.write_all(content)?;
        temp_file.sync_all()?;
        drop(temp_file);

        // Windows rename fails if the destination exists
        #[cfg(windows)]
        if dst.exists() {
            std::fs::remove_file(dst)?;
        }

        std::fs::rename(&temp_path, dst)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}
