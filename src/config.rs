//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::{default_sources, CurateOptions, FeedSource};
use crate::store::CaptionPolicy;
use crate::util::validate_feed_url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// A `[[feeds]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedEntry {
    pub name: String,
    pub url: String,
}

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot file read by `list`/`validate` and rewritten by `fetch`.
    pub data_path: PathBuf,

    /// Number of stories kept per fetch run.
    pub top_stories: usize,

    /// Entries older than this are ignored.
    pub max_age_hours: u64,

    /// Only the first N entries of each feed are considered.
    pub entries_per_feed: usize,

    /// Summaries are cut to this many characters.
    pub summary_max_chars: usize,

    /// Treat captions for platforms an item was not posted to as errors.
    pub strict_captions: bool,

    /// Feed sources. Empty means the built-in list.
    pub feeds: Vec<FeedEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/news.json"),
            top_stories: 5,
            max_age_hours: 48,
            entries_per_feed: 20,
            summary_max_chars: 250,
            strict_captions: false,
            feeds: Vec::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Widest accepted fetch window (one year).
    const MAX_AGE_HOURS: u64 = 24 * 366;

    const KNOWN_KEYS: [&'static str; 7] = [
        "data_path",
        "top_stories",
        "max_age_hours",
        "entries_per_feed",
        "summary_max_chars",
        "strict_captions",
        "feeds",
    ];

    /// Default location: `~/.config/newsdesk/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("newsdesk")
                .join("config.toml")
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Zero `top_stories`, `entries_per_feed` or `summary_max_chars`, or a
    ///   `max_age_hours` outside 1..=8784 → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.check()?;
        tracing::info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.top_stories == 0 {
            return Err(ConfigError::Invalid("top_stories must be at least 1".into()));
        }
        if self.entries_per_feed == 0 {
            return Err(ConfigError::Invalid(
                "entries_per_feed must be at least 1".into(),
            ));
        }
        if self.summary_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "summary_max_chars must be at least 1".into(),
            ));
        }
        if self.max_age_hours == 0 || self.max_age_hours > Self::MAX_AGE_HOURS {
            return Err(ConfigError::Invalid(format!(
                "max_age_hours must be between 1 and {}",
                Self::MAX_AGE_HOURS
            )));
        }
        Ok(())
    }

    pub fn caption_policy(&self) -> CaptionPolicy {
        if self.strict_captions {
            CaptionPolicy::Strict
        } else {
            CaptionPolicy::Lenient
        }
    }

    pub fn curate_options(&self) -> CurateOptions {
        CurateOptions {
            top_stories: self.top_stories,
            max_age_hours: self.max_age_hours,
            summary_max_chars: self.summary_max_chars,
        }
    }

    /// Feed sources to fetch, with unsafe or malformed URLs dropped.
    pub fn sources(&self) -> Vec<FeedSource> {
        if self.feeds.is_empty() {
            return default_sources();
        }

        self.feeds
            .iter()
            .filter_map(|entry| match validate_feed_url(&entry.url) {
                Ok(url) => Some(FeedSource::new(entry.name.clone(), url.to_string())),
                Err(e) => {
                    tracing::warn!(
                        name = %entry.name,
                        url = %entry.url,
                        error = %e,
                        "Skipping feed with invalid URL"
                    );
                    None
                }
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(test_name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("newsdesk_config_test_{}", test_name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_path, PathBuf::from("data/news.json"));
        assert_eq!(config.top_stories, 5);
        assert_eq!(config.max_age_hours, 48);
        assert_eq!(config.entries_per_feed, 20);
        assert_eq!(config.summary_max_chars, 250);
        assert!(!config.strict_captions);
        assert_eq!(config.caption_policy(), CaptionPolicy::Lenient);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdesk_test_nonexistent_config.toml");
        assert_eq!(Config::load(path).unwrap(), Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "top_stories = 3\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.top_stories, 3);
        assert_eq!(config.max_age_hours, 48);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
data_path = "/srv/dashboard/news.json"
top_stories = 7
max_age_hours = 24
entries_per_feed = 10
summary_max_chars = 180
strict_captions = true

[[feeds]]
name = "Example AI"
url = "https://example.com/ai/feed.xml"
"#;
        let (dir, path) = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/dashboard/news.json"));
        assert_eq!(config.top_stories, 7);
        assert_eq!(config.max_age_hours, 24);
        assert_eq!(config.entries_per_feed, 10);
        assert_eq!(config.summary_max_chars, 180);
        assert_eq!(config.caption_policy(), CaptionPolicy::Strict);
        assert_eq!(
            config.sources(),
            vec![FeedSource::new("Example AI", "https://example.com/ai/feed.xml")]
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "top_stories = \"five\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_top_stories_rejected() {
        let (dir, path) = write_config("zero_top", "top_stories = 0\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_summary_max_chars_rejected() {
        let (dir, path) = write_config("zero_summary", "summary_max_chars = 0\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("summary_max_chars"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_max_age_hours_bounds() {
        let (dir, path) = write_config("age_huge", "max_age_hours = 9223372036854775807\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("max_age_hours"));
        std::fs::remove_dir_all(&dir).ok();

        let (dir, path) = write_config("age_zero", "max_age_hours = 0\n");
        assert!(matches!(
            Config::load(&path).unwrap_err(),
            ConfigError::Invalid(_)
        ));
        std::fs::remove_dir_all(&dir).ok();

        let (dir, path) = write_config("age_year", "max_age_hours = 8784\n");
        assert_eq!(Config::load(&path).unwrap().max_age_hours, 8784);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "top_stories = 2\nmystery = 42\n");
        assert_eq!(Config::load(&path).unwrap().top_stories, 2);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_feed_list_uses_builtin_sources() {
        let sources = Config::default().sources();
        assert_eq!(sources.len(), 5);
        assert_eq!(sources[0].name, "TechCrunch AI");
    }

    #[test]
    fn test_unsafe_feed_urls_dropped() {
        let config = Config {
            feeds: vec![
                FeedEntry {
                    name: "Intranet".into(),
                    url: "http://10.1.2.3/feed".into(),
                },
                FeedEntry {
                    name: "Local".into(),
                    url: "file:///etc/passwd".into(),
                },
                FeedEntry {
                    name: "Public".into(),
                    url: "https://example.com/feed".into(),
                },
            ],
            ..Config::default()
        };
        let sources = config.sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "Public");
    }
}
