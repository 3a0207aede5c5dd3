use chrono::{DateTime, NaiveDate, Utc};

use super::curate::{build_news_items, collect_candidates, select_top, Candidate, CurateOptions};
use super::fetcher::fetch_all;
use super::sources::FeedSource;
use crate::config::Config;
use crate::store::{ContentStore, StoreError};

/// Result of a refresh run.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Nothing was selected; the snapshot was left as it was.
    NoStories,
    /// The snapshot was rewritten with these stories.
    Updated {
        stories: Vec<Candidate>,
        store: ContentStore,
    },
}

/// Fetch every source and pick the top stories.
pub async fn fetch_top_stories(
    client: &reqwest::Client,
    sources: &[FeedSource],
    entries_per_feed: usize,
    options: &CurateOptions,
    now: DateTime<Utc>,
) -> Vec<Candidate> {
    let results = fetch_all(client, sources, entries_per_feed).await;
    let failed = results.iter().filter(|r| r.result.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed = failed, total = results.len(), "Some feeds could not be fetched");
    }

    let candidates = collect_candidates(&results, now, options);
    tracing::debug!(candidates = candidates.len(), "Collected candidates");
    select_top(candidates, options.top_stories)
}

/// Replace the news list of `store` with `stories`, keeping posted items.
///
/// Returns `None` when there are no stories, so an empty fetch never wipes the
/// inbox.
pub fn apply_stories(
    store: &ContentStore,
    stories: &[Candidate],
    run_date: NaiveDate,
) -> Result<Option<ContentStore>, StoreError> {
    if stories.is_empty() {
        return Ok(None);
    }
    store.with_news(build_news_items(stories, run_date)).map(Some)
}

/// Rebuild the news inbox of the configured snapshot from `sources`.
///
/// # Arguments
///
/// * `client` - HTTP client for fetching feeds
/// * `config` - Snapshot path, caption policy and curation options
/// * `sources` - Feeds to fetch, usually [`Config::sources`]
/// * `now` - Reference instant for the age window
/// * `run_date` - Date used in the generated news ids
///
/// # Returns
///
/// [`RefreshOutcome::NoStories`] when nothing was selected; the file is not
/// touched. Otherwise [`RefreshOutcome::Updated`] with the stories and the
/// saved store.
///
/// # Behavior
///
/// - A missing snapshot file starts from an empty store
/// - Posted items are carried over unchanged; only `news_items` is replaced
/// - The write is atomic, so a failed save leaves the previous file intact
///
/// # Errors
///
/// Fails with [`StoreError`] if the existing snapshot cannot be loaded or
/// validated, or if the new snapshot cannot be written. Feed failures are
/// logged, not returned.
pub async fn refresh_snapshot(
    client: &reqwest::Client,
    config: &Config,
    sources: &[FeedSource],
    now: DateTime<Utc>,
    run_date: NaiveDate,
) -> Result<RefreshOutcome, StoreError> {
    let path = config.data_path.as_path();
    let policy = config.caption_policy();
    let options = config.curate_options();
    let current = if path.exists() {
        ContentStore::load(path, policy)?
    } else {
        tracing::info!(path = %path.display(), "No snapshot yet, starting empty");
        ContentStore::new(Vec::new(), Vec::new(), policy)?
    };

    let stories = fetch_top_stories(client, sources, config.entries_per_feed, &options, now).await;

    match apply_stories(&current, &stories, run_date)? {
        None => {
            tracing::warn!("No stories found, keeping existing data");
            Ok(RefreshOutcome::NoStories)
        }
        Some(store) => {
            store.save(path)?;
            Ok(RefreshOutcome::Updated { stories, store })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn story(title: &str) -> Candidate {
        Candidate {
            title: title.to_string(),
            source: "Wired AI".to_string(),
            url: format!("https://example.com/{}", title),
            summary: String::new(),
            score: 3,
            published: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() - Duration::hours(1),
            pillar: "AI & Tech".to_string(),
            key_angle: String::new(),
        }
    }

    #[test]
    fn test_apply_no_stories_keeps_store() {
        let store = ContentStore::builtin().unwrap();
        let run_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(apply_stories(&store, &[], run_date).unwrap().is_none());
    }

    #[test]
    fn test_apply_replaces_news_and_keeps_posted() {
        let store = ContentStore::builtin().unwrap();
        let run_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let updated = apply_stories(&store, &[story("a"), story("b")], run_date)
            .unwrap()
            .unwrap();

        assert_eq!(updated.news().len(), 2);
        assert_eq!(updated.news()[0].id, "news-20260301-01");
        assert_eq!(updated.news()[1].id, "news-20260301-02");
        assert_eq!(updated.posted(), store.posted());
    }
}
