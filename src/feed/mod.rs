//! Daily news refresh from RSS/Atom feeds.
//!
//! - [`sources`] - Feed list, with built-in defaults
//! - [`parser`] - Feed parsing using the `feed-rs` crate
//! - [`fetcher`] - Concurrent HTTP retrieval with retry and size limits
//! - [`curate`] - Scoring, pillars, key angles, ranking and deduplication
//! - [`refresh`] - Putting it together: fetch, select, and rewrite the snapshot
//!
//! # Example
//!
//! ```ignore
//! use newsdesk::config::Config;
//! use newsdesk::feed::{build_client, refresh_snapshot};
//!
//! let client = build_client()?;
//! let config = Config::default();
//! let outcome = refresh_snapshot(
//!     &client,
//!     &config,
//!     &config.sources(),
//!     Utc::now(),
//!     Local::now().date_naive(),
//! )
//! .await?;
//! ```

mod curate;
mod fetcher;
mod parser;
mod refresh;
mod sources;

pub use curate::{
    assign_pillar, build_news_items, collect_candidates, generate_angle, score_article,
    select_top, to_candidate, Candidate, CurateOptions, DATE_FORMAT, DEFAULT_PILLAR,
};
pub use fetcher::{build_client, fetch_all, fetch_source, FetchError, FetchResult};
pub use parser::{parse_feed, ParsedEntry};
pub use refresh::{apply_stories, fetch_top_stories, refresh_snapshot, RefreshOutcome};
pub use sources::{default_sources, FeedSource};
