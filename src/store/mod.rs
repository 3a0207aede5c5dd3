//! Content store: the news inbox and the posted archive.
//!
//! Both collections live in a single JSON snapshot document:
//!
//! ```json
//! { "news_items": [ ... ], "posted_items": [ ... ] }
//! ```
//!
//! - [`types`] - Record schemas ([`NewsItem`], [`PostedItem`])
//! - [`platform`] - Recognized social platforms and their caption keys
//! - [`validate`] - Load-time invariant checks
//! - [`snapshot`] - The immutable [`ContentStore`] and its file I/O

mod platform;
mod snapshot;
mod types;
mod validate;

pub use platform::Platform;
pub use snapshot::{ContentStore, StoreError};
pub use types::{MediaType, NewsItem, NewsKind, NewsStatus, PostedItem, PostedStatus};
pub use validate::{
    is_news_id, validate, CaptionPolicy, Issue, IssueKind, Severity, ValidationReport,
};
