//! Content store and daily news refresh for a social posting dashboard.
//!
//! The [`store`] module holds the two collections the dashboard renders: the
//! news inbox and the archive of posted items with their captions. The
//! [`feed`] module rebuilds the inbox each day from public RSS/Atom feeds.

pub mod config;
pub mod feed;
pub mod store;
pub mod util;
