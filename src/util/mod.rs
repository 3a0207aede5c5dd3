//! Utility functions for common operations.
//!
//! - **URL validation**: absolute-link checks for stored items, SSRF checks
//!   for feed sources
//! - **Text processing**: summary cleanup and terminal-width truncation

mod text;
mod url_validator;

pub use text::{
    clean_summary, collapse_whitespace, decode_entities, fit_width, strip_tags, truncate_chars,
};
pub use url_validator::{validate_absolute_url, validate_feed_url, UrlValidationError};
