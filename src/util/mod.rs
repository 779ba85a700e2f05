//! Utility functions for common operations.
//!
//! - **URL handling**: validating configured URLs and resolving scraped `href`/`src` values
//! - **Text processing**: escaping and tidying feed text before it is sent to Slack

mod text;
mod url_validator;

pub use text::{escape_mrkdwn, normalize_whitespace, truncate_chars};
pub use url_validator::{resolve_url, validate_url, UrlValidationError};
