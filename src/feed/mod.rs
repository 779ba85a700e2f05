//! Feed retrieval: fetching, parsing, and time-bounded caching of the upstream RSS/Atom feed.
//!
//! - [`parser`] - Converts feed XML into [`Entry`] values using the `feed-rs` crate
//! - [`fetcher`] - Single-attempt HTTP retrieval behind the [`FeedSource`] trait
//! - [`cache`] - [`FeedCache`], which serves one snapshot for a fixed TTL
//!
//! # Example
//!
//! ```ignore
//! use feedcast::feed::{FeedCache, HttpFeedSource};
//!
//! let cache = FeedCache::new(HttpFeedSource::new(client, feed_url));
//! let snapshot = cache.snapshot().await?;
//! ```

mod cache;
mod fetcher;
mod parser;
mod types;

pub use cache::{FeedCache, DEFAULT_TTL};
pub use fetcher::{fetch_entries, fetch_entries_within, FeedSource, FetchError, HttpFeedSource};
pub use parser::parse_feed;
pub use types::{Entry, FeedSnapshot};
