use chrono::{DateTime, Utc};
use tokio::time::Instant;

// ============================================================================
// Data Structures
// ============================================================================

/// A single feed item, as parsed from the upstream RSS/Atom document.
///
/// Entries are immutable once they are part of a [`FeedSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    /// Published date, falling back to the updated date. `None` if the feed gave neither.
    pub published_at: Option<DateTime<Utc>>,
    /// Embedded HTML body (`content:encoded`/Atom content, else summary/description).
    pub raw_content: String,
    /// Permalink of the item, used as the base for relative URLs in `raw_content`.
    pub link: Option<String>,
}

/// The parsed feed at one point in time.
///
/// Entries keep the order of the source document (newest first by convention).
/// A snapshot is never mutated; the cache replaces it wholesale.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub entries: Vec<Entry>,
    pub fetched_at: Instant,
}

impl FeedSnapshot {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            fetched_at: Instant::now(),
        }
    }
}
