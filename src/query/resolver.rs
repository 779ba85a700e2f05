use regex::RegexBuilder;

use super::QueryDescriptor;
use crate::feed::{Entry, FeedSnapshot};

/// Selects the entry a query refers to, or `None` when nothing matches.
///
/// Date and text queries return the first match in snapshot order.
pub fn resolve<'a>(snapshot: &'a FeedSnapshot, query: &QueryDescriptor) -> Option<&'a Entry> {
    match query {
        QueryDescriptor::Latest => snapshot.entries.first(),
        QueryDescriptor::Index(n) => usize::try_from(*n)
            .ok()
            .and_then(|i| snapshot.entries.get(i)),
        QueryDescriptor::Date(day) => snapshot
            .entries
            .iter()
            .find(|e| e.published_at.is_some_and(|p| p.date_naive() == *day)),
        QueryDescriptor::Text(pattern) => {
            // Escaped so user text like "Q&A (fall)" is matched literally
            let matcher = match RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re,
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Could not build title matcher");
                    return None;
                }
            };
            snapshot.entries.iter().find(|e| matcher.is_match(&e.title))
        }
    }
}
