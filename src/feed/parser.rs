use anyhow::Result;
use feed_rs::parser;

use super::types::Entry;

/// Parses RSS/Atom bytes into entries, preserving document order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Entry>> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let published_at = entry.published.or(entry.updated);
            let raw_content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .unwrap_or_default();
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            Entry {
                title,
                published_at,
                raw_content,
                link,
            }
        })
        .collect();

    Ok(entries)
}
