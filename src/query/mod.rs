//! Turning command text into a lookup against the cached feed.
//!
//! [`parse`] classifies the raw slash-command text into a [`QueryDescriptor`];
//! [`resolve`] picks the matching [`Entry`](crate::feed::Entry) out of a snapshot.

mod parser;
mod resolver;

pub use parser::parse;
pub use resolver::resolve;

use chrono::NaiveDate;
use std::fmt;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDescriptor {
    /// Newest entry; equivalent to `Index(0)`.
    Latest,
    /// Zero-based position in feed order. Negative values never match.
    Index(i64),
    /// First entry published on this calendar day (UTC).
    Date(NaiveDate),
    /// First entry whose title contains this text, case-insensitively and literally.
    Text(String),
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryDescriptor::Latest => write!(f, "latest"),
            QueryDescriptor::Index(n) => write!(f, "#{n}"),
            QueryDescriptor::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            QueryDescriptor::Text(t) => write!(f, "\"{t}\""),
        }
    }
}
