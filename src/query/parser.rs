use chrono::{DateTime, NaiveDate};

use super::QueryDescriptor;

/// Calendar date layouts accepted for date queries, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Classifies raw command text. Never fails: anything unrecognised becomes a
/// title search.
///
/// Rules, first match wins:
/// 1. empty or `latest` → [`QueryDescriptor::Latest`]
/// 2. base-10 integer (sign allowed) → [`QueryDescriptor::Index`]
/// 3. calendar date → [`QueryDescriptor::Date`]
/// 4. anything else → [`QueryDescriptor::Text`]
pub fn parse(raw: &str) -> QueryDescriptor {
    let text = raw.trim();

    if text.is_empty() || text.eq_ignore_ascii_case("latest") {
        return QueryDescriptor::Latest;
    }

    if let Ok(n) = text.parse::<i64>() {
        return QueryDescriptor::Index(n);
    }

    if let Some(date) = parse_date(text) {
        return QueryDescriptor::Date(date);
    }

    QueryDescriptor::Text(text.to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_rfc2822(text))
                .ok()
                .map(|dt| dt.date_naive())
        })
}
