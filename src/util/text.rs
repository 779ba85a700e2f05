use std::borrow::Cow;

/// Ellipsis appended when text is cut short
const ELLIPSIS: char = '…';

/// Escapes the three characters Slack's mrkdwn treats as control syntax.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use feedcast::util::escape_mrkdwn;
///
/// assert_eq!(escape_mrkdwn("Q&A <live>"), "Q&amp;A &lt;live&gt;");
/// assert_eq!(escape_mrkdwn("plain"), "plain");
/// ```
pub fn escape_mrkdwn(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Collapses runs of whitespace (including newlines) into single spaces and trims the ends.
///
/// Feed titles often carry the line breaks and indentation of the source XML.
pub fn normalize_whitespace(s: &str) -> Cow<'_, str> {
    let trimmed = s.trim();
    let needs_work = trimmed.char_indices().any(|(i, c)| {
        c.is_whitespace() && (c != ' ' || trimmed[i + 1..].starts_with(char::is_whitespace))
    });

    if !needs_work {
        return Cow::Borrowed(trimmed);
    }

    Cow::Owned(trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Truncates to at most `max_chars` characters, ending with an ellipsis when cut.
///
/// Counts Unicode scalar values, which is how Slack measures block text limits.
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed("");
    }

    match s.char_indices().nth(max_chars) {
        None => Cow::Borrowed(s),
        Some(_) => {
            let keep: String = s.chars().take(max_chars - 1).collect();
            Cow::Owned(format!("{}{ELLIPSIS}", keep.trim_end()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_clean_text_returns_borrowed() {
        assert!(matches!(escape_mrkdwn("Fall Update"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_all_controls() {
        assert_eq!(escape_mrkdwn("<a|b> & c"), "&lt;a|b&gt; &amp; c");
    }

    #[test]
    fn test_escape_unicode_preserved() {
        assert_eq!(escape_mrkdwn("Café > 日本"), "Café &gt; 日本");
    }

    #[test]
    fn test_normalize_already_clean() {
        assert!(matches!(normalize_whitespace("Fall Update"), Cow::Borrowed(_)));
        assert_eq!(normalize_whitespace("  Fall Update "), "Fall Update");
    }

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(
            normalize_whitespace("\n    Fall\n    Update  2024\t"),
            "Fall Update 2024"
        );
        assert_eq!(normalize_whitespace("a  b"), "a b");
    }

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_chars("Short", 10), "Short");
        assert_eq!(truncate_chars("Exact", 5), "Exact");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_chars("Hello World", 6), "Hello…");
        assert_eq!(truncate_chars("Hello World", 6).chars().count(), 6);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("日本語のタイトル", 4), "日本語…");
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(truncate_chars("anything", 0), "");
    }
}
