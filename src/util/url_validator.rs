use thiserror::Error;
use url::Url;

/// Errors that can occur when turning a string into a usable web URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// A relative reference was found but there is nothing to resolve it against.
    #[error("Relative URL without a base: {0}")]
    RelativeWithoutBase(String),
}

/// Validates an absolute URL string, requiring an http(s) scheme and a host.
///
/// # Examples
///
/// ```
/// use feedcast::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("file:///etc/passwd").is_err());
/// assert!(validate_url("/feed.xml").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    check_web_url(Url::parse(url_str.trim())?)
}

/// Resolves an `href`/`src` attribute value to an absolute http(s) URL.
///
/// Absolute values are taken as-is. Relative and protocol-relative values are
/// joined onto `base` (typically the feed item's permalink). Without a base,
/// protocol-relative values default to https and other relative values fail.
pub fn resolve_url(href: &str, base: Option<&str>) -> Result<Url, UrlValidationError> {
    let href = href.trim();

    match Url::parse(href) {
        Ok(url) => check_web_url(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if let Some(base) = base.and_then(|b| Url::parse(b).ok()) {
                return check_web_url(base.join(href)?);
            }
            if href.starts_with("//") {
                return check_web_url(Url::parse(&format!("https:{href}"))?);
            }
            Err(UrlValidationError::RelativeWithoutBase(href.to_owned()))
        }
        Err(e) => Err(e.into()),
    }
}

fn check_web_url(url: Url) -> Result<Url, UrlValidationError> {
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlValidationError::MissingHost),
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
        assert!(validate_url("http://news.example.org").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/feed").is_ok());
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_relative_rejected_by_validate() {
        assert!(validate_url("/feed.xml").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let url = resolve_url("https://cdn.example.com/07-14.png", None).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/07-14.png");
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let url = resolve_url(
            "/images/07-14.png",
            Some("https://news.example.com/p/summer-recap"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://news.example.com/images/07-14.png");

        let url = resolve_url("online", Some("https://news.example.com/p/post")).unwrap();
        assert_eq!(url.as_str(), "https://news.example.com/p/online");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let url = resolve_url("//cdn.example.com/a.png", None).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/a.png");

        let url =
            resolve_url("//cdn.example.com/a.png", Some("http://news.example.com/")).unwrap();
        assert_eq!(url.as_str(), "http://cdn.example.com/a.png");
    }

    #[test]
    fn test_resolve_relative_without_base_fails() {
        assert!(matches!(
            resolve_url("images/a.png", None),
            Err(UrlValidationError::RelativeWithoutBase(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_non_web_schemes() {
        assert!(resolve_url("mailto:hi@example.com", None).is_err());
        assert!(resolve_url("data:image/png;base64,AAAA", None).is_err());
    }
}
