use url::Url;

/// Parses a string as an HTTP or HTTPS URL with a host
///
/// # Returns
///
/// * `Some(Url)` - The parsed URL
/// * `None` - The string is malformed, has another scheme, or lacks a host
///
/// # Examples
///
/// ```
/// use charweave::url::parse_http_url;
///
/// assert!(parse_http_url("https://swapi.dev/api/people/").is_some());
/// assert!(parse_http_url("mailto:someone@example.com").is_none());
/// assert!(parse_http_url("not a url").is_none());
/// ```
pub fn parse_http_url(value: &str) -> Option<Url> {
    let url = Url::parse(value).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.host_str()?;
    Some(url)
}
