use url::Url;

/// Path extensions of binary assets that are never parsed as JSON
pub const STATIC_ASSET_EXTENSIONS: &[&str] =
    &[".jpeg", ".jpg", ".png", ".gif", ".svg", ".webp", ".ogg"];

/// Checks whether a URL points at a static asset
///
/// Only the path is inspected, so query strings such as `?size=large`
/// do not hide an image extension.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use charweave::url::is_static_asset;
///
/// let url = Url::parse("https://example.com/sprites/1.png?v=2").unwrap();
/// assert!(is_static_asset(&url));
///
/// let url = Url::parse("https://example.com/api/pokemon/1/").unwrap();
/// assert!(!is_static_asset(&url));
/// ```
pub fn is_static_asset(url: &Url) -> bool {
    let path = url.path();
    STATIC_ASSET_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext))
}
