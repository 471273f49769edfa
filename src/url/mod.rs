//! URL handling module for Charweave
//!
//! This module decides which string values found inside fetched payloads are
//! reference URLs worth following, and which are static assets to skip.

mod asset;
mod parse;

pub use asset::{is_static_asset, STATIC_ASSET_EXTENSIONS};
pub use parse::parse_http_url;

/// Classification of a string value found inside a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceClass {
    /// Plain text, or a URL with a non-HTTP(S) scheme
    NotAReference,
    /// HTTP(S) URL pointing at a binary asset (image, audio)
    StaticAsset,
    /// HTTP(S) URL expected to return JSON
    Fetchable,
}

impl ReferenceClass {
    /// Returns true if the value should be fetched
    pub fn should_fetch(&self) -> bool {
        matches!(self, Self::Fetchable)
    }
}

/// Classifies a string value
///
/// # Examples
///
/// ```
/// use charweave::url::{classify_reference, ReferenceClass};
///
/// assert_eq!(
///     classify_reference("https://swapi.dev/api/species/1/"),
///     ReferenceClass::Fetchable
/// );
/// assert_eq!(
///     classify_reference("https://example.com/avatar.png"),
///     ReferenceClass::StaticAsset
/// );
/// assert_eq!(classify_reference("Human"), ReferenceClass::NotAReference);
/// ```
pub fn classify_reference(value: &str) -> ReferenceClass {
    // Cheap prefix check before paying for a full parse
    if !value.starts_with("http") {
        return ReferenceClass::NotAReference;
    }

    match parse_http_url(value) {
        Some(url) if is_static_asset(&url) => ReferenceClass::StaticAsset,
        Some(_) => ReferenceClass::Fetchable,
        None => ReferenceClass::NotAReference,
    }
}

/// Returns true if the value is an HTTP(S) URL that should be fetched
pub fn is_fetchable(value: &str) -> bool {
    classify_reference(value).should_fetch()
}
