use serde_json::Value;

/// Looks up a value by dot-separated path
///
/// Object segments match keys; numeric segments index into arrays. An empty
/// path returns the value itself.
///
/// # Examples
///
/// ```
/// use charweave::json::lookup;
/// use serde_json::json;
///
/// let page = json!({"info": {"next": "https://example.com/?page=2"}, "results": [{"name": "Rick"}]});
/// assert_eq!(lookup(&page, "info.next"), Some(&json!("https://example.com/?page=2")));
/// assert_eq!(lookup(&page, "results.0.name"), Some(&json!("Rick")));
/// assert_eq!(lookup(&page, "info.prev"), None);
/// ```
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Looks up a string by dot-separated path
///
/// Returns `None` when the path is missing or holds a non-string value.
pub fn lookup_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}
