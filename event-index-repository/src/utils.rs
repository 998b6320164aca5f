//! Utility functions for working with dotted field paths over JSON documents.

use serde_json::{Map, Value};

/// Split a canonical path into its segments.
///
/// Returns `None` for an empty path or one with empty segments (`"a..b"`).
///
/// # Example
///
/// ```
/// use event_index_repository::utils::split_path;
///
/// assert_eq!(split_path("data.@request.path"), Some(vec!["data", "@request", "path"]));
/// assert_eq!(split_path("data..path"), None);
/// ```
pub fn split_path(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

/// All proper ancestors of a path, outermost first (`"a.b.c"` → `["a", "a.b"]`).
pub fn ancestor_paths(path: &str) -> Vec<&str> {
    path.match_indices('.')
        .map(|(index, _)| &path[..index])
        .collect()
}

/// Look up the value at a dotted path.
pub fn get_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write a value at a dotted path, creating intermediate objects as needed.
///
/// Intermediate values that are not objects are replaced. Returns `false`
/// only when the document root itself is not an object.
pub fn set_path(document: &mut Value, path: &str, value: Value) -> bool {
    let Some(mut current) = document.as_object_mut() else {
        return false;
    };

    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return true;
        }

        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry.as_object_mut() {
            Some(object) => object,
            None => return false,
        };
    }
    false
}
